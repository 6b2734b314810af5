//! upvote-core - Core library for Upvote
//!
//! This crate contains the device-local vote ledger, the feature-list cache,
//! the remote API client, and the shared feature board that keeps list and
//! detail views consistent.

pub mod api;
pub mod best_effort;
pub mod cache;
pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod ledger;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod sync;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use best_effort::BestEffort;
pub use error::{Error, Result};
pub use models::{Feature, FeatureId, FeatureStats, NewFeature};
