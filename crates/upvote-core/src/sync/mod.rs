//! Keeping views consistent with the server and with each other.
//!
//! Every view reads from one [`FeatureBoard`]. Loaders and the vote
//! coordinator write to it; views subscribe to it and issue requests through a
//! [`ScopeToken`] owned by their [`ViewScope`].

mod board;
mod detail;
mod list;
mod scope;
mod submit;
mod vote;

pub use board::{BoardSnapshot, FeatureBoard, FeatureEntry};
pub use detail::{FeatureDetail, FeatureDetailLoader};
pub use list::{FeatureListLoader, LoadMode, LoadOutcome};
pub use scope::{Cancelled, ScopeToken, ViewScope};
pub use submit::FeatureSubmitter;
pub use vote::{VoteCoordinator, VoteOutcome};
