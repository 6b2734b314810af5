//! Service layer shared by clients

mod feature_service;

pub use feature_service::FeatureService;
