//! Remote feature API contract and its HTTP implementation.

mod http;

pub use http::HttpFeatureApi;

use crate::models::{Feature, FeatureId, FeatureStats, NewFeature};
use crate::Result;

/// Operations consumed from the feature request service (async)
///
/// Implementations translate non-2xx responses into [`crate::Error::Api`]
/// (or [`crate::Error::NotFound`] for 404) carrying a readable message.
#[allow(async_fn_in_trait)]
pub trait FeatureApi {
    /// List all features, newest first
    async fn list_features(&self) -> Result<Vec<Feature>>;

    /// Fetch a single feature
    async fn get_feature(&self, id: FeatureId) -> Result<Feature>;

    /// Create a feature; the server assigns the id and starts at zero votes
    async fn create_feature(&self, feature: &NewFeature) -> Result<Feature>;

    /// Register a vote from this client
    async fn increment_vote(&self, id: FeatureId) -> Result<()>;

    /// Withdraw this client's vote
    async fn decrement_vote(&self, id: FeatureId) -> Result<()>;

    /// Vote totals and the most recent votes
    async fn get_feature_stats(&self, id: FeatureId) -> Result<FeatureStats>;
}
