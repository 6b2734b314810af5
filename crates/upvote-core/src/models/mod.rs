//! Data models for Upvote

mod feature;
mod stats;

pub use feature::{
    Feature, FeatureId, NewFeature, ValidationErrors, DESCRIPTION_MAX_CHARS,
    DESCRIPTION_MIN_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
pub use stats::{FeatureStats, RecentVote};
