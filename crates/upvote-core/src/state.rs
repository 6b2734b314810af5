//! Shared view state types.

use crate::models::FeatureId;

/// Load status of the feature list
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    /// First load in progress; cached data may already be shown
    Loading,
    /// Pull-to-refresh in progress
    Refreshing,
    Ready,
    /// The last fetch failed but earlier data is still displayed
    Stale { message: String },
    /// The last fetch failed and there is nothing to display
    Failed { message: String },
}

impl LoadState {
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Loading | Self::Refreshing)
    }
}

/// Dismissible error notification raised by a failed vote
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub feature_id: FeatureId,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn vote_error(feature_id: FeatureId, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            feature_id,
            title: "Vote Error".to_string(),
            message: if message.trim().is_empty() {
                "Failed to process your vote. Please try again.".to_string()
            } else {
                message
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_error_falls_back_to_generic_message() {
        let notice = Notice::vote_error(FeatureId::new(1), "  ");
        assert_eq!(notice.message, "Failed to process your vote. Please try again.");
        let notice = Notice::vote_error(FeatureId::new(1), "Feature not found");
        assert_eq!(notice.message, "Feature not found");
    }

    #[test]
    fn busy_states() {
        assert!(LoadState::Loading.is_busy());
        assert!(LoadState::Refreshing.is_busy());
        assert!(!LoadState::Ready.is_busy());
    }
}
