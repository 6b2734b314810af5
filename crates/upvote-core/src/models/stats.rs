//! Feature vote statistics model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FeatureId;

/// Vote statistics for a single feature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureStats {
    #[serde(default)]
    pub feature_id: Option<FeatureId>,
    #[serde(default)]
    pub title: Option<String>,
    pub total_votes: u32,
    /// Most recent votes first
    #[serde(default)]
    pub recent_votes: Vec<RecentVote>,
}

/// A single recent vote; the identifier is already truncated by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentVote {
    pub user_identifier: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_deserialize() {
        let payload = r#"{
            "feature_id": 3,
            "title": "Dark mode",
            "total_votes": 2,
            "recent_votes": [
                {"user_identifier": "192.168.1....", "created_at": "2024-05-02T08:00:00Z"},
                {"user_identifier": "10.0.0.7...", "created_at": "2024-05-01T08:00:00Z"}
            ]
        }"#;
        let stats: FeatureStats = serde_json::from_str(payload).unwrap();
        assert_eq!(stats.feature_id, Some(FeatureId::new(3)));
        assert_eq!(stats.total_votes, 2);
        assert_eq!(stats.recent_votes.len(), 2);
        assert!(stats.recent_votes[0].created_at > stats.recent_votes[1].created_at);
    }

    #[test]
    fn test_stats_tolerates_missing_optional_fields() {
        let stats: FeatureStats = serde_json::from_str(r#"{"total_votes": 0}"#).unwrap();
        assert!(stats.recent_votes.is_empty());
        assert_eq!(stats.title, None);
    }
}
