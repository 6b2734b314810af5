//! Feature request model

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MIN_CHARS: usize = 10;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

/// Server-assigned identifier for a feature request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(i64);

impl FeatureId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for FeatureId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FeatureId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A feature request as reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: FeatureId,
    pub title: String,
    pub description: String,
    /// Total votes as last reported by the server, adjusted by confirmed local votes
    #[serde(default)]
    pub vote_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Feature {
    /// Apply a server-confirmed vote (`true`) or vote removal (`false`).
    ///
    /// The count never drops below zero.
    pub fn apply_confirmed_vote(&mut self, voted: bool) {
        self.vote_count = if voted {
            self.vote_count.saturating_add(1)
        } else {
            self.vote_count.saturating_sub(1)
        };
    }

    /// "1 vote" / "N votes"
    #[must_use]
    pub fn vote_label(&self) -> String {
        if self.vote_count == 1 {
            "1 vote".to_string()
        } else {
            format!("{} votes", self.vote_count)
        }
    }
}

/// Draft of a feature request, as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeature {
    pub title: String,
    pub description: String,
}

impl NewFeature {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Validate the draft and return a trimmed copy ready for submission.
    ///
    /// Lengths are counted in characters after trimming.
    pub fn validate(&self) -> Result<Self, ValidationErrors> {
        let title = self.title.trim();
        let description = self.description.trim();

        let errors = ValidationErrors {
            title: check_field(title, "Title", TITLE_MIN_CHARS, TITLE_MAX_CHARS),
            description: check_field(
                description,
                "Description",
                DESCRIPTION_MIN_CHARS,
                DESCRIPTION_MAX_CHARS,
            ),
        };

        if errors.is_empty() {
            Ok(Self::new(title, description))
        } else {
            Err(errors)
        }
    }
}

fn check_field(value: &str, label: &str, min: usize, max: usize) -> Option<String> {
    let length = value.chars().count();
    if length == 0 {
        Some(format!("{label} is required"))
    } else if length < min {
        Some(format!("{label} must be at least {min} characters long"))
    } else if length > max {
        Some(format!("{label} must be less than {max} characters"))
    } else {
        None
    }
}

/// Field-level validation messages for a [`NewFeature`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ValidationErrors {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages = [self.title.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn feature(vote_count: u32) -> Feature {
        Feature {
            id: FeatureId::new(1),
            title: "Dark mode".to_string(),
            description: "Support a dark theme".to_string(),
            vote_count,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_feature_id_parse() {
        let id: FeatureId = " 42 ".parse().unwrap();
        assert_eq!(id, FeatureId::new(42));
        assert!("abc".parse::<FeatureId>().is_err());
    }

    #[test]
    fn test_feature_deserializes_list_payload() {
        let payload = r#"{
            "id": 7,
            "title": "Offline mode",
            "description": "Work without a connection",
            "vote_count": 3,
            "created_at": "2024-05-01T12:30:00Z",
            "user_has_voted": false
        }"#;
        let feature: Feature = serde_json::from_str(payload).unwrap();
        assert_eq!(feature.id, FeatureId::new(7));
        assert_eq!(feature.vote_count, 3);
    }

    #[test]
    fn test_confirmed_vote_adjusts_count() {
        let mut feature = feature(0);
        feature.apply_confirmed_vote(true);
        assert_eq!(feature.vote_count, 1);
        feature.apply_confirmed_vote(false);
        feature.apply_confirmed_vote(false);
        assert_eq!(feature.vote_count, 0);
    }

    #[test]
    fn test_vote_label_pluralizes() {
        assert_eq!(feature(1).vote_label(), "1 vote");
        assert_eq!(feature(0).vote_label(), "0 votes");
    }

    #[test]
    fn test_validate_trims_fields() {
        let draft = NewFeature::new("  Dark mode  ", "  Please add a dark theme  ");
        let valid = draft.validate().unwrap();
        assert_eq!(valid.title, "Dark mode");
        assert_eq!(valid.description, "Please add a dark theme");
    }

    #[test]
    fn test_validate_short_title() {
        let errors = NewFeature::new("ab", "A long enough description")
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.title.as_deref(),
            Some("Title must be at least 3 characters long")
        );
        assert_eq!(errors.description, None);
    }

    #[test]
    fn test_validate_required_fields() {
        let errors = NewFeature::new("   ", "").validate().unwrap_err();
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert_eq!(
            errors.description.as_deref(),
            Some("Description is required")
        );
        assert_eq!(
            errors.to_string(),
            "Title is required; Description is required"
        );
    }

    #[test]
    fn test_validate_length_limits() {
        let title = "t".repeat(TITLE_MAX_CHARS);
        let description = "d".repeat(DESCRIPTION_MAX_CHARS);
        assert!(NewFeature::new(&title, &description).validate().is_ok());

        let errors = NewFeature::new(format!("{title}t"), format!("{description}d"))
            .validate()
            .unwrap_err();
        assert_eq!(
            errors.title.as_deref(),
            Some("Title must be less than 200 characters")
        );
        assert_eq!(
            errors.description.as_deref(),
            Some("Description must be less than 1000 characters")
        );
    }

    #[test]
    fn test_validate_counts_characters_not_bytes() {
        let errors = NewFeature::new("日本", "説明が十分に長いテキストです")
            .validate()
            .unwrap_err();
        assert!(errors.title.is_some());
        assert!(errors.description.is_none());
    }
}
