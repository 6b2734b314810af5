//! Client configuration.
//!
//! Resolved in three layers: built-in defaults, an optional JSON file, then
//! `UPVOTE_*` environment overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_MAX_AGE;
use crate::util::{is_http_url, normalize_text_option};
use crate::{Error, Result};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub const ENV_API_BASE_URL: &str = "UPVOTE_API_BASE_URL";
pub const ENV_HEALTH_URL: &str = "UPVOTE_HEALTH_URL";
pub const ENV_CACHE_MAX_AGE_SECS: &str = "UPVOTE_CACHE_MAX_AGE_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "UPVOTE_REQUEST_TIMEOUT_SECS";

/// Runtime configuration for the feature client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Health endpoint; derived from the API origin when unset
    #[serde(default)]
    pub health_url: Option<String>,
    #[serde(default = "default_cache_max_age_secs")]
    pub cache_max_age_secs: u64,
    /// Per-request timeout; the transport default applies when unset
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            health_url: None,
            cache_max_age_secs: default_cache_max_age_secs(),
            request_timeout_secs: None,
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

const fn default_cache_max_age_secs() -> u64 {
    DEFAULT_CACHE_MAX_AGE.as_secs()
}

impl ClientConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults; a file that cannot be read or parsed
    /// is logged and also yields the defaults.
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Self>(&content) {
                Ok(config) => config,
                Err(error) => {
                    tracing::warn!(
                        "Failed to parse client config at {}: {}",
                        path.display(),
                        error
                    );
                    Self::default()
                }
            },
            Err(error) => {
                tracing::warn!(
                    "Failed to read client config at {}: {}",
                    path.display(),
                    error
                );
                Self::default()
            }
        }
    }

    /// Save configuration as pretty JSON, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply overrides from a variable lookup (normally `std::env::var`).
    ///
    /// Blank values are ignored; unparsable numbers are rejected.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let read = |key: &str| normalize_text_option(lookup(key));

        if let Some(url) = read(ENV_API_BASE_URL) {
            self.api_base_url = url;
        }
        if let Some(url) = read(ENV_HEALTH_URL) {
            self.health_url = Some(url);
        }
        if let Some(value) = read(ENV_CACHE_MAX_AGE_SECS) {
            self.cache_max_age_secs = parse_secs(ENV_CACHE_MAX_AGE_SECS, &value)?;
        }
        if let Some(value) = read(ENV_REQUEST_TIMEOUT_SECS) {
            self.request_timeout_secs = Some(parse_secs(ENV_REQUEST_TIMEOUT_SECS, &value)?);
        }

        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Result<Self> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Check URLs and the timeout, trimming surrounding whitespace.
    pub fn validate(mut self) -> Result<Self> {
        self.api_base_url = normalize_required_http_url(&self.api_base_url, "api_base_url")?;
        self.health_url = match normalize_text_option(self.health_url) {
            Some(url) => Some(normalize_required_http_url(&url, "health_url")?),
            None => None,
        };
        if self.request_timeout_secs == Some(0) {
            return Err(Error::InvalidInput(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    pub const fn cache_max_age(&self) -> Duration {
        Duration::from_secs(self.cache_max_age_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{key} must be a whole number of seconds")))
}

fn normalize_required_http_url(raw: &str, field: &str) -> Result<String> {
    let value = normalize_text_option(Some(raw.to_string()))
        .ok_or_else(|| Error::InvalidInput(format!("config field '{field}' is required")))?;
    if is_http_url(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!(
            "config field '{field}' must include http:// or https://"
        )))
    }
}
