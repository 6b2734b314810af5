use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use upvote_core::api::HttpFeatureApi;
use upvote_core::config::ClientConfig;
use upvote_core::services::FeatureService;
use upvote_core::store::SqliteKeyValueStore;
use upvote_core::sync::FeatureEntry;
use upvote_core::{BestEffort, FeatureId, FeatureStats};

use crate::error::CliError;

/// Service wired to the HTTP API and the on-disk store
pub type AppService = FeatureService<HttpFeatureApi, SqliteKeyValueStore>;

#[derive(Debug, Serialize)]
pub struct FeatureListItem {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub vote_count: u32,
    pub voted: bool,
    pub created_at: String,
    pub relative_time: String,
}

pub fn entry_to_list_item(entry: &FeatureEntry) -> FeatureListItem {
    let now_ms = Utc::now().timestamp_millis();
    let feature = &entry.feature;
    FeatureListItem {
        id: feature.id.get(),
        title: feature.title.clone(),
        description: feature.description.clone(),
        vote_count: feature.vote_count,
        voted: entry.voted,
        created_at: feature.created_at.to_rfc3339(),
        relative_time: format_relative_time(feature.created_at.timestamp_millis(), now_ms),
    }
}

pub fn format_feature_lines(entries: &[FeatureEntry]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    entries
        .iter()
        .map(|entry| format_feature_line(entry, now_ms))
        .collect()
}

pub fn format_feature_line(entry: &FeatureEntry, now_ms: i64) -> String {
    let feature = &entry.feature;
    let id = format!("#{}", feature.id);
    let marker = vote_marker(entry.voted);
    let title = text_preview(&feature.title, 40);
    let votes = feature.vote_label();
    let relative_time = format_relative_time(feature.created_at.timestamp_millis(), now_ms);
    format!("{id:<6} {marker} {title:<40}  {votes:<9}  {relative_time}")
}

pub fn format_detail_lines(entry: &FeatureEntry, stats: Option<&FeatureStats>) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    let feature = &entry.feature;
    let mut lines = vec![
        format!("#{} {}", feature.id, feature.title),
        String::new(),
        feature.description.clone(),
        String::new(),
        format!(
            "{}  {}  created {}",
            vote_marker(entry.voted),
            feature.vote_label(),
            format_relative_time(feature.created_at.timestamp_millis(), now_ms)
        ),
    ];
    if let Some(stats) = stats {
        lines.extend(format_stats_lines(stats, now_ms));
    }
    lines
}

pub fn format_stats_lines(stats: &FeatureStats, now_ms: i64) -> Vec<String> {
    let mut lines = vec![format!("Total votes: {}", stats.total_votes)];
    if stats.recent_votes.is_empty() {
        lines.push("No votes yet".to_string());
    } else {
        lines.push("Recent votes:".to_string());
        lines.extend(stats.recent_votes.iter().map(|vote| {
            format!(
                "  {:<20}  {}",
                vote.user_identifier,
                format_relative_time(vote.created_at.timestamp_millis(), now_ms)
            )
        }));
    }
    lines
}

pub const fn vote_marker(voted: bool) -> &'static str {
    if voted {
        "[x]"
    } else {
        "[ ]"
    }
}

pub fn text_preview(text: &str, max_chars: usize) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        return text;
    }
    let truncated = text
        .chars()
        .take(max_chars.saturating_sub(3))
        .collect::<String>();
    format!("{truncated}...")
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

pub fn parse_feature_id(id: &str) -> Result<FeatureId, CliError> {
    id.trim()
        .trim_start_matches('#')
        .parse::<FeatureId>()
        .map_err(|_| CliError::InvalidFeatureId(id.trim().to_string()))
}

/// Print a warning for a local store failure that was absorbed.
pub fn warn_if_degraded<T>(result: &BestEffort<T>, what: &str) {
    if let Some(error) = result.error() {
        eprintln!("Warning: {what} could not be saved locally ({error})");
    }
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("UPVOTE_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("upvote")
        .join("upvote.db")
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> PathBuf {
    cli_config_path
        .or_else(|| env::var_os("UPVOTE_CONFIG").map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("upvote")
        .join("config.json")
}

/// Config file, then `UPVOTE_*` environment, then the `--api-url` flag.
pub fn load_config(
    config_path: &Path,
    api_url: Option<String>,
    env_lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::load_from_path(config_path).apply_overrides(env_lookup)?;
    if let Some(api_url) = api_url {
        config.api_base_url = api_url;
    }
    Ok(config.validate()?)
}

pub fn open_service(db_path: &Path, config: &ClientConfig) -> Result<AppService, CliError> {
    tracing::debug!(
        "Opening local store at {} for {}",
        db_path.display(),
        config.api_base_url
    );
    Ok(FeatureService::open_path(db_path, config)?)
}
