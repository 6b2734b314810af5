use chrono::Utc;
use upvote_core::api::FeatureApi;
use upvote_core::sync::ScopeToken;

use crate::commands::common::{format_stats_lines, parse_feature_id, AppService};
use crate::error::CliError;

pub async fn run_stats(
    service: &AppService,
    id: &str,
    as_json: bool,
    token: &ScopeToken,
) -> Result<(), CliError> {
    let id = parse_feature_id(id)?;
    let stats = token.run(service.api().get_feature_stats(id)).await??;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats_lines(&stats, Utc::now().timestamp_millis()) {
            println!("{line}");
        }
    }

    Ok(())
}
