use serde::Serialize;
use upvote_core::sync::ScopeToken;
use upvote_core::FeatureStats;

use crate::commands::common::{
    entry_to_list_item, format_detail_lines, parse_feature_id, AppService, FeatureListItem,
};
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct FeatureDetailItem {
    #[serde(flatten)]
    feature: FeatureListItem,
    stats: Option<FeatureStats>,
}

pub async fn run_show(
    service: &AppService,
    id: &str,
    as_json: bool,
    token: &ScopeToken,
) -> Result<(), CliError> {
    let id = parse_feature_id(id)?;
    let detail = service.detail().open(id, token).await?;

    if as_json {
        let item = FeatureDetailItem {
            feature: entry_to_list_item(&detail.entry),
            stats: detail.stats,
        };
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        for line in format_detail_lines(&detail.entry, detail.stats.as_ref()) {
            println!("{line}");
        }
    }

    Ok(())
}
