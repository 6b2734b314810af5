use upvote_core::sync::{FeatureEntry, LoadMode, LoadOutcome, ScopeToken};

use crate::commands::common::{
    entry_to_list_item, format_feature_lines, AppService, FeatureListItem,
};
use crate::error::CliError;

pub async fn run_list(
    service: &AppService,
    refresh: bool,
    as_json: bool,
    token: &ScopeToken,
) -> Result<(), CliError> {
    let mode = if refresh {
        LoadMode::Refresh
    } else {
        LoadMode::Initial
    };

    match service.list().load(mode, token).await? {
        LoadOutcome::Fresh => {}
        LoadOutcome::Stale { error } => {
            eprintln!("Warning: could not refresh feature requests ({error}); showing saved list");
        }
        LoadOutcome::Cancelled => return Err(CliError::Interrupted),
    }

    let entries = service
        .board()
        .snapshot()
        .features()
        .cloned()
        .collect::<Vec<FeatureEntry>>();

    if as_json {
        let json_items = entries
            .iter()
            .map(entry_to_list_item)
            .collect::<Vec<FeatureListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if entries.is_empty() {
        println!("No feature requests yet. Add one with `upvote new`.");
    } else {
        for line in format_feature_lines(&entries) {
            println!("{line}");
        }
    }

    Ok(())
}
