use upvote_core::sync::{ScopeToken, VoteOutcome};

use crate::commands::common::{parse_feature_id, AppService};
use crate::error::CliError;

/// Bring this device's vote on `id` to `voted`.
pub async fn run_vote(
    service: &AppService,
    id: &str,
    voted: bool,
    token: &ScopeToken,
) -> Result<(), CliError> {
    let id = parse_feature_id(id)?;
    let detail = service.detail().open(id, token).await?;
    let outcome = service.votes().set_vote(id, voted, token).await?;
    let entry = service.board().entry(id).unwrap_or(detail.entry);
    let feature = &entry.feature;

    match outcome {
        VoteOutcome::Voted => {
            println!("Voted for #{}: {} ({})", id, feature.title, feature.vote_label());
        }
        VoteOutcome::Unvoted => {
            println!(
                "Removed vote from #{}: {} ({})",
                id,
                feature.title,
                feature.vote_label()
            );
        }
        VoteOutcome::Unchanged if voted => println!("Already voted for #{id}"),
        VoteOutcome::Unchanged => println!("No vote to remove on #{id}"),
        VoteOutcome::Ignored => println!("A vote on #{id} is already in progress"),
        VoteOutcome::Cancelled => return Err(CliError::Interrupted),
    }

    Ok(())
}
