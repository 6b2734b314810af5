use upvote_core::sync::ScopeToken;

use crate::commands::common::{parse_feature_id, warn_if_degraded, AppService};
use crate::error::CliError;

pub async fn run_delete(service: &AppService, id: &str, token: &ScopeToken) -> Result<(), CliError> {
    let id = parse_feature_id(id)?;
    token.run(service.api().delete_feature(id)).await??;

    let forgotten = service.forget_feature(id).await;
    warn_if_degraded(&forgotten, "vote removal");

    println!("{id}");
    Ok(())
}
