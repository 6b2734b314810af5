use upvote_core::sync::ScopeToken;
use upvote_core::NewFeature;

use crate::commands::common::AppService;
use crate::error::CliError;

pub async fn run_new(
    service: &AppService,
    title: &str,
    description_parts: &[String],
    token: &ScopeToken,
) -> Result<(), CliError> {
    let draft = NewFeature::new(title, description_parts.join(" "));
    let created = service.submitter().submit(&draft, token).await?;
    println!("{}", created.id);
    Ok(())
}
