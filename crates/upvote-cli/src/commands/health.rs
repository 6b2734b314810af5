use upvote_core::sync::ScopeToken;

use crate::commands::common::AppService;
use crate::error::CliError;

pub async fn run_health(service: &AppService, token: &ScopeToken) -> Result<(), CliError> {
    let body = token.run(service.api().health_check()).await??;
    println!("Backend is available at {}", service.api().health_url());
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
