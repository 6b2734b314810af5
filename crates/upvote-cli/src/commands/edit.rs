use upvote_core::api::FeatureApi;
use upvote_core::sync::ScopeToken;
use upvote_core::{Error, NewFeature};

use crate::commands::common::{parse_feature_id, AppService};
use crate::error::CliError;

pub async fn run_edit(
    service: &AppService,
    id: &str,
    title: Option<String>,
    description: Option<String>,
    token: &ScopeToken,
) -> Result<(), CliError> {
    if title.is_none() && description.is_none() {
        return Err(CliError::NothingToEdit);
    }
    let id = parse_feature_id(id)?;
    let current = token.run(service.api().get_feature(id)).await??;

    let draft = NewFeature::new(
        title.unwrap_or(current.title),
        description.unwrap_or(current.description),
    )
    .validate()
    .map_err(Error::Validation)?;

    let updated = token.run(service.api().update_feature(id, &draft)).await??;
    let voted = service.ledger().has_voted(id).await.into_value();
    service.board().upsert(updated.clone(), voted);

    println!("{}", updated.id);
    Ok(())
}
