//! Feature submission.

use std::sync::Arc;

use super::board::FeatureBoard;
use super::scope::ScopeToken;
use crate::api::FeatureApi;
use crate::models::{Feature, NewFeature};
use crate::{Error, Result};

/// Validates and creates feature requests
pub struct FeatureSubmitter<A> {
    api: Arc<A>,
    board: FeatureBoard,
}

impl<A: FeatureApi> FeatureSubmitter<A> {
    pub const fn new(api: Arc<A>, board: FeatureBoard) -> Self {
        Self { api, board }
    }

    /// Validate `draft` locally, create it, and put it at the top of the list.
    ///
    /// Invalid drafts never reach the network.
    pub async fn submit(&self, draft: &NewFeature, token: &ScopeToken) -> Result<Feature> {
        let draft = draft.validate().map_err(Error::Validation)?;
        let created = token.run(self.api.create_feature(&draft)).await??;
        tracing::info!("Created feature {}: {}", created.id, created.title);
        self.board.insert_front(created.clone());
        Ok(created)
    }
}
