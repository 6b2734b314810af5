//! Single-feature detail view model.

use std::sync::Arc;

use super::board::{FeatureBoard, FeatureEntry};
use super::scope::ScopeToken;
use super::vote::{VoteCoordinator, VoteOutcome};
use crate::api::FeatureApi;
use crate::ledger::VoteLedger;
use crate::models::{FeatureId, FeatureStats};
use crate::store::KeyValueStore;
use crate::Result;

/// What the detail screen displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDetail {
    pub entry: FeatureEntry,
    /// `None` when stats could not be loaded
    pub stats: Option<FeatureStats>,
}

/// Loads a feature with its stats and keeps it in step with the board
pub struct FeatureDetailLoader<A, S> {
    api: Arc<A>,
    ledger: VoteLedger<S>,
    board: FeatureBoard,
    votes: VoteCoordinator<A, S>,
}

impl<A: FeatureApi, S: KeyValueStore> FeatureDetailLoader<A, S> {
    pub const fn new(
        api: Arc<A>,
        ledger: VoteLedger<S>,
        board: FeatureBoard,
        votes: VoteCoordinator<A, S>,
    ) -> Self {
        Self {
            api,
            ledger,
            board,
            votes,
        }
    }

    /// Load the feature (from the board when known) together with its stats.
    ///
    /// Stats failures are logged and leave `stats` empty.
    pub async fn open(&self, id: FeatureId, token: &ScopeToken) -> Result<FeatureDetail> {
        let known = self.board.entry(id).map(|entry| entry.feature);
        let feature = async {
            match known {
                Some(feature) => Ok(feature),
                None => self.api.get_feature(id).await,
            }
        };
        let (feature, stats) = token
            .run(async { tokio::join!(feature, self.api.get_feature_stats(id)) })
            .await?;

        let feature = feature?;
        // A tracked entry already carries the confirmed vote state.
        let voted = match self.board.entry(id) {
            Some(entry) => entry.voted,
            None => self.ledger.has_voted(id).await.into_value(),
        };
        let entry = self.board.upsert(feature, voted);

        Ok(FeatureDetail {
            entry,
            stats: silence_stats(id, stats),
        })
    }

    /// Reload stats without surfacing failures.
    pub async fn refresh_stats(&self, id: FeatureId, token: &ScopeToken) -> Option<FeatureStats> {
        let stats = token.run(self.api.get_feature_stats(id)).await.ok()?;
        silence_stats(id, stats)
    }

    /// Toggle the vote from the detail screen and reload stats once confirmed.
    pub async fn toggle_vote(
        &self,
        detail: &mut FeatureDetail,
        token: &ScopeToken,
    ) -> Result<VoteOutcome> {
        let id = detail.entry.feature.id;
        let outcome = self.votes.toggle(id, token).await?;
        if let Some(entry) = self.board.entry(id) {
            detail.entry = entry;
        }
        if outcome.is_applied() {
            if let Some(stats) = self.refresh_stats(id, token).await {
                detail.stats = Some(stats);
            }
        }
        Ok(outcome)
    }

    /// Current board state of the feature, for re-rendering after a change
    /// published by another view.
    pub fn sync(&self, detail: &mut FeatureDetail) -> bool {
        match self.board.entry(detail.entry.feature.id) {
            Some(entry) if entry != detail.entry => {
                detail.entry = entry;
                true
            }
            _ => false,
        }
    }
}

fn silence_stats(id: FeatureId, stats: Result<FeatureStats>) -> Option<FeatureStats> {
    stats
        .map_err(|error| tracing::debug!("Stats for feature {} unavailable: {}", id, error))
        .ok()
}
