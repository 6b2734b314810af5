//! Stale-while-revalidate loading of the feature list.

use std::sync::Arc;
use std::time::Duration;

use super::board::FeatureBoard;
use super::scope::ScopeToken;
use crate::api::FeatureApi;
use crate::cache::FeatureCache;
use crate::clock::{Clock, SystemClock};
use crate::ledger::VoteLedger;
use crate::models::FeatureId;
use crate::state::LoadState;
use crate::store::KeyValueStore;
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// First paint: show a fresh cached list, then revalidate
    Initial,
    /// User-requested refresh: skip the cache and fetch
    Refresh,
}

/// How a list load settled
#[derive(Debug)]
pub enum LoadOutcome {
    /// The board holds the server's current list
    Fresh,
    /// The fetch failed; previously loaded data is still displayed
    Stale { error: Error },
    /// The view was disposed before the fetch settled
    Cancelled,
}

/// Loads the feature list into the board
pub struct FeatureListLoader<A, S, C = SystemClock> {
    api: Arc<A>,
    cache: FeatureCache<S, C>,
    ledger: VoteLedger<S>,
    board: FeatureBoard,
    max_age: Duration,
}

impl<A: FeatureApi, S: KeyValueStore, C: Clock> FeatureListLoader<A, S, C> {
    pub const fn new(
        api: Arc<A>,
        cache: FeatureCache<S, C>,
        ledger: VoteLedger<S>,
        board: FeatureBoard,
        max_age: Duration,
    ) -> Self {
        Self {
            api,
            cache,
            ledger,
            board,
            max_age,
        }
    }

    /// Load the list, painting from cache first on [`LoadMode::Initial`].
    ///
    /// A failed fetch is an error only when nothing has been displayed yet;
    /// otherwise the board keeps its data and reports [`LoadOutcome::Stale`].
    pub async fn load(&self, mode: LoadMode, token: &ScopeToken) -> Result<LoadOutcome> {
        match mode {
            LoadMode::Initial => {
                self.board.set_load_state(LoadState::Loading);
                if let Some(cached) = self.cache.get_cached(self.max_age).await.into_value() {
                    tracing::debug!("Painting {} cached features", cached.len());
                    let voted = self.voted_ids().await;
                    self.board.replace_all(cached, voted.as_deref());
                }
            }
            LoadMode::Refresh => self.board.set_load_state(LoadState::Refreshing),
        }

        let Ok(fetched) = token.run(self.api.list_features()).await else {
            tracing::debug!("Feature list load cancelled");
            self.board.set_load_state(LoadState::Idle);
            return Ok(LoadOutcome::Cancelled);
        };

        match fetched {
            Ok(features) => {
                let _ = self.cache.store(&features).await;
                let voted = self.voted_ids().await;
                tracing::debug!("Loaded {} features", features.len());
                self.board.replace_all(features, voted.as_deref());
                self.board.set_load_state(LoadState::Ready);
                Ok(LoadOutcome::Fresh)
            }
            Err(error) => {
                let message = error.to_string();
                if self.board.has_loaded() {
                    tracing::warn!("Feature list refresh failed, keeping stale data: {}", message);
                    self.board.set_load_state(LoadState::Stale { message });
                    Ok(LoadOutcome::Stale { error })
                } else {
                    tracing::warn!("Feature list load failed: {}", message);
                    self.board.set_load_state(LoadState::Failed { message });
                    Err(error)
                }
            }
        }
    }

    /// The ledger's voted ids, or `None` when it could not be read.
    async fn voted_ids(&self) -> Option<Vec<FeatureId>> {
        let voted = self.ledger.voted_ids().await;
        if voted.is_degraded() {
            None
        } else {
            Some(voted.into_value())
        }
    }
}
