//! Vote toggling with a per-feature in-flight guard.
//!
//! A vote is applied only after the server confirms it: the ledger is written,
//! then the board entry's flag and count are updated. A failed call leaves both
//! untouched and raises a dismissible notice.

use std::sync::Arc;

use super::board::{BeginVote, FeatureBoard};
use super::scope::ScopeToken;
use crate::api::FeatureApi;
use crate::ledger::VoteLedger;
use crate::models::FeatureId;
use crate::state::Notice;
use crate::store::KeyValueStore;
use crate::{Error, Result};

/// What a vote request ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Voted,
    Unvoted,
    /// Another vote on the same feature was still in flight
    Ignored,
    /// The feature already had the requested state
    Unchanged,
    /// The view was disposed before the server answered
    Cancelled,
}

impl VoteOutcome {
    /// Whether the server confirmed a change
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Voted | Self::Unvoted)
    }
}

/// Clears the in-flight flag however the vote ends.
struct VoteGuard {
    board: FeatureBoard,
    id: FeatureId,
    armed: bool,
}

impl VoteGuard {
    const fn new(board: FeatureBoard, id: FeatureId) -> Self {
        Self {
            board,
            id,
            armed: true,
        }
    }

    fn confirm(mut self, voted: bool) {
        self.armed = false;
        self.board.finish_vote(self.id, Some(voted));
    }
}

impl Drop for VoteGuard {
    fn drop(&mut self) {
        if self.armed {
            self.board.finish_vote(self.id, None);
        }
    }
}

/// Submits votes against the service and records confirmed ones
pub struct VoteCoordinator<A, S> {
    api: Arc<A>,
    ledger: VoteLedger<S>,
    board: FeatureBoard,
}

impl<A, S> Clone for VoteCoordinator<A, S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            ledger: self.ledger.clone(),
            board: self.board.clone(),
        }
    }
}

impl<A: FeatureApi, S: KeyValueStore> VoteCoordinator<A, S> {
    pub const fn new(api: Arc<A>, ledger: VoteLedger<S>, board: FeatureBoard) -> Self {
        Self { api, ledger, board }
    }

    /// Flip this device's vote on `id`.
    pub async fn toggle(&self, id: FeatureId, token: &ScopeToken) -> Result<VoteOutcome> {
        self.submit(id, None, token).await
    }

    /// Bring this device's vote on `id` to `voted`, doing nothing if it already is.
    pub async fn set_vote(
        &self,
        id: FeatureId,
        voted: bool,
        token: &ScopeToken,
    ) -> Result<VoteOutcome> {
        self.submit(id, Some(voted), token).await
    }

    async fn submit(
        &self,
        id: FeatureId,
        desired: Option<bool>,
        token: &ScopeToken,
    ) -> Result<VoteOutcome> {
        let target = match self.board.begin_vote(id, desired) {
            BeginVote::Missing => {
                return Err(Error::NotFound(format!("Feature {id} is not loaded")));
            }
            BeginVote::Busy => {
                tracing::debug!("Vote on feature {} already in flight, ignoring", id);
                return Ok(VoteOutcome::Ignored);
            }
            BeginVote::Unchanged => return Ok(VoteOutcome::Unchanged),
            BeginVote::Started { target } => target,
        };
        let guard = VoteGuard::new(self.board.clone(), id);

        let call = async {
            if target {
                self.api.increment_vote(id).await
            } else {
                self.api.decrement_vote(id).await
            }
        };

        match token.run(call).await {
            Err(_) => {
                tracing::debug!("Vote on feature {} cancelled", id);
                Ok(VoteOutcome::Cancelled)
            }
            Ok(Err(error)) => {
                tracing::warn!("Vote on feature {} failed: {}", id, error);
                self.board.set_notice(Notice::vote_error(id, error.to_string()));
                Err(error)
            }
            Ok(Ok(())) => {
                // Ledger failures are absorbed and logged inside the ledger.
                let _ = if target {
                    self.ledger.add_vote(id).await
                } else {
                    self.ledger.remove_vote(id).await
                };
                guard.confirm(target);
                tracing::info!(
                    "Feature {} {}",
                    id,
                    if target { "voted" } else { "unvoted" }
                );
                Ok(if target {
                    VoteOutcome::Voted
                } else {
                    VoteOutcome::Unvoted
                })
            }
        }
    }
}
