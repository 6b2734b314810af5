//! Device-local vote ledger.
//!
//! Records which features this device has voted for so vote affordances can be
//! rendered without a server round trip. The ledger is advisory: it is never
//! reconciled against the server's vote records, and every store failure is
//! absorbed (logged) rather than propagated.

use std::sync::Arc;

use crate::best_effort::BestEffort;
use crate::models::FeatureId;
use crate::store::{get_json, set_json, KeyValueStore, StoreError, USER_VOTES_KEY};

/// Durable set of feature ids voted for on this device
pub struct VoteLedger<S> {
    store: Arc<S>,
}

impl<S> Clone for VoteLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> VoteLedger<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Whether this device has a recorded vote for `id`; `false` if the store is unreadable.
    pub async fn has_voted(&self, id: FeatureId) -> BestEffort<bool> {
        self.voted_ids().await.map(|ids| ids.contains(&id))
    }

    /// All voted ids in the order they were recorded; empty if the store is unreadable.
    pub async fn voted_ids(&self) -> BestEffort<Vec<FeatureId>> {
        let result = self.read().await;
        BestEffort::from_result(result, Vec::new(), "Reading vote ledger")
    }

    /// Record a vote for `id`. No-op if already present.
    pub async fn add_vote(&self, id: FeatureId) -> BestEffort<()> {
        let result: Result<(), StoreError> = async {
            let mut ids = self.read().await?;
            if ids.contains(&id) {
                return Ok(());
            }
            ids.push(id);
            set_json(self.store.as_ref(), USER_VOTES_KEY, &ids).await
        }
        .await;
        BestEffort::from_result(result, (), "Recording vote")
    }

    /// Forget the vote for `id`. No-op if absent.
    pub async fn remove_vote(&self, id: FeatureId) -> BestEffort<()> {
        let result: Result<(), StoreError> = async {
            let mut ids = self.read().await?;
            let before = ids.len();
            ids.retain(|voted| *voted != id);
            if ids.len() == before {
                return Ok(());
            }
            set_json(self.store.as_ref(), USER_VOTES_KEY, &ids).await
        }
        .await;
        BestEffort::from_result(result, (), "Removing vote")
    }

    /// Empty the ledger entirely.
    pub async fn clear(&self) -> BestEffort<()> {
        let result = self.store.remove(USER_VOTES_KEY).await;
        BestEffort::from_result(result, (), "Clearing vote ledger")
    }

    /// Load the stored id list.
    ///
    /// A payload that no longer parses is treated as empty so the next write
    /// replaces it; backend read failures are returned so callers never write
    /// over a ledger they could not read.
    async fn read(&self) -> Result<Vec<FeatureId>, StoreError> {
        match get_json::<_, Vec<FeatureId>>(self.store.as_ref(), USER_VOTES_KEY).await {
            Ok(ids) => Ok(ids.unwrap_or_default()),
            Err(error @ StoreError::Corrupt { .. }) => {
                tracing::warn!("Discarding unreadable vote ledger: {}", error);
                Ok(Vec::new())
            }
            Err(error) => Err(error),
        }
    }
}
