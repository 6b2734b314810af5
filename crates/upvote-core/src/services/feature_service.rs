//! Wiring of the API client, durable store, and shared board used by clients.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{FeatureApi, HttpFeatureApi};
use crate::best_effort::BestEffort;
use crate::cache::FeatureCache;
use crate::clock::{Clock, SystemClock};
use crate::config::ClientConfig;
use crate::device::DeviceLabel;
use crate::ledger::VoteLedger;
use crate::models::FeatureId;
use crate::store::{KeyValueStore, SqliteKeyValueStore, StoreError, ALL_KEYS};
use crate::sync::{
    FeatureBoard, FeatureDetailLoader, FeatureListLoader, FeatureSubmitter, VoteCoordinator,
};
use crate::Result;

/// Every component a client needs, sharing one store and one board.
pub struct FeatureService<A, S, C = SystemClock> {
    api: Arc<A>,
    store: Arc<S>,
    board: FeatureBoard,
    ledger: VoteLedger<S>,
    cache: FeatureCache<S, C>,
    device: DeviceLabel<S>,
    votes: VoteCoordinator<A, S>,
    list: FeatureListLoader<A, S, C>,
    detail: FeatureDetailLoader<A, S>,
    submitter: FeatureSubmitter<A>,
}

impl FeatureService<HttpFeatureApi, SqliteKeyValueStore> {
    /// Open the on-disk store at `db_path` and connect to the configured API.
    pub fn open_path(db_path: impl Into<PathBuf>, config: &ClientConfig) -> Result<Self> {
        let store = open_store_with_recovery(&db_path.into())?;
        let api = HttpFeatureApi::from_config(config)?;
        Ok(Self::new(Arc::new(api), Arc::new(store), config))
    }
}

impl<A: FeatureApi, S: KeyValueStore> FeatureService<A, S> {
    pub fn new(api: Arc<A>, store: Arc<S>, config: &ClientConfig) -> Self {
        Self::with_clock(api, store, SystemClock, config)
    }
}

impl<A: FeatureApi, S: KeyValueStore, C: Clock + Clone> FeatureService<A, S, C> {
    pub fn with_clock(api: Arc<A>, store: Arc<S>, clock: C, config: &ClientConfig) -> Self {
        let board = FeatureBoard::new();
        let ledger = VoteLedger::new(Arc::clone(&store));
        let cache = FeatureCache::with_clock(Arc::clone(&store), clock);
        let device = DeviceLabel::new(Arc::clone(&store));
        let votes = VoteCoordinator::new(Arc::clone(&api), ledger.clone(), board.clone());
        let list = FeatureListLoader::new(
            Arc::clone(&api),
            cache.clone(),
            ledger.clone(),
            board.clone(),
            config.cache_max_age(),
        );
        let detail = FeatureDetailLoader::new(
            Arc::clone(&api),
            ledger.clone(),
            board.clone(),
            votes.clone(),
        );
        let submitter = FeatureSubmitter::new(Arc::clone(&api), board.clone());

        Self {
            api,
            store,
            board,
            ledger,
            cache,
            device,
            votes,
            list,
            detail,
            submitter,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub const fn board(&self) -> &FeatureBoard {
        &self.board
    }

    pub const fn ledger(&self) -> &VoteLedger<S> {
        &self.ledger
    }

    pub const fn cache(&self) -> &FeatureCache<S, C> {
        &self.cache
    }

    pub const fn device(&self) -> &DeviceLabel<S> {
        &self.device
    }

    pub const fn votes(&self) -> &VoteCoordinator<A, S> {
        &self.votes
    }

    pub const fn list(&self) -> &FeatureListLoader<A, S, C> {
        &self.list
    }

    pub const fn detail(&self) -> &FeatureDetailLoader<A, S> {
        &self.detail
    }

    pub const fn submitter(&self) -> &FeatureSubmitter<A> {
        &self.submitter
    }

    /// Drop a feature deleted on the server from the board and the ledger.
    pub async fn forget_feature(&self, id: FeatureId) -> BestEffort<()> {
        self.board.remove(id);
        self.ledger.remove_vote(id).await
    }

    /// Erase votes, cached list, and device label from this device.
    ///
    /// Displayed features stay listed but lose their voted flags.
    pub async fn reset_local_data(&self) -> BestEffort<()> {
        let result = self.store.remove_all(&ALL_KEYS).await;
        let reset = BestEffort::from_result(result, (), "Clearing local data");
        if !reset.is_degraded() {
            tracing::info!("Cleared local vote, cache, and device data");
            let snapshot = self.board.snapshot();
            if snapshot.has_loaded {
                let features = snapshot
                    .features()
                    .map(|entry| entry.feature.clone())
                    .collect();
                self.board.replace_all(features, Some(&[]));
            }
        }
        reset
    }
}

fn open_store_with_recovery(db_path: &Path) -> Result<SqliteKeyValueStore> {
    match SqliteKeyValueStore::open(db_path) {
        Ok(store) => Ok(store),
        Err(error) if is_corrupted_db_error(&error) => {
            tracing::warn!(
                "Local store at {} is unreadable: {}. Moving it aside and starting fresh.",
                db_path.display(),
                error
            );
            quarantine_corrupted_db_file(db_path)?;
            Ok(SqliteKeyValueStore::open(db_path)?)
        }
        Err(error) => Err(error.into()),
    }
}

fn is_corrupted_db_error(error: &StoreError) -> bool {
    error
        .to_string()
        .to_ascii_lowercase()
        .contains("file is not a database")
}

fn quarantine_corrupted_db_file(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        return Ok(());
    }
    let timestamp = chrono::Utc::now().timestamp_millis();
    let file_name = db_path
        .file_name()
        .map_or_else(|| "upvote.db".into(), |name| name.to_string_lossy());
    let backup_path = db_path.with_file_name(format!("{file_name}.corrupt-{timestamp}"));
    std::fs::rename(db_path, &backup_path)?;
    tracing::warn!(
        "Moved corrupted local store from {} to {}",
        db_path.display(),
        backup_path.display()
    );
    Ok(())
}
