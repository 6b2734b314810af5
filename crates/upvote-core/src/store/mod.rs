//! Durable key-value storage for device-local state

mod memory;
mod migrations;
mod sqlite;

use thiserror::Error;

pub use memory::MemoryStore;
pub use sqlite::SqliteKeyValueStore;

/// Key holding the JSON array of feature ids this device voted for
pub const USER_VOTES_KEY: &str = "user_votes";
/// Key holding the cached feature list as `{data, timestamp}`
pub const CACHED_FEATURES_KEY: &str = "cached_features";
/// Key holding the informational device label
pub const DEVICE_LABEL_KEY: &str = "user_ip";

/// Every key owned by this crate, cleared together on a full reset
pub const ALL_KEYS: [&str; 3] = [USER_VOTES_KEY, CACHED_FEATURES_KEY, DEVICE_LABEL_KEY];

/// Errors raised by a [`KeyValueStore`] backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Invalid stored payload for '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode payload for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for durable byte storage keyed by string (async)
///
/// Every call may fail; callers in this crate treat failures as non-fatal.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Remove `key` if present
    async fn remove(&self, key: &str) -> StoreResult<()>;

    /// Remove every key in `keys` atomically
    async fn remove_all(&self, keys: &[&str]) -> StoreResult<()>;
}

/// Read and decode a JSON value stored under `key`.
pub(crate) async fn get_json<S, T>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
{
    let Some(bytes) = store.get(key).await? else {
        return Ok(None);
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Encode `value` as JSON and store it under `key`.
pub(crate) async fn set_json<S, T>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    S: KeyValueStore,
    T: serde::Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &bytes).await
}
