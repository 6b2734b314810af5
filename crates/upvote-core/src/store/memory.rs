//! In-memory key-value store with failure injection

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use super::{KeyValueStore, StoreError, StoreResult};

/// Volatile store for tests and ephemeral sessions
///
/// Reads and writes can be switched to fail independently, which lets callers
/// exercise the soft-failure paths of the ledger and cache.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `set`/`remove`/`remove_all` fail until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    fn check_writes(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("write rejected".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("read rejected".to_string()));
        }
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        self.check_writes()?;
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.check_writes()?;
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn remove_all(&self, keys: &[&str]) -> StoreResult<()> {
        self.check_writes()?;
        let mut entries = self.entries.lock().await;
        for key in keys {
            entries.remove(*key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_failure_injection() {
        let store = MemoryStore::new();
        store.set("k", b"v").await.unwrap();

        store.set_fail_reads(true);
        assert!(store.get("k").await.is_err());
        store.set_fail_reads(false);
        assert!(store.get("k").await.unwrap().is_some());

        store.set_fail_writes(true);
        assert!(store.set("k", b"w").await.is_err());
        assert!(store.remove_all(&["k"]).await.is_err());
        store.set_fail_writes(false);
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some(&b"v"[..]));
    }
}
