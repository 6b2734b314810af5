//! `SQLite`-backed key-value store

use std::path::{Path, PathBuf};

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tokio::sync::Mutex;

use super::{migrations, KeyValueStore, StoreResult};
use crate::util::unix_millis_now;

/// Durable store backed by a single `SQLite` table
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteKeyValueStore {
    /// Open a store at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                super::StoreError::Unavailable(format!(
                    "failed to create {}: {error}",
                    parent.display()
                ))
            })?;
        }

        let conn = Connection::open(&path)?;
        let store = Self::from_connection(conn, Some(path))?;
        Ok(store)
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(mut conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        // WAL is unavailable for in-memory databases
        conn.pragma_update(None, "journal_mode", "WAL").ok();
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        migrations::run(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Filesystem location of this store, if it is file-backed
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let conn = self.conn.lock().await;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)",
            params![key, value, unix_millis_now()],
        )?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM kv_store WHERE key = ?", params![key])?;
        Ok(())
    }

    async fn remove_all(&self, keys: &[&str]) -> StoreResult<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["?"; keys.len()].join(", ");
        let conn = self.conn.lock().await;
        conn.execute(
            &format!("DELETE FROM kv_store WHERE key IN ({placeholders})"),
            params_from_iter(keys.iter()),
        )?;
        Ok(())
    }
}
