//! Informational device label (e.g. last known client address).
//!
//! Kept for display and debugging only; the vote ledger never consults it.

use std::sync::Arc;

use crate::best_effort::BestEffort;
use crate::store::{KeyValueStore, DEVICE_LABEL_KEY};
use crate::util::normalize_text_option;

pub struct DeviceLabel<S> {
    store: Arc<S>,
}

impl<S> Clone for DeviceLabel<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore> DeviceLabel<S> {
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Persist `label`; blank labels remove the stored value.
    pub async fn set(&self, label: &str) -> BestEffort<()> {
        let result = match normalize_text_option(Some(label.to_string())) {
            Some(label) => self.store.set(DEVICE_LABEL_KEY, label.as_bytes()).await,
            None => self.store.remove(DEVICE_LABEL_KEY).await,
        };
        BestEffort::from_result(result, (), "Storing device label")
    }

    pub async fn get(&self) -> BestEffort<Option<String>> {
        let result = self
            .store
            .get(DEVICE_LABEL_KEY)
            .await
            .map(|bytes| bytes.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()));
        BestEffort::from_result(result, None, "Reading device label")
    }
}
