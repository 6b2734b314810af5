//! Shared fixtures for unit tests.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use tokio::sync::Notify;

use crate::api::FeatureApi;
use crate::models::{Feature, FeatureId, FeatureStats, NewFeature, RecentVote};
use crate::{Error, Result};

pub fn feature(id: i64, title: &str, votes: u32) -> Feature {
    Feature {
        id: FeatureId::new(id),
        title: title.to_string(),
        description: format!("{title} description"),
        vote_count: votes,
        created_at: Utc
            .timestamp_opt(1_700_000_000 + id, 0)
            .single()
            .unwrap_or_default(),
    }
}

#[derive(Debug, Default)]
pub struct CallCounts {
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub create: AtomicUsize,
    pub increment: AtomicUsize,
    pub decrement: AtomicUsize,
    pub stats: AtomicUsize,
}

impl CallCounts {
    pub fn list(&self) -> usize {
        self.list.load(Ordering::SeqCst)
    }

    pub fn get(&self) -> usize {
        self.get.load(Ordering::SeqCst)
    }

    pub fn create(&self) -> usize {
        self.create.load(Ordering::SeqCst)
    }

    pub fn votes(&self) -> usize {
        self.increment.load(Ordering::SeqCst) + self.decrement.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> usize {
        self.stats.load(Ordering::SeqCst)
    }
}

/// Scripted in-process stand-in for the feature service.
///
/// Vote calls mutate the server-side counts so stats and later list fetches
/// reflect them, like the real service.
#[derive(Debug, Default)]
pub struct FakeFeatureApi {
    features: Mutex<Vec<Feature>>,
    list_error: Mutex<Option<String>>,
    vote_error: Mutex<Option<String>>,
    fail_stats: AtomicBool,
    vote_gate: Mutex<Option<Arc<Notify>>>,
    vote_started: Notify,
    next_id: AtomicI64,
    pub calls: CallCounts,
}

impl FakeFeatureApi {
    pub fn with_features(features: Vec<Feature>) -> Self {
        let next_id = features.iter().map(|f| f.id.get()).max().unwrap_or(0) + 1;
        Self {
            features: Mutex::new(features),
            next_id: AtomicI64::new(next_id),
            ..Self::default()
        }
    }

    pub fn fail_list(&self, message: Option<&str>) {
        *self.list_error.lock().unwrap() = message.map(str::to_string);
    }

    pub fn fail_votes(&self, message: Option<&str>) {
        *self.vote_error.lock().unwrap() = message.map(str::to_string);
    }

    pub fn fail_stats(&self, fail: bool) {
        self.fail_stats.store(fail, Ordering::SeqCst);
    }

    /// Hold every vote call until the returned handle is notified.
    pub fn gate_votes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.vote_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Resolves once a vote call has reached the server.
    pub async fn vote_started(&self) {
        self.vote_started.notified().await;
    }

    pub fn server_votes(&self, id: i64) -> Option<u32> {
        self.features
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id.get() == id)
            .map(|f| f.vote_count)
    }

    pub fn set_server_votes(&self, id: i64, votes: u32) {
        if let Some(feature) = self
            .features
            .lock()
            .unwrap()
            .iter_mut()
            .find(|f| f.id.get() == id)
        {
            feature.vote_count = votes;
        }
    }

    async fn vote(&self, id: FeatureId, up: bool) -> Result<()> {
        let gate = self.vote_gate.lock().unwrap().clone();
        self.vote_started.notify_one();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(message) = self.vote_error.lock().unwrap().clone() {
            return Err(Error::Api {
                status: 400,
                message,
            });
        }

        let mut features = self.features.lock().unwrap();
        let feature = features
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| Error::NotFound("Feature not found".to_string()))?;
        feature.apply_confirmed_vote(up);
        Ok(())
    }

    fn find(&self, id: FeatureId) -> Result<Feature> {
        self.features
            .lock()
            .unwrap()
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound("Feature not found".to_string()))
    }
}

impl FeatureApi for FakeFeatureApi {
    async fn list_features(&self) -> Result<Vec<Feature>> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if let Some(message) = self.list_error.lock().unwrap().clone() {
            return Err(Error::Api {
                status: 500,
                message,
            });
        }
        Ok(self.features.lock().unwrap().clone())
    }

    async fn get_feature(&self, id: FeatureId) -> Result<Feature> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.find(id)
    }

    async fn create_feature(&self, feature: &NewFeature) -> Result<Feature> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = Feature {
            id: FeatureId::new(id),
            title: feature.title.clone(),
            description: feature.description.clone(),
            vote_count: 0,
            created_at: Utc::now(),
        };
        self.features.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn increment_vote(&self, id: FeatureId) -> Result<()> {
        self.calls.increment.fetch_add(1, Ordering::SeqCst);
        self.vote(id, true).await
    }

    async fn decrement_vote(&self, id: FeatureId) -> Result<()> {
        self.calls.decrement.fetch_add(1, Ordering::SeqCst);
        self.vote(id, false).await
    }

    async fn get_feature_stats(&self, id: FeatureId) -> Result<FeatureStats> {
        self.calls.stats.fetch_add(1, Ordering::SeqCst);
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(Error::Api {
                status: 500,
                message: "HTTP error 500".to_string(),
            });
        }
        let feature = self.find(id)?;
        Ok(FeatureStats {
            feature_id: Some(id),
            title: Some(feature.title),
            total_votes: feature.vote_count,
            recent_votes: vec![RecentVote {
                user_identifier: "127.0.0.1".to_string(),
                created_at: feature.created_at,
            }],
        })
    }
}
