//! In-process batch store, seeded from a JSON fixture

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::BatchService;
use crate::error::{CoachError, Result};
use crate::model::{Batch, BatchId, BatchStatus, NewBatch};

/// On-disk fixture format
///
/// ```json
/// {
///   "coachings": { "c1": [ { "id": "b1", "name": "Physics", "status": "active" } ] },
///   "assignments": { "u2": ["b1"] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fixture {
    /// Batches per coaching id, in server order
    #[serde(default)]
    pub coachings: HashMap<String, Vec<Batch>>,
    /// Batch ids each user is assigned to
    #[serde(default)]
    pub assignments: HashMap<String, Vec<BatchId>>,
}

#[derive(Debug, Default)]
struct Store {
    coachings: HashMap<String, Vec<Batch>>,
    assignments: HashMap<String, HashSet<BatchId>>,
}

/// `BatchService` that keeps everything in memory
#[derive(Debug)]
pub struct MemoryBatchService {
    caller_id: String,
    latency: Option<Duration>,
    store: RwLock<Store>,
}

impl MemoryBatchService {
    /// Empty store acting on behalf of `caller_id`
    pub fn new(caller_id: impl Into<String>) -> Self {
        Self::from_fixture(Fixture::default(), caller_id)
    }

    pub fn from_fixture(fixture: Fixture, caller_id: impl Into<String>) -> Self {
        let assignments = fixture
            .assignments
            .into_iter()
            .map(|(user, ids)| (user, ids.into_iter().collect()))
            .collect();

        Self {
            caller_id: caller_id.into(),
            latency: None,
            store: RwLock::new(Store {
                coachings: fixture.coachings,
                assignments,
            }),
        }
    }

    /// Load a fixture file from disk
    pub fn from_fixture_file(path: impl AsRef<Path>, caller_id: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let fixture: Fixture = serde_json::from_str(&content)
            .map_err(|e| CoachError::invalid_fixture(path, e.to_string()))?;

        for (coaching_id, batches) in &fixture.coachings {
            let mut seen = HashSet::new();
            for batch in batches {
                if !seen.insert(&batch.id) {
                    return Err(CoachError::invalid_fixture(
                        path,
                        format!("duplicate batch id '{}' in coaching '{}'", batch.id, coaching_id),
                    ));
                }
            }
        }

        debug!(path = %path.display(), coachings = fixture.coachings.len(), "loaded fixture");
        Ok(Self::from_fixture(fixture, caller_id))
    }

    /// Delay every call, to make loading states visible
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency).filter(|d| !d.is_zero());
        self
    }

    /// Assign a user to a batch
    pub fn assign(&self, user_id: impl Into<String>, batch_id: BatchId) {
        let mut store = self.write();
        store
            .assignments
            .entry(user_id.into())
            .or_default()
            .insert(batch_id);
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Store> {
        // A panic while holding the lock leaves plain data behind; keep serving it
        self.store.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Store> {
        self.store.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_assigned(store: &Store, user_id: &str, batch: &Batch) -> bool {
        let taught = batch
            .teacher
            .as_ref()
            .and_then(|t| t.id.as_deref())
            .is_some_and(|id| id == user_id);

        taught
            || store
                .assignments
                .get(user_id)
                .is_some_and(|ids| ids.contains(&batch.id))
    }
}

#[async_trait]
impl BatchService for MemoryBatchService {
    async fn list_batches(
        &self,
        coaching_id: &str,
        status: Option<BatchStatus>,
    ) -> Result<Vec<Batch>> {
        self.simulate_latency().await;

        let store = self.read();
        let batches = store
            .coachings
            .get(coaching_id)
            .ok_or_else(|| CoachError::not_found("coaching", coaching_id))?;

        Ok(batches
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect())
    }

    async fn get_my_batches(&self, coaching_id: &str) -> Result<Vec<Batch>> {
        self.simulate_latency().await;

        let store = self.read();
        let batches = store
            .coachings
            .get(coaching_id)
            .ok_or_else(|| CoachError::not_found("coaching", coaching_id))?;

        Ok(batches
            .iter()
            .filter(|b| Self::is_assigned(&store, &self.caller_id, b))
            .cloned()
            .collect())
    }

    async fn create_batch(&self, coaching_id: &str, draft: NewBatch) -> Result<Batch> {
        draft.validate()?;
        self.simulate_latency().await;

        let batch = draft.into_batch(BatchId::new(Uuid::new_v4().to_string()));

        let mut store = self.write();
        store
            .coachings
            .entry(coaching_id.to_string())
            .or_default()
            .push(batch.clone());

        debug!(coaching_id, batch_id = %batch.id, "created batch");
        Ok(batch)
    }

    async fn get_batch(&self, coaching_id: &str, batch_id: &BatchId) -> Result<Batch> {
        self.simulate_latency().await;

        let store = self.read();
        store
            .coachings
            .get(coaching_id)
            .and_then(|batches| batches.iter().find(|b| &b.id == batch_id))
            .cloned()
            .ok_or_else(|| CoachError::not_found("batch", batch_id.as_str()))
    }

    async fn set_batch_status(
        &self,
        coaching_id: &str,
        batch_id: &BatchId,
        status: BatchStatus,
    ) -> Result<Batch> {
        self.simulate_latency().await;

        let mut store = self.write();
        let batch = store
            .coachings
            .get_mut(coaching_id)
            .and_then(|batches| batches.iter_mut().find(|b| &b.id == batch_id))
            .ok_or_else(|| CoachError::not_found("batch", batch_id.as_str()))?;

        batch.status = status;
        debug!(coaching_id, batch_id = %batch_id, status = %status, "updated batch status");
        Ok(batch.clone())
    }
}
