use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::resume::{ResumePatch, ResumeRecord};
use crate::store::{ResumeStore, StoreError, StoredResume};

/// Process-local store used in tests and when no database is configured.
#[derive(Debug, Default)]
pub struct MemoryResumeStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, StoredResume>,
}

impl MemoryResumeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResumeStore for MemoryResumeStore {
    async fn create(&self, record: ResumeRecord) -> Result<StoredResume, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let now = Utc::now();
        let stored = StoredResume {
            id: inner.last_id,
            record,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Option<StoredResume>, StoreError> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: ResumePatch) -> Result<Option<StoredResume>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        row.record = row.record.merged(patch);
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.inner.write().await.rows.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<StoredResume>, StoreError> {
        Ok(self.inner.read().await.rows.values().cloned().collect())
    }
}
