//! Résumé persistence. Handlers depend on the `ResumeStore` trait only; the binary
//! picks Postgres when `DATABASE_URL` is set and the in-memory store otherwise.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::resume::{ResumePatch, ResumeRecord};

pub use memory::MemoryResumeStore;
pub use postgres::PgResumeStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredResume {
    pub id: i64,
    #[serde(flatten)]
    pub record: ResumeRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn create(&self, record: ResumeRecord) -> Result<StoredResume, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<StoredResume>, StoreError>;

    /// Overlays `patch` on the stored record. `None` if no such résumé.
    async fn update(&self, id: i64, patch: ResumePatch) -> Result<Option<StoredResume>, StoreError>;

    /// Returns false if no such résumé.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;

    /// All résumés, oldest first.
    async fn list(&self) -> Result<Vec<StoredResume>, StoreError>;
}
