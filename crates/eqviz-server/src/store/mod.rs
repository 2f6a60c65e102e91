//! Durable dataset store
//!
//! The ingestion pipeline, retention manager and query handlers only talk to
//! the [`DatasetStore`] trait. Two implementations ship with the server:
//!
//! - [`PgStore`]: PostgreSQL via SQLx, the production backend
//! - [`MemoryStore`]: process-local, used by tests and `EQVIZ_STORE=memory`
//!
//! Every implementation must provide atomic dataset creation, atomic batch
//! record insertion, cascading delete-by-id and read-your-writes consistency.
//! Datasets are ordered newest first by `created_at`, ties broken by the
//! insertion sequence `seq`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eqviz_common::types::{DatasetInfo, EquipmentRecord};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database query failed: {0}")]
    Database(#[from] sqlx::Error),

    /// The owning dataset disappeared before its records were written
    #[error("Dataset '{0}' does not exist")]
    DatasetMissing(Uuid),

    #[error("Dataset '{0}' already exists")]
    Duplicate(Uuid),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A persisted dataset row
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: Uuid,
    /// Insertion sequence, strictly increasing across creations
    pub seq: i64,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub checksum: String,
    pub created_at: DateTime<Utc>,
}

impl Dataset {
    pub fn info(&self) -> DatasetInfo {
        DatasetInfo {
            id: self.id,
            file_name: self.file_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Input for [`DatasetStore::create_dataset`]
#[derive(Debug, Clone)]
pub struct NewDataset {
    pub id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub checksum: String,
}

/// A normalized record waiting for its batch insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub dataset_id: Uuid,
    pub position: i32,
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

#[async_trait]
pub trait DatasetStore: Send + Sync {
    /// Persist a dataset row; `created_at` and `seq` are assigned by the store
    async fn create_dataset(&self, dataset: NewDataset) -> StoreResult<Dataset>;

    /// Insert all records for one dataset in a single atomic write
    ///
    /// Fails with [`StoreError::DatasetMissing`] if the dataset no longer exists;
    /// in that case nothing is written.
    async fn insert_records(&self, dataset_id: Uuid, records: &[NewRecord]) -> StoreResult<u64>;

    /// Delete a dataset and its records, returning the removed row
    async fn delete_dataset(&self, id: Uuid) -> StoreResult<Option<Dataset>>;

    async fn get_dataset(&self, id: Uuid) -> StoreResult<Option<Dataset>>;

    /// Datasets ordered newest first, optionally truncated to `limit`
    async fn list_newest(&self, limit: Option<usize>) -> StoreResult<Vec<Dataset>>;

    async fn count_datasets(&self) -> StoreResult<usize>;

    /// Records of one dataset in persisted order
    async fn list_records(&self, dataset_id: Uuid) -> StoreResult<Vec<EquipmentRecord>>;

    async fn count_records(&self, dataset_id: Uuid) -> StoreResult<usize>;

    async fn health_check(&self) -> StoreResult<()>;
}

pub type SharedStore = Arc<dyn DatasetStore>;
