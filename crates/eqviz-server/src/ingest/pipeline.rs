//! Upload ingestion
//!
//! Order of operations for one upload:
//!
//! 1. pre-insert retention sweep
//! 2. store the uploaded bytes, then create the dataset row
//! 3. parse the body and normalize every row
//! 4. insert all records in one atomic batch
//! 5. post-insert retention sweep
//!
//! A failure in step 3 or 4 deletes the dataset created in step 2 together
//! with its stored file, so a failed upload leaves nothing behind.

use eqviz_common::types::DatasetInfo;
use std::path::Path;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use super::normalizer::normalize;
use super::parser::{parse_csv, ParseError};
use super::retention::{remove_dataset, RetentionManager};
use crate::storage::Storage;
use crate::store::{Dataset, NewDataset, NewRecord, SharedStore, StoreError};

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Error parsing CSV: {0}")]
    Parse(#[from] ParseError),

    #[error("Too many rows in upload: {0}")]
    TooManyRows(usize),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("File storage error: {0}")]
    Storage(#[source] anyhow::Error),
}

/// Summary of a finished ingestion, for logging and tests
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub dataset: DatasetInfo,
    pub records: usize,
    pub evicted: Vec<Uuid>,
}

#[derive(Clone)]
pub struct IngestPipeline {
    store: SharedStore,
    storage: Storage,
    retention: RetentionManager,
}

/// Base name of an uploaded path, accepting either separator
pub fn display_name(file_name: &str) -> &str {
    let trimmed = file_name.trim();
    let base = trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed);
    Path::new(base)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(base)
}

impl IngestPipeline {
    pub fn new(store: SharedStore, storage: Storage, retention_limit: usize) -> Self {
        let retention = RetentionManager::new(store.clone(), storage.clone(), retention_limit);
        Self {
            store,
            storage,
            retention,
        }
    }

    pub fn retention(&self) -> &RetentionManager {
        &self.retention
    }

    /// Ingest one uploaded file and return its public metadata
    pub async fn ingest(&self, bytes: Vec<u8>, file_name: &str) -> Result<DatasetInfo, IngestError> {
        self.ingest_detailed(bytes, file_name)
            .await
            .map(|outcome| outcome.dataset)
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn ingest_detailed(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<IngestOutcome, IngestError> {
        let mut evicted = self.retention.before_insert().await?;

        let dataset = self.create_dataset(bytes.clone(), display_name(file_name)).await?;

        let records = match self.load_records(&dataset, &bytes).await {
            Ok(count) => count,
            Err(e) => {
                warn!(dataset_id = %dataset.id, error = %e, "Ingestion failed, rolling back dataset");
                if let Err(rollback) = remove_dataset(&self.store, &self.storage, dataset.id).await {
                    error!(dataset_id = %dataset.id, error = %rollback, "Rollback of failed dataset failed");
                }
                return Err(e);
            },
        };

        // The batch is committed; a failed sweep is picked up by the next upload
        match self.retention.after_insert().await {
            Ok(ids) => evicted.extend(ids),
            Err(e) => warn!(error = %e, "Post-insert retention sweep failed"),
        }

        info!(
            dataset_id = %dataset.id,
            file_name = %dataset.file_name,
            records,
            evicted = evicted.len(),
            "Dataset ingested"
        );

        Ok(IngestOutcome {
            dataset: dataset.info(),
            records,
            evicted,
        })
    }

    async fn create_dataset(&self, bytes: Vec<u8>, file_name: &str) -> Result<Dataset, IngestError> {
        let id = Uuid::new_v4();
        let key = Storage::build_key(id, file_name);

        let upload = self
            .storage
            .upload(&key, bytes, Some("text/csv"))
            .await
            .map_err(IngestError::Storage)?;

        let created = self
            .store
            .create_dataset(NewDataset {
                id,
                file_name: file_name.to_string(),
                storage_key: upload.key.clone(),
                file_size: upload.size,
                checksum: upload.checksum,
            })
            .await;

        match created {
            Ok(dataset) => Ok(dataset),
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&upload.key).await {
                    warn!(storage_key = %upload.key, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(e.into())
            },
        }
    }

    async fn load_records(&self, dataset: &Dataset, bytes: &[u8]) -> Result<usize, IngestError> {
        let table = parse_csv(bytes)?;

        let records = table
            .raw_rows()
            .enumerate()
            .map(|(position, row)| {
                let position =
                    i32::try_from(position).map_err(|_| IngestError::TooManyRows(table.len()))?;
                Ok(normalize(&row, dataset.id, position))
            })
            .collect::<Result<Vec<NewRecord>, IngestError>>()?;

        self.store.insert_records(dataset.id, &records).await?;
        Ok(records.len())
    }
}
