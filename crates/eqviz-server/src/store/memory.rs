//! In-process dataset store

use async_trait::async_trait;
use chrono::Utc;
use eqviz_common::types::EquipmentRecord;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Dataset, DatasetStore, NewDataset, NewRecord, StoreError, StoreResult};

#[derive(Default)]
struct Inner {
    datasets: HashMap<Uuid, Dataset>,
    records: HashMap<Uuid, Vec<EquipmentRecord>>,
    next_seq: i64,
    next_record_id: i64,
    peak_datasets: usize,
}

/// Dataset store backed by process memory
///
/// Each trait method takes the lock once, so every operation is atomic on its
/// own while separate calls from concurrent requests interleave freely, the
/// same guarantees the PostgreSQL store gives.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Highest number of datasets held at any instant since creation
    pub async fn peak_dataset_count(&self) -> usize {
        self.inner.read().await.peak_datasets
    }

    /// Total records across all datasets
    pub async fn total_record_count(&self) -> usize {
        self.inner.read().await.records.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    async fn create_dataset(&self, new: NewDataset) -> StoreResult<Dataset> {
        let mut inner = self.inner.write().await;

        if inner.datasets.contains_key(&new.id) {
            return Err(StoreError::Duplicate(new.id));
        }

        inner.next_seq += 1;
        let dataset = Dataset {
            id: new.id,
            seq: inner.next_seq,
            file_name: new.file_name,
            storage_key: new.storage_key,
            file_size: new.file_size,
            checksum: new.checksum,
            created_at: Utc::now(),
        };

        inner.datasets.insert(dataset.id, dataset.clone());
        inner.records.insert(dataset.id, Vec::new());
        inner.peak_datasets = inner.peak_datasets.max(inner.datasets.len());

        Ok(dataset)
    }

    async fn insert_records(&self, dataset_id: Uuid, records: &[NewRecord]) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;

        if !inner.datasets.contains_key(&dataset_id) {
            return Err(StoreError::DatasetMissing(dataset_id));
        }

        let first_id = inner.next_record_id + 1;
        inner.next_record_id += records.len() as i64;

        let batch: Vec<EquipmentRecord> = records
            .iter()
            .zip(first_id..)
            .map(|(record, id)| EquipmentRecord {
                id,
                dataset_id,
                position: record.position,
                equipment_name: record.equipment_name.clone(),
                equipment_type: record.equipment_type.clone(),
                flowrate: record.flowrate,
                pressure: record.pressure,
                temperature: record.temperature,
            })
            .collect();

        let owned = inner.records.entry(dataset_id).or_default();
        owned.extend(batch);
        owned.sort_by_key(|r| r.position);

        Ok(records.len() as u64)
    }

    async fn delete_dataset(&self, id: Uuid) -> StoreResult<Option<Dataset>> {
        let mut inner = self.inner.write().await;
        inner.records.remove(&id);
        Ok(inner.datasets.remove(&id))
    }

    async fn get_dataset(&self, id: Uuid) -> StoreResult<Option<Dataset>> {
        Ok(self.inner.read().await.datasets.get(&id).cloned())
    }

    async fn list_newest(&self, limit: Option<usize>) -> StoreResult<Vec<Dataset>> {
        let inner = self.inner.read().await;

        let mut datasets: Vec<Dataset> = inner.datasets.values().cloned().collect();
        datasets.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        if let Some(limit) = limit {
            datasets.truncate(limit);
        }

        Ok(datasets)
    }

    async fn count_datasets(&self) -> StoreResult<usize> {
        Ok(self.inner.read().await.datasets.len())
    }

    async fn list_records(&self, dataset_id: Uuid) -> StoreResult<Vec<EquipmentRecord>> {
        Ok(self
            .inner
            .read()
            .await
            .records
            .get(&dataset_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn count_records(&self, dataset_id: Uuid) -> StoreResult<usize> {
        Ok(self
            .inner
            .read()
            .await
            .records
            .get(&dataset_id)
            .map_or(0, Vec::len))
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
