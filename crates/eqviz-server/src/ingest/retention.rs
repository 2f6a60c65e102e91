//! Rolling dataset history
//!
//! [`RetentionManager::enforce`] keeps the newest `keep` datasets and deletes
//! the rest. Ingestion calls it twice: once with `limit - 1` before creating
//! a dataset to free a slot, and once with `limit` after the record batch has
//! landed. Concurrent uploads can briefly push the store past the limit; the
//! second sweep of whichever request finishes last brings it back.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::storage::Storage;
use crate::store::{Dataset, SharedStore, StoreResult};

pub const DEFAULT_RETENTION_LIMIT: usize = 5;

#[derive(Clone)]
pub struct RetentionManager {
    store: SharedStore,
    storage: Storage,
    limit: usize,
}

impl RetentionManager {
    /// `limit` is clamped to at least one dataset
    pub fn new(store: SharedStore, storage: Storage, limit: usize) -> Self {
        Self {
            store,
            storage,
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Sweep run before a new dataset is created
    pub async fn before_insert(&self) -> StoreResult<Vec<Uuid>> {
        self.enforce(self.limit - 1).await
    }

    /// Sweep run after a dataset and its records are committed
    pub async fn after_insert(&self) -> StoreResult<Vec<Uuid>> {
        self.enforce(self.limit).await
    }

    /// Delete every dataset beyond the newest `keep`, returning the evicted ids
    pub async fn enforce(&self, keep: usize) -> StoreResult<Vec<Uuid>> {
        let datasets = self.store.list_newest(None).await?;
        if datasets.len() <= keep {
            return Ok(Vec::new());
        }

        let mut evicted = Vec::with_capacity(datasets.len() - keep);
        for dataset in datasets.into_iter().skip(keep) {
            if remove_dataset(&self.store, &self.storage, dataset.id)
                .await?
                .is_some()
            {
                evicted.push(dataset.id);
            }
        }

        if !evicted.is_empty() {
            info!(keep, evicted = ?evicted, "Retention sweep evicted datasets");
        }

        Ok(evicted)
    }
}

/// Delete a dataset row (cascading to its records) and then its stored upload
///
/// Returns `None` when another request already removed it. File storage
/// failures are logged and do not fail the call.
pub async fn remove_dataset(
    store: &SharedStore,
    storage: &Storage,
    id: Uuid,
) -> StoreResult<Option<Dataset>> {
    let Some(dataset) = store.delete_dataset(id).await? else {
        debug!(dataset_id = %id, "Dataset already removed");
        return Ok(None);
    };

    if let Err(e) = storage.delete(&dataset.storage_key).await {
        warn!(
            dataset_id = %id,
            storage_key = %dataset.storage_key,
            error = %e,
            "Failed to remove stored upload"
        );
    }

    Ok(Some(dataset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewDataset};
    use std::sync::Arc;

    async fn seed(store: &SharedStore, storage: &Storage, count: usize) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for i in 0..count {
            let id = Uuid::new_v4();
            let file_name = format!("batch_{}.csv", i);
            let key = Storage::build_key(id, &file_name);
            storage.upload(&key, b"Type\nPump\n".to_vec(), None).await.unwrap();
            store
                .create_dataset(NewDataset {
                    id,
                    file_name,
                    storage_key: key,
                    file_size: 10,
                    checksum: String::new(),
                })
                .await
                .unwrap();
            ids.push(id);
        }
        ids
    }

    fn fixture() -> (SharedStore, Storage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store: SharedStore = Arc::new(MemoryStore::new());
        let storage = Storage::local(dir.path());
        (store, storage, dir)
    }

    #[tokio::test]
    async fn test_enforce_keeps_newest() {
        let (store, storage, _dir) = fixture();
        let ids = seed(&store, &storage, 7).await;
        let manager = RetentionManager::new(store.clone(), storage.clone(), 5);

        let evicted = manager.enforce(5).await.unwrap();
        assert_eq!(evicted, vec![ids[1], ids[0]]);

        let remaining: Vec<Uuid> = store
            .list_newest(None)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(remaining, vec![ids[6], ids[5], ids[4], ids[3], ids[2]]);
    }

    #[tokio::test]
    async fn test_enforce_is_idempotent() {
        let (store, storage, _dir) = fixture();
        seed(&store, &storage, 6).await;
        let manager = RetentionManager::new(store.clone(), storage, 5);

        assert_eq!(manager.enforce(5).await.unwrap().len(), 1);
        assert!(manager.enforce(5).await.unwrap().is_empty());
        assert_eq!(store.count_datasets().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_before_insert_frees_one_slot() {
        let (store, storage, _dir) = fixture();
        seed(&store, &storage, 5).await;
        let manager = RetentionManager::new(store.clone(), storage, 5);

        assert_eq!(manager.before_insert().await.unwrap().len(), 1);
        assert_eq!(store.count_datasets().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_before_insert_below_limit_is_noop() {
        let (store, storage, _dir) = fixture();
        seed(&store, &storage, 3).await;
        let manager = RetentionManager::new(store.clone(), storage, 5);

        assert!(manager.before_insert().await.unwrap().is_empty());
        assert!(manager.after_insert().await.unwrap().is_empty());
        assert_eq!(store.count_datasets().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_eviction_removes_stored_upload() {
        let (store, storage, dir) = fixture();
        let ids = seed(&store, &storage, 2).await;
        let oldest = store.get_dataset(ids[0]).await.unwrap().unwrap();
        let newest = store.get_dataset(ids[1]).await.unwrap().unwrap();
        let manager = RetentionManager::new(store, storage, 1);

        manager.after_insert().await.unwrap();
        assert!(!dir.path().join(&oldest.storage_key).exists());
        assert!(dir.path().join(&newest.storage_key).exists());
    }

    #[tokio::test]
    async fn test_remove_missing_dataset_is_not_an_error() {
        let (store, storage, _dir) = fixture();
        let removed = remove_dataset(&store, &storage, Uuid::new_v4()).await.unwrap();
        assert!(removed.is_none());
    }

    #[test]
    fn test_limit_is_at_least_one() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let manager = RetentionManager::new(store, Storage::local("/tmp/unused"), 0);
        assert_eq!(manager.limit(), 1);
    }
}
