//! PostgreSQL dataset store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eqviz_common::types::EquipmentRecord;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{Dataset, DatasetStore, NewDataset, NewRecord, StoreError, StoreResult};

/// Rows per INSERT statement; seven binds each keeps us well under the
/// 65535 parameter ceiling.
const CHUNK_SIZE: usize = 500;

const DATASET_COLUMNS: &str = "id, seq, file_name, storage_key, file_size, checksum, created_at";

#[derive(sqlx::FromRow)]
struct DatasetRow {
    id: Uuid,
    seq: i64,
    file_name: String,
    storage_key: String,
    file_size: i64,
    checksum: String,
    created_at: DateTime<Utc>,
}

impl From<DatasetRow> for Dataset {
    fn from(row: DatasetRow) -> Self {
        Self {
            id: row.id,
            seq: row.seq,
            file_name: row.file_name,
            storage_key: row.storage_key,
            file_size: row.file_size,
            checksum: row.checksum,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: i64,
    dataset_id: Uuid,
    position: i32,
    equipment_name: String,
    equipment_type: String,
    flowrate: f64,
    pressure: f64,
    temperature: f64,
}

impl From<RecordRow> for EquipmentRecord {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            dataset_id: row.dataset_id,
            position: row.position,
            equipment_name: row.equipment_name,
            equipment_type: row.equipment_type,
            flowrate: row.flowrate,
            pressure: row.pressure,
            temperature: row.temperature,
        }
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn map_insert_error(err: sqlx::Error, dataset_id: Uuid) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            StoreError::DatasetMissing(dataset_id)
        },
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Duplicate(dataset_id)
        },
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl DatasetStore for PgStore {
    async fn create_dataset(&self, new: NewDataset) -> StoreResult<Dataset> {
        let sql = format!(
            "INSERT INTO datasets (id, file_name, storage_key, file_size, checksum) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {DATASET_COLUMNS}"
        );

        let row = sqlx::query_as::<_, DatasetRow>(&sql)
            .bind(new.id)
            .bind(&new.file_name)
            .bind(&new.storage_key)
            .bind(new.file_size)
            .bind(&new.checksum)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, new.id))?;

        Ok(row.into())
    }

    async fn insert_records(&self, dataset_id: Uuid, records: &[NewRecord]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;

        // Lock the parent row so a concurrent sweep cannot delete it mid-batch
        let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM datasets WHERE id = $1 FOR SHARE")
            .bind(dataset_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(StoreError::DatasetMissing(dataset_id));
        }

        let mut inserted = 0u64;
        for chunk in records.chunks(CHUNK_SIZE) {
            let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO equipment_records (\
                 dataset_id, position, equipment_name, equipment_type, \
                 flowrate, pressure, temperature) ",
            );

            query_builder.push_values(chunk.iter(), |mut b, record| {
                b.push_bind(dataset_id)
                    .push_bind(record.position)
                    .push_bind(&record.equipment_name)
                    .push_bind(&record.equipment_type)
                    .push_bind(record.flowrate)
                    .push_bind(record.pressure)
                    .push_bind(record.temperature);
            });

            let result = query_builder
                .build()
                .execute(&mut *tx)
                .await
                .map_err(|e| map_insert_error(e, dataset_id))?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        debug!(dataset_id = %dataset_id, inserted, "Inserted equipment records");
        Ok(inserted)
    }

    async fn delete_dataset(&self, id: Uuid) -> StoreResult<Option<Dataset>> {
        let sql = format!("DELETE FROM datasets WHERE id = $1 RETURNING {DATASET_COLUMNS}");

        let row = sqlx::query_as::<_, DatasetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn get_dataset(&self, id: Uuid) -> StoreResult<Option<Dataset>> {
        let sql = format!("SELECT {DATASET_COLUMNS} FROM datasets WHERE id = $1");

        let row = sqlx::query_as::<_, DatasetRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_newest(&self, limit: Option<usize>) -> StoreResult<Vec<Dataset>> {
        // LIMIT NULL is no limit in PostgreSQL
        let sql = format!(
            "SELECT {DATASET_COLUMNS} FROM datasets \
             ORDER BY created_at DESC, seq DESC \
             LIMIT $1"
        );

        let rows = sqlx::query_as::<_, DatasetRow>(&sql)
            .bind(limit.map(|l| l as i64))
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_datasets(&self) -> StoreResult<usize> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM datasets")
            .fetch_one(&self.pool)
            .await?;

        Ok(count as usize)
    }

    async fn list_records(&self, dataset_id: Uuid) -> StoreResult<Vec<EquipmentRecord>> {
        let rows = sqlx::query_as::<_, RecordRow>(
            "SELECT id, dataset_id, position, equipment_name, equipment_type, \
                    flowrate, pressure, temperature \
             FROM equipment_records \
             WHERE dataset_id = $1 \
             ORDER BY position",
        )
        .bind(dataset_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_records(&self, dataset_id: Uuid) -> StoreResult<usize> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM equipment_records WHERE dataset_id = $1",
        )
        .bind(dataset_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count as usize)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
