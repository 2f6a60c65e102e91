use crate::features::FeatureState;
use crate::report::{ReportError, ReportInput};
use crate::store::StoreError;
use mediator::Request;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetReportQuery {
    pub dataset_id: String,
}

#[derive(Debug, Clone)]
pub struct GetReportResponse {
    /// Attachment name, `report_<id>.<ext>`
    pub file_name: String,
    pub content_type: &'static str,
    pub content: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum GetReportError {
    #[error("Invalid dataset id '{0}'")]
    InvalidId(String),
    #[error("Dataset not found")]
    NotFound,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Report error: {0}")]
    Render(#[from] ReportError),
}

impl Request<Result<GetReportResponse, GetReportError>> for GetReportQuery {}

impl GetReportQuery {
    pub fn validate(&self) -> Result<Uuid, GetReportError> {
        Uuid::parse_str(self.dataset_id.trim())
            .map_err(|_| GetReportError::InvalidId(self.dataset_id.clone()))
    }
}

#[tracing::instrument(skip(state))]
pub async fn handle(
    state: FeatureState,
    query: GetReportQuery,
) -> Result<GetReportResponse, GetReportError> {
    let dataset_id = query.validate()?;

    let dataset = state
        .store
        .get_dataset(dataset_id)
        .await?
        .ok_or(GetReportError::NotFound)?;
    let records = state.store.list_records(dataset_id).await?;

    let info = dataset.info();
    let input = ReportInput::capped(&info, &records, state.datasets.report_row_limit);
    let content = state.renderer.render(&input)?;

    tracing::debug!(
        dataset_id = %dataset_id,
        total = input.total_count,
        listed = input.records.len(),
        bytes = content.len(),
        "Report rendered"
    );

    Ok(GetReportResponse {
        file_name: format!("report_{}.{}", dataset_id, state.renderer.file_extension()),
        content_type: state.renderer.content_type(),
        content,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatasetConfig;
    use crate::storage::Storage;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn state(dir: &tempfile::TempDir, report_row_limit: usize) -> FeatureState {
        FeatureState::new(
            Arc::new(MemoryStore::new()),
            Storage::local(dir.path()),
            DatasetConfig {
                report_row_limit,
                ..DatasetConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_unknown_dataset_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let query = GetReportQuery {
            dataset_id: Uuid::new_v4().to_string(),
        };
        assert!(matches!(
            handle(state(&dir, 20), query).await,
            Err(GetReportError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_empty_dataset_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir, 20);
        let info = state
            .pipeline
            .ingest(b"Equipment Name\n".to_vec(), "empty.csv")
            .await
            .unwrap();

        let report = handle(
            state,
            GetReportQuery {
                dataset_id: info.id.to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(report.content_type, "application/pdf");
        assert_eq!(report.file_name, format!("report_{}.pdf", info.id));
        assert!(report.content.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_listing_is_capped_but_total_is_not() {
        let dir = tempfile::tempdir().unwrap();
        let state = state(&dir, 2);

        let mut csv = String::from("Equipment Name,Type,Flowrate\n");
        for i in 0..5 {
            csv.push_str(&format!("Unit-{},Pump,1.0\n", i));
        }
        let info = state.pipeline.ingest(csv.into_bytes(), "five.csv").await.unwrap();

        let report = handle(
            state,
            GetReportQuery {
                dataset_id: info.id.to_string(),
            },
        )
        .await
        .unwrap();

        let text = String::from_utf8_lossy(&report.content);
        assert!(text.contains("(Total Equipment Count: 5) Tj"));
        assert!(text.contains("(Unit-1) Tj"));
        assert!(!text.contains("(Unit-2) Tj"));
    }
}
