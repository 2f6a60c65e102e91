//! Dataset API routes
//!
//! - `POST /api/v1/datasets/upload` - Upload a CSV file (multipart field `file`)
//! - `GET /api/v1/datasets/history` - Most recent datasets, newest first
//! - `GET /api/v1/datasets/:id/summary` - Aggregate summary of one dataset
//! - `GET /api/v1/datasets/:id/report` - PDF report of one dataset

use crate::api::response::{ApiResponse, ErrorResponse};
use crate::features::FeatureState;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::{
    commands::{UploadDatasetCommand, UploadDatasetError},
    queries::{
        GetReportError, GetReportQuery, GetSummaryError, GetSummaryQuery, ListHistoryError,
        ListHistoryQuery,
    },
};

/// Room for multipart boundaries and part headers on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn datasets_routes(max_upload_bytes: usize) -> Router<FeatureState> {
    Router::new()
        .route(
            "/upload",
            post(upload_dataset)
                .layer(DefaultBodyLimit::max(max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))),
        )
        .route("/history", get(list_history))
        .route("/:id/summary", get(get_summary))
        .route("/:id/report", get(get_report))
}

// ============================================================================
// Command Handlers (Write Operations)
// ============================================================================

/// Upload a CSV file and ingest it as a new dataset
///
/// # Response
///
/// - `201 Created` - `{id, file_name, created_at}`
/// - `400 Bad Request` - `VALIDATION_ERROR` or `PARSE_ERROR`
/// - `413 Payload Too Large` - File exceeds `EQVIZ_MAX_UPLOAD_BYTES`
#[tracing::instrument(skip(state, multipart))]
async fn upload_dataset(
    State(state): State<FeatureState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, DatasetApiError> {
    let mut multipart =
        multipart.map_err(|e| UploadDatasetError::Multipart(e.body_text()))?;
    let limit = state.datasets.max_upload_bytes;

    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            UploadDatasetError::TooLarge { limit }
        } else {
            UploadDatasetError::Multipart(e.body_text())
        }
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                UploadDatasetError::TooLarge { limit }
            } else {
                UploadDatasetError::Multipart(e.body_text())
            }
        })?;
        upload = Some((file_name, data.to_vec()));
        break;
    }

    let (file_name, content) = upload.ok_or(UploadDatasetError::FileRequired)?;
    let command = UploadDatasetCommand { file_name, content };

    let response = super::commands::upload::handle(state, command).await?;

    tracing::info!(
        dataset_id = %response.id,
        file_name = %response.file_name,
        "Dataset uploaded via API"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))).into_response())
}

// ============================================================================
// Query Handlers (Read Operations)
// ============================================================================

#[derive(Debug, Deserialize)]
struct HistoryParams {
    limit: Option<String>,
}

/// List the most recent datasets
///
/// `limit` defaults to 5 and is clamped to `1..=EQVIZ_RETENTION_LIMIT`.
#[tracing::instrument(skip(state))]
async fn list_history(
    State(state): State<FeatureState>,
    Query(params): Query<HistoryParams>,
) -> Result<Response, DatasetApiError> {
    let limit = match params.limit.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<i64>().map_err(|_| ListHistoryError::InvalidLimit)?),
    };

    let response = super::queries::history::handle(state, ListHistoryQuery { limit }).await?;

    let meta = json!({
        "limit": response.limit,
        "retention_limit": response.retention_limit,
    });

    Ok(ApiResponse::success_with_meta(response.datasets, meta).into_response())
}

/// Aggregate summary of one dataset
#[tracing::instrument(skip(state))]
async fn get_summary(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let response =
        super::queries::summary::handle(state, GetSummaryQuery { dataset_id: id }).await?;

    Ok(ApiResponse::success(response).into_response())
}

/// Render the dataset report as a downloadable attachment
#[tracing::instrument(skip(state))]
async fn get_report(
    State(state): State<FeatureState>,
    Path(id): Path<String>,
) -> Result<Response, DatasetApiError> {
    let report = super::queries::report::handle(state, GetReportQuery { dataset_id: id }).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, report.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", report.file_name),
            ),
        ],
        report.content,
    )
        .into_response())
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum DatasetApiError {
    Upload(UploadDatasetError),
    History(ListHistoryError),
    Summary(GetSummaryError),
    Report(GetReportError),
}

impl From<UploadDatasetError> for DatasetApiError {
    fn from(err: UploadDatasetError) -> Self {
        Self::Upload(err)
    }
}

impl From<ListHistoryError> for DatasetApiError {
    fn from(err: ListHistoryError) -> Self {
        Self::History(err)
    }
}

impl From<GetSummaryError> for DatasetApiError {
    fn from(err: GetSummaryError) -> Self {
        Self::Summary(err)
    }
}

impl From<GetReportError> for DatasetApiError {
    fn from(err: GetReportError) -> Self {
        Self::Report(err)
    }
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

fn internal_error(context: &str, err: &dyn std::fmt::Display) -> Response {
    tracing::error!("{}: {}", context, err);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred",
    )
}

impl IntoResponse for DatasetApiError {
    fn into_response(self) -> Response {
        match self {
            DatasetApiError::Upload(err @ UploadDatasetError::TooLarge { .. }) => {
                error_response(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", err.to_string())
            },
            DatasetApiError::Upload(err @ UploadDatasetError::Parse(_)) => {
                error_response(StatusCode::BAD_REQUEST, "PARSE_ERROR", err.to_string())
            },
            DatasetApiError::Upload(UploadDatasetError::Ingest(err)) => {
                internal_error("Ingestion failed", &err)
            },
            DatasetApiError::Upload(err) => {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            },

            DatasetApiError::History(err @ ListHistoryError::InvalidLimit) => {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            },
            DatasetApiError::History(ListHistoryError::Store(err)) => {
                internal_error("Store error while listing history", &err)
            },

            DatasetApiError::Summary(err @ GetSummaryError::InvalidId(_)) => {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            },
            DatasetApiError::Summary(GetSummaryError::NotFound) => {
                error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "Dataset not found or empty")
            },
            DatasetApiError::Summary(GetSummaryError::Store(err)) => {
                internal_error("Store error while summarizing", &err)
            },

            DatasetApiError::Report(err @ GetReportError::InvalidId(_)) => {
                error_response(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            },
            DatasetApiError::Report(GetReportError::NotFound) => {
                error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "Dataset not found")
            },
            DatasetApiError::Report(GetReportError::Store(err)) => {
                internal_error("Store error while building report", &err)
            },
            DatasetApiError::Report(GetReportError::Render(err)) => {
                internal_error("Report rendering failed", &err)
            },
        }
    }
}

impl std::fmt::Display for DatasetApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upload(e) => write!(f, "{}", e),
            Self::History(e) => write!(f, "{}", e),
            Self::Summary(e) => write!(f, "{}", e),
            Self::Report(e) => write!(f, "{}", e),
        }
    }
}
