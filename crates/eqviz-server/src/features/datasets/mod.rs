pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{UploadDatasetCommand, UploadDatasetError, UploadDatasetResponse};

pub use queries::{
    GetReportError, GetReportQuery, GetReportResponse, GetSummaryError, GetSummaryQuery,
    GetSummaryResponse, ListHistoryError, ListHistoryQuery, ListHistoryResponse,
};

pub use routes::datasets_routes;
