pub mod history;
pub mod report;
pub mod summary;

pub use history::{ListHistoryError, ListHistoryQuery, ListHistoryResponse, DEFAULT_HISTORY_LIMIT};
pub use report::{GetReportError, GetReportQuery, GetReportResponse};
pub use summary::{GetSummaryError, GetSummaryQuery, GetSummaryResponse};
