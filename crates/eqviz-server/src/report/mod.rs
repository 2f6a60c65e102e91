//! Printable dataset reports
//!
//! Handlers depend on the [`ReportRenderer`] trait only. The listing handed to
//! a renderer is already capped; `total_count` always carries the full count.

use eqviz_common::types::{DatasetInfo, EquipmentRecord};
use std::sync::Arc;
use thiserror::Error;

pub mod pdf;

pub use pdf::PdfReportRenderer;

pub const DEFAULT_REPORT_ROW_LIMIT: usize = 20;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a renderer needs for one report
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub dataset: &'a DatasetInfo,
    pub total_count: usize,
    /// Records in persisted order, capped to the report row limit
    pub records: &'a [EquipmentRecord],
}

impl<'a> ReportInput<'a> {
    /// Build an input listing at most `row_limit` of `records`
    pub fn capped(dataset: &'a DatasetInfo, records: &'a [EquipmentRecord], row_limit: usize) -> Self {
        Self {
            dataset,
            total_count: records.len(),
            records: &records[..records.len().min(row_limit)],
        }
    }
}

pub trait ReportRenderer: Send + Sync {
    fn content_type(&self) -> &'static str;

    fn file_extension(&self) -> &'static str;

    fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError>;
}

pub type SharedRenderer = Arc<dyn ReportRenderer>;
