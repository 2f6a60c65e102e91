//! Upload ingestion
//!
//! - **normalizer**: raw row to typed record, table-driven column fallback
//! - **parser**: comma-delimited body to header labels plus rows
//! - **retention**: bounded history of the most recent datasets
//! - **pipeline**: store, parse, batch insert and sweep for one upload

pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod retention;

pub use normalizer::{coerce_f64, normalize, Field, RawRow, FIELD_LABELS};
pub use parser::{parse_csv, ParseError, ParsedTable};
pub use pipeline::{IngestError, IngestOutcome, IngestPipeline};
pub use retention::{RetentionManager, DEFAULT_RETENTION_LIMIT};
