//! eqviz Server Library
#![recursion_limit = "256"]
//!
//! HTTP service that ingests equipment telemetry CSV files and keeps a
//! bounded history of the most recent uploads.
//!
//! # Overview
//!
//! - **Ingestion**: CSV parsing, per-row normalization and atomic record insert
//! - **Retention**: at most `EQVIZ_RETENTION_LIMIT` datasets survive any upload
//! - **Analytics**: per-dataset averages and equipment type distribution
//! - **Reports**: paginated PDF rendering of a dataset
//! - **Storage**: original files kept on local disk or an S3-compatible bucket
//!
//! # Architecture
//!
//! Features are vertical slices under [`features`] split into commands
//! (uploads, which also trigger retention) and queries (history, summary,
//! report). The dataset store is a trait object so PostgreSQL and the
//! in-memory store are interchangeable.
//!
//! # Example
//!
//! ```no_run
//! use eqviz_server::{api, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     api::serve(config).await?;
//!     Ok(())
//! }
//! ```

pub mod analytics;
pub mod api;
pub mod config;
pub mod cqrs;
pub mod db;
pub mod error;
pub mod features;
pub mod ingest;
pub mod middleware;
pub mod report;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use error::{ApiResult, AppError};
