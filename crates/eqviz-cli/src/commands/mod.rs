//! CLI command implementations
//!
//! Each subcommand has its own module with a `run` function.

pub mod health;
pub mod history;
pub mod report;
pub mod summary;
pub mod upload;

use chrono::{DateTime, Utc};

/// Timestamps are printed in UTC, to the second
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}
