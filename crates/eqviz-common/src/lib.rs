//! eqviz Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, utilities, and error handling for the eqviz workspace.
//!
//! # Overview
//!
//! This crate provides functionality used by both the server and the CLI:
//!
//! - **Types**: Wire types for datasets, equipment records and summaries
//! - **Error Handling**: Common error and result types
//! - **Checksums**: Integrity digests for uploaded files
//! - **Logging**: Centralized `tracing` subscriber setup
//!
//! # Example
//!
//! ```no_run
//! use eqviz_common::checksum::sha256_hex;
//!
//! let digest = sha256_hex(b"Equipment Name,Type\nPump1,Pump\n");
//! assert_eq!(digest.len(), 64);
//! ```

pub mod checksum;
pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{EqvizError, Result};
