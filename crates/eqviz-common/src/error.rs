//! Error types for eqviz

use thiserror::Error;

/// Result type alias for eqviz operations
pub type Result<T> = std::result::Result<T, EqvizError>;

/// Main error type shared by the eqviz crates
#[derive(Error, Debug)]
pub enum EqvizError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid dataset id '{0}': expected a UUID")]
    InvalidDatasetId(String),
}
