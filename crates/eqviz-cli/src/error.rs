//! Error types for the eqviz CLI
//!
//! Messages are shown to the user as-is, so each one says what to check next.

use eqviz_common::EqvizError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// The server answered with its error envelope
    #[error("Server rejected the request ({code}): {message}")]
    Api { code: String, message: String },

    /// The server answered with something other than the expected JSON
    #[error("Unexpected server response: {0}. Check that --server-url points at an eqviz server.")]
    UnexpectedResponse(String),

    /// Required file is missing
    #[error("File not found: '{0}'. Verify the file path exists and you have read permissions.")]
    FileNotFound(String),

    #[error("{0}")]
    InvalidInput(#[from] EqvizError),

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("Network request failed: {0}. Check that the server is running and the server URL is correct.")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl CliError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// True when the server reported the dataset as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code, .. } if code == "NOT_FOUND")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = CliError::api("PARSE_ERROR", "Error parsing CSV: bad line");
        assert_eq!(
            err.to_string(),
            "Server rejected the request (PARSE_ERROR): Error parsing CSV: bad line"
        );
        assert!(!err.is_not_found());
        assert!(CliError::api("NOT_FOUND", "Dataset not found").is_not_found());
    }

    #[test]
    fn test_invalid_id_message() {
        let err: CliError = eqviz_common::types::parse_dataset_id("abc").unwrap_err().into();
        assert!(err.to_string().contains("Invalid dataset id 'abc'"));
    }
}
