//! API response types
//!
//! Matches the server's response envelopes. Payload types come from
//! `eqviz_common::types`.

use serde::{Deserialize, Serialize};

pub use eqviz_common::types::{DatasetInfo, EquipmentRecord, Summary, TypeCount};

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Error envelope returned with every non-2xx JSON response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// `meta` of the history response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMeta {
    pub limit: usize,
    pub retention_limit: usize,
}

/// History listing with the limits the server applied
#[derive(Debug, Clone)]
pub struct History {
    pub datasets: Vec<DatasetInfo>,
    pub meta: Option<HistoryMeta>,
}

/// A downloaded report
#[derive(Debug, Clone)]
pub struct ReportFile {
    /// Name suggested by `Content-Disposition`, if any
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_envelope_deserializes() {
        let json = serde_json::json!({
            "success": true,
            "data": [{
                "id": "123e4567-e89b-12d3-a456-426614174000",
                "file_name": "plant.csv",
                "created_at": "2026-01-18T10:00:00Z"
            }],
            "meta": {"limit": 5, "retention_limit": 5}
        });

        let response: ApiResponse<Vec<DatasetInfo>> = serde_json::from_value(json).unwrap();
        let meta: HistoryMeta = serde_json::from_value(response.meta.unwrap()).unwrap();

        assert_eq!(response.data[0].file_name, "plant.csv");
        assert_eq!(meta.retention_limit, 5);
    }

    #[test]
    fn test_error_envelope_deserializes() {
        let json = serde_json::json!({
            "success": false,
            "error": {"code": "NOT_FOUND", "message": "Dataset not found"}
        });

        let envelope: ErrorEnvelope = serde_json::from_value(json).unwrap();
        assert_eq!(envelope.error.code, "NOT_FOUND");
    }
}
