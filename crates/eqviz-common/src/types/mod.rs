//! Wire types shared by the eqviz server and CLI
//!
//! These are the JSON shapes returned by the HTTP API. The server builds them
//! from persisted state; the CLI deserializes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EqvizError;

/// Parse a user-supplied dataset id, ignoring surrounding whitespace
pub fn parse_dataset_id(raw: &str) -> crate::Result<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| EqvizError::InvalidDatasetId(raw.to_string()))
}

/// Label used when a text column is missing from an uploaded row
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Public metadata of one uploaded dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub id: Uuid,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// One normalized equipment reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: i64,
    pub dataset_id: Uuid,
    /// Zero-based row index in the uploaded file
    pub position: i32,
    pub equipment_name: String,
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Per-field means, rounded to two decimals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Averages {
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

/// Number of records sharing one equipment type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub equipment_type: String,
    pub count: usize,
}

/// Aggregate view of one dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub dataset_id: Uuid,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub total_count: usize,
    pub averages: Averages,
    /// Ordered by `equipment_type` ascending
    pub type_distribution: Vec<TypeCount>,
    /// All records in persisted order
    pub data: Vec<EquipmentRecord>,
}

impl Summary {
    /// Look up the count for one equipment type
    pub fn count_for_type(&self, equipment_type: &str) -> Option<usize> {
        self.type_distribution
            .iter()
            .find(|entry| entry.equipment_type == equipment_type)
            .map(|entry| entry.count)
    }
}
