//! Row to record normalization
//!
//! Column lookup is driven by [`FIELD_LABELS`]: each field lists its accepted
//! header labels in priority order, and the first candidate holding a
//! non-empty cell wins. Normalization is total. Missing text falls back to
//! [`UNKNOWN_LABEL`] and missing or unparseable numbers fall back to `0.0`.

use csv::StringRecord;
use eqviz_common::types::UNKNOWN_LABEL;
use uuid::Uuid;

use crate::store::NewRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EquipmentName,
    EquipmentType,
    Flowrate,
    Pressure,
    Temperature,
}

/// Accepted header labels per field, primary label first
pub const FIELD_LABELS: [(Field, &[&str]); 5] = [
    (Field::EquipmentName, &["Equipment Name", "equipment_name"]),
    (Field::EquipmentType, &["Type", "type"]),
    (Field::Flowrate, &["Flowrate", "flowrate"]),
    (Field::Pressure, &["Pressure", "pressure"]),
    (Field::Temperature, &["Temperature", "temperature"]),
];

impl Field {
    pub fn candidates(self) -> &'static [&'static str] {
        FIELD_LABELS
            .iter()
            .find(|(field, _)| *field == self)
            .map_or(&[], |(_, labels)| *labels)
    }
}

/// One data row viewed through its file's header labels
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    headers: &'a [String],
    cells: &'a StringRecord,
}

impl<'a> RawRow<'a> {
    pub fn new(headers: &'a [String], cells: &'a StringRecord) -> Self {
        Self { headers, cells }
    }

    /// Trimmed cell under `label`, `None` when the column or cell is missing
    /// or blank. Duplicate labels resolve to the leftmost column.
    pub fn get(&self, label: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|h| h == label)?;
        let value = self.cells.get(index)?.trim();
        (!value.is_empty()).then_some(value)
    }

    fn first_present(&self, field: Field) -> Option<&'a str> {
        field.candidates().iter().find_map(|label| self.get(label))
    }
}

/// Parse a cell as a finite `f64`, anything else becomes `0.0`
pub fn coerce_f64(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn resolve_text(row: &RawRow<'_>, field: Field) -> String {
    row.first_present(field)
        .unwrap_or(UNKNOWN_LABEL)
        .to_string()
}

fn resolve_number(row: &RawRow<'_>, field: Field) -> f64 {
    coerce_f64(row.first_present(field))
}

/// Build the record for the row at `position` of dataset `dataset_id`
pub fn normalize(row: &RawRow<'_>, dataset_id: Uuid, position: i32) -> NewRecord {
    NewRecord {
        dataset_id,
        position,
        equipment_name: resolve_text(row, Field::EquipmentName),
        equipment_type: resolve_text(row, Field::EquipmentType),
        flowrate: resolve_number(row, Field::Flowrate),
        pressure: resolve_number(row, Field::Pressure),
        temperature: resolve_number(row, Field::Temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn normalize_one(labels: &[&str], cells: &[&str]) -> NewRecord {
        let headers = headers(labels);
        let record = StringRecord::from(cells.to_vec());
        normalize(&RawRow::new(&headers, &record), Uuid::nil(), 0)
    }

    #[test]
    fn test_primary_labels() {
        let record = normalize_one(
            &["Equipment Name", "Type", "Flowrate", "Pressure", "Temperature"],
            &["Pump1", "Pump", "10.5", "2.0", "abc"],
        );

        assert_eq!(record.equipment_name, "Pump1");
        assert_eq!(record.equipment_type, "Pump");
        assert_eq!(record.flowrate, 10.5);
        assert_eq!(record.pressure, 2.0);
        assert_eq!(record.temperature, 0.0);
    }

    #[test]
    fn test_fallback_labels() {
        let record = normalize_one(
            &["equipment_name", "type", "flowrate", "pressure", "temperature"],
            &["Valve-7", "Valve", "3", "4.25", "-12.5"],
        );

        assert_eq!(record.equipment_name, "Valve-7");
        assert_eq!(record.equipment_type, "Valve");
        assert_eq!(record.flowrate, 3.0);
        assert_eq!(record.pressure, 4.25);
        assert_eq!(record.temperature, -12.5);
    }

    #[test]
    fn test_blank_primary_falls_through_to_fallback() {
        let record = normalize_one(&["Type", "type"], &["   ", "Compressor"]);
        assert_eq!(record.equipment_type, "Compressor");
    }

    #[test]
    fn test_empty_row_yields_defaults() {
        let record = normalize_one(&[], &[]);

        assert_eq!(record.equipment_name, UNKNOWN_LABEL);
        assert_eq!(record.equipment_type, UNKNOWN_LABEL);
        assert_eq!(record.flowrate, 0.0);
        assert_eq!(record.pressure, 0.0);
        assert_eq!(record.temperature, 0.0);
    }

    #[test]
    fn test_unrelated_columns_yield_defaults() {
        let record = normalize_one(&["Site", "Operator"], &["North", "Kim"]);

        assert_eq!(record.equipment_name, UNKNOWN_LABEL);
        assert_eq!(record.equipment_type, UNKNOWN_LABEL);
        assert_eq!(record.flowrate, 0.0);
    }

    #[test]
    fn test_short_row_treats_missing_cells_as_absent() {
        let record = normalize_one(&["Equipment Name", "Type", "Flowrate"], &["Pump2"]);

        assert_eq!(record.equipment_name, "Pump2");
        assert_eq!(record.equipment_type, UNKNOWN_LABEL);
        assert_eq!(record.flowrate, 0.0);
    }

    #[test]
    fn test_cells_are_trimmed() {
        let record = normalize_one(&["Equipment Name", "Flowrate"], &["  Pump3 ", " 7.5 "]);

        assert_eq!(record.equipment_name, "Pump3");
        assert_eq!(record.flowrate, 7.5);
    }

    #[test]
    fn test_duplicate_header_uses_leftmost_column() {
        let record = normalize_one(&["Flowrate", "Flowrate"], &["1.5", "9.0"]);
        assert_eq!(record.flowrate, 1.5);
    }

    #[test]
    fn test_coerce_rejects_non_finite() {
        assert_eq!(coerce_f64(Some("NaN")), 0.0);
        assert_eq!(coerce_f64(Some("inf")), 0.0);
        assert_eq!(coerce_f64(Some("-infinity")), 0.0);
        assert_eq!(coerce_f64(Some("1e400")), 0.0);
        assert_eq!(coerce_f64(Some("1,000")), 0.0);
        assert_eq!(coerce_f64(None), 0.0);
        assert_eq!(coerce_f64(Some("1e3")), 1000.0);
    }

    #[test]
    fn test_every_field_has_candidates() {
        for (field, labels) in FIELD_LABELS {
            assert_eq!(field.candidates(), labels);
            assert_eq!(labels.len(), 2);
        }
    }

    #[test]
    fn test_binds_dataset_and_position() {
        let headers = headers(&["Equipment Name"]);
        let cells = StringRecord::from(vec!["P"]);
        let id = Uuid::new_v4();

        let record = normalize(&RawRow::new(&headers, &cells), id, 41);
        assert_eq!(record.dataset_id, id);
        assert_eq!(record.position, 41);
    }
}
