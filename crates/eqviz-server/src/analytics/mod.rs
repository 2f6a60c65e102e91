//! Per-dataset aggregation
//!
//! [`summarize`] reads a dataset and its records from the store and hands
//! them to [`build_summary`], which does the arithmetic without any I/O.

use eqviz_common::types::{Averages, EquipmentRecord, Summary, TypeCount};
use std::collections::BTreeMap;
use thiserror::Error;
use uuid::Uuid;

use crate::store::{Dataset, DatasetStore, StoreError};

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("Dataset not found")]
    NotFound,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Magnitude from which an `f64` has no fractional digits left to round
const ROUNDING_CEILING: f64 = 1e15;

/// Round to two decimals, halves away from zero
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() || value.abs() >= ROUNDING_CEILING {
        return value;
    }
    (value * 100.0).round() / 100.0
}

fn mean(records: &[EquipmentRecord], field: impl Fn(&EquipmentRecord) -> f64) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let n = records.len() as f64;
    let total: f64 = records.iter().map(&field).sum();
    let mean = if total.is_finite() {
        total / n
    } else {
        // The plain sum overflowed; scale each term first
        records.iter().map(|r| field(r) / n).sum()
    };
    round2(mean)
}

pub fn averages(records: &[EquipmentRecord]) -> Averages {
    Averages {
        flowrate: mean(records, |r| r.flowrate),
        pressure: mean(records, |r| r.pressure),
        temperature: mean(records, |r| r.temperature),
    }
}

/// Record count per equipment type, ordered by type name
pub fn type_distribution(records: &[EquipmentRecord]) -> Vec<TypeCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        *counts.entry(record.equipment_type.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(equipment_type, count)| TypeCount {
            equipment_type: equipment_type.to_string(),
            count,
        })
        .collect()
}

/// Summary of `dataset` over `records`, `None` when there are no records
pub fn build_summary(dataset: &Dataset, mut records: Vec<EquipmentRecord>) -> Option<Summary> {
    if records.is_empty() {
        return None;
    }

    records.sort_by_key(|r| r.position);

    Some(Summary {
        dataset_id: dataset.id,
        file_name: dataset.file_name.clone(),
        created_at: dataset.created_at,
        total_count: records.len(),
        averages: averages(&records),
        type_distribution: type_distribution(&records),
        data: records,
    })
}

/// Load and summarize one dataset
///
/// Unknown datasets and datasets without records are both `NotFound`.
pub async fn summarize(store: &dyn DatasetStore, dataset_id: Uuid) -> Result<Summary, SummaryError> {
    let dataset = store
        .get_dataset(dataset_id)
        .await?
        .ok_or(SummaryError::NotFound)?;

    let records = store.list_records(dataset_id).await?;

    build_summary(&dataset, records).ok_or(SummaryError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(position: i32, equipment_type: &str, flowrate: f64) -> EquipmentRecord {
        EquipmentRecord {
            id: i64::from(position) + 1,
            dataset_id: Uuid::nil(),
            position,
            equipment_name: format!("E{}", position),
            equipment_type: equipment_type.to_string(),
            flowrate,
            pressure: 1.0,
            temperature: 0.0,
        }
    }

    fn dataset() -> Dataset {
        Dataset {
            id: Uuid::nil(),
            seq: 1,
            file_name: "plant.csv".to_string(),
            storage_key: "datasets/x/plant.csv".to_string(),
            file_size: 1,
            checksum: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(10.666666), 10.67);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_averages_are_rounded() {
        let records = vec![record(0, "Pump", 10.0), record(1, "Pump", 11.0), record(2, "Pump", 11.0)];
        let avg = averages(&records);
        assert_eq!(avg.flowrate, 10.67);
        assert_eq!(avg.pressure, 1.0);
        assert_eq!(avg.temperature, 0.0);
    }

    #[test]
    fn test_round2_leaves_huge_values_alone() {
        assert_eq!(round2(1e307), 1e307);
        assert_eq!(round2(-1.7e308), -1.7e308);
        assert_eq!(round2(1e15 + 0.5), 1e15 + 0.5);
    }

    #[test]
    fn test_averages_of_huge_values_stay_finite() {
        let mut records = vec![record(0, "Pump", 1e307), record(1, "Pump", 1e307)];
        for r in &mut records {
            r.pressure = 1.7e308;
        }

        let avg = averages(&records);
        assert_eq!(avg.flowrate, 1e307);
        assert_eq!(avg.pressure, 1.7e308);
        assert_eq!(avg.temperature, 0.0);

        let json = serde_json::to_value(&avg).unwrap();
        assert_eq!(json["pressure"], serde_json::json!(1.7e308));
    }

    #[test]
    fn test_averages_of_nothing_are_zero() {
        assert_eq!(averages(&[]), Averages::default());
    }

    #[test]
    fn test_type_distribution_is_sorted() {
        let records = vec![
            record(0, "Valve", 1.0),
            record(1, "Pump", 1.0),
            record(2, "Valve", 1.0),
            record(3, "Compressor", 1.0),
        ];
        let distribution = type_distribution(&records);
        let pairs: Vec<(&str, usize)> = distribution
            .iter()
            .map(|t| (t.equipment_type.as_str(), t.count))
            .collect();
        assert_eq!(pairs, vec![("Compressor", 1), ("Pump", 1), ("Valve", 2)]);
    }

    #[test]
    fn test_build_summary_orders_data_by_position() {
        let summary =
            build_summary(&dataset(), vec![record(1, "Pump", 2.0), record(0, "Valve", 4.0)]).unwrap();
        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.data[0].position, 0);
        assert_eq!(summary.averages.flowrate, 3.0);
        assert_eq!(summary.file_name, "plant.csv");
    }

    #[test]
    fn test_build_summary_without_records_is_none() {
        assert!(build_summary(&dataset(), Vec::new()).is_none());
    }
}
