//! Summary command implementation

use crate::api::{client::ApiClient, Summary};
use crate::commands::format_timestamp;
use crate::error::Result;
use crate::OutputFormat;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use eqviz_common::types::parse_dataset_id;

pub async fn run(server_url: &str, id: &str, format: OutputFormat, records: bool) -> Result<()> {
    let id = parse_dataset_id(id)?;

    let client = ApiClient::new(server_url)?;
    let summary = client.summary(id).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => print!("{}", format_summary(&summary, records)),
    }

    Ok(())
}

pub fn format_summary(summary: &Summary, include_records: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", summary.file_name.cyan().bold()));
    out.push_str(&format!("  ID:       {}\n", summary.dataset_id));
    out.push_str(&format!("  Uploaded: {}\n", format_timestamp(&summary.created_at)));
    out.push_str(&format!("  Records:  {}\n\n", summary.total_count));

    let mut averages = Table::new();
    averages
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Average", "Value"]);
    averages.add_row(vec!["Flowrate".to_string(), summary.averages.flowrate.to_string()]);
    averages.add_row(vec!["Pressure".to_string(), summary.averages.pressure.to_string()]);
    averages.add_row(vec![
        "Temperature".to_string(),
        summary.averages.temperature.to_string(),
    ]);
    out.push_str(&format!("{}\n\n", averages));

    let mut types = Table::new();
    types
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Type", "Count"]);
    for entry in &summary.type_distribution {
        types.add_row(vec![entry.equipment_type.clone(), entry.count.to_string()]);
    }
    out.push_str(&format!("{}\n", types));

    if include_records {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Equipment", "Type", "Flowrate", "Pressure", "Temperature"]);
        for record in &summary.data {
            table.add_row(vec![
                record.equipment_name.clone(),
                record.equipment_type.clone(),
                record.flowrate.to_string(),
                record.pressure.to_string(),
                record.temperature.to_string(),
            ]);
        }
        out.push_str(&format!("\n{}\n", table));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{EquipmentRecord, TypeCount};
    use chrono::Utc;
    use eqviz_common::types::Averages;
    use uuid::Uuid;

    fn summary() -> Summary {
        Summary {
            dataset_id: Uuid::nil(),
            file_name: "plant.csv".to_string(),
            created_at: Utc::now(),
            total_count: 1,
            averages: Averages {
                flowrate: 120.5,
                pressure: 5.2,
                temperature: 110.0,
            },
            type_distribution: vec![TypeCount {
                equipment_type: "Pump".to_string(),
                count: 1,
            }],
            data: vec![EquipmentRecord {
                id: 1,
                dataset_id: Uuid::nil(),
                position: 0,
                equipment_name: "Pump-1".to_string(),
                equipment_type: "Pump".to_string(),
                flowrate: 120.5,
                pressure: 5.2,
                temperature: 110.0,
            }],
        }
    }

    #[test]
    fn test_summary_tables() {
        let out = format_summary(&summary(), false);
        assert!(out.contains("120.5"));
        assert!(out.contains("Pump"));
        assert!(!out.contains("Pump-1"));
    }

    #[test]
    fn test_summary_with_records() {
        let out = format_summary(&summary(), true);
        assert!(out.contains("Pump-1"));
    }
}
