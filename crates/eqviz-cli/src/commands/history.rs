//! History command implementation

use crate::api::{client::ApiClient, History};
use crate::commands::format_timestamp;
use crate::error::Result;
use crate::OutputFormat;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};

pub async fn run(server_url: &str, limit: Option<u32>, format: OutputFormat) -> Result<()> {
    let client = ApiClient::new(server_url)?;
    let history = client.history(limit).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history.datasets)?),
        OutputFormat::Table => print!("{}", format_as_table(&history)),
    }

    Ok(())
}

/// Format the listing as a table, newest first
pub fn format_as_table(history: &History) -> String {
    if history.datasets.is_empty() {
        return format!("{}\n", "No datasets uploaded yet".yellow());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["ID", "File", "Uploaded"]);

    for dataset in &history.datasets {
        table.add_row(vec![
            dataset.id.to_string(),
            dataset.file_name.clone(),
            format_timestamp(&dataset.created_at),
        ]);
    }

    let mut out = format!("{}\n", table);
    if let Some(meta) = history.meta {
        out.push_str(&format!(
            "Showing {} of at most {} retained datasets\n",
            history.datasets.len(),
            meta.retention_limit
        ));
    }
    out
}
