//! Report command implementation

use crate::api::client::ApiClient;
use crate::error::Result;
use colored::Colorize;
use eqviz_common::types::parse_dataset_id;
use std::path::{Path, PathBuf};

/// Download the report of `id` to `output`, or to the server-suggested name
pub async fn run(server_url: &str, id: &str, output: Option<&Path>) -> Result<()> {
    let id = parse_dataset_id(id)?;

    let client = ApiClient::new(server_url)?;
    let report = client.report(id).await?;

    let target = match output {
        Some(path) => path.to_path_buf(),
        // Only the final component of the suggested name is trusted
        None => report
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).file_name())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("report_{}.pdf", id))),
    };

    tokio::fs::write(&target, &report.content).await?;

    println!(
        "{} Report written to: {} ({} bytes)",
        "✓".green(),
        target.display().to_string().cyan(),
        report.content.len()
    );

    Ok(())
}
