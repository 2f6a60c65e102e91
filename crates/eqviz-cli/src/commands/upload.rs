//! Upload command implementation

use crate::api::client::ApiClient;
use crate::commands::format_timestamp;
use crate::error::{CliError, Result};
use colored::Colorize;
use std::path::Path;
use tracing::info;

/// Read `file` and upload it as a new dataset
pub async fn run(server_url: &str, file: &Path) -> Result<()> {
    if !file.is_file() {
        return Err(CliError::FileNotFound(file.display().to_string()));
    }

    let content = tokio::fs::read(file).await?;
    let file_name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.csv")
        .to_string();

    info!(file = %file.display(), size = content.len(), "Uploading dataset");

    let client = ApiClient::new(server_url)?;
    let dataset = client.upload(&file_name, content).await?;

    println!("{} Uploaded {}", "✓".green(), dataset.file_name.cyan());
    println!("  ID:       {}", dataset.id);
    println!("  Uploaded: {}", format_timestamp(&dataset.created_at));

    Ok(())
}
