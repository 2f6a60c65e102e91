//! Health command implementation

use crate::api::client::ApiClient;
use crate::error::{CliError, Result};
use colored::Colorize;

pub async fn run(server_url: &str) -> Result<()> {
    let client = ApiClient::new(server_url)?;

    if client.health_check().await? {
        println!("{} Server at {} is healthy", "✓".green(), client.base_url().cyan());
        Ok(())
    } else {
        Err(CliError::UnexpectedResponse(format!(
            "server at {} is unreachable or unhealthy",
            client.base_url()
        )))
    }
}
