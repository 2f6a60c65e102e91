//! eqviz Server - Main entry point

use anyhow::Result;
use eqviz_common::logging::{init_logging, LogConfig};
use tracing::info;

use eqviz_server::{api, config::Config};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::builder()
        .log_file_prefix("eqviz-server".to_string())
        .filter_directives("eqviz_server=debug,tower_http=debug,sqlx=info".to_string())
        .build();

    // Environment variables take precedence
    let log_config = log_config.merge_env()?;

    let _guard = init_logging(&log_config)?;

    info!("Starting eqviz server");

    let config = Config::load()?;
    info!(
        store = ?config.store,
        retention_limit = config.datasets.retention_limit,
        "Configuration loaded - server will bind to {}:{}",
        config.server.host,
        config.server.port
    );

    api::serve(config).await
}
