//! eqviz CLI - Main entry point

use clap::Parser;
use eqviz_cli::{Cli, Commands};
use eqviz_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.markdown_help {
        println!("{}", clap_markdown::help_markdown::<Cli>());
        return;
    }

    let Some(command) = cli.command.as_ref() else {
        eprintln!("Error: A subcommand is required");
        eprintln!();
        eprintln!("For more information, try '--help'.");
        process::exit(2);
    };

    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Error
        })
        .output(LogOutput::Console)
        .log_file_prefix("eqviz-cli".to_string())
        .build();

    // Environment variables take precedence
    let log_config = log_config.clone().merge_env().unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(command, &cli.server_url).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn execute_command(command: &Commands, server_url: &str) -> eqviz_cli::Result<()> {
    match command {
        Commands::Upload { file } => eqviz_cli::commands::upload::run(server_url, file).await,

        Commands::History { limit, format } => {
            eqviz_cli::commands::history::run(server_url, *limit, *format).await
        },

        Commands::Summary {
            id,
            format,
            records,
        } => eqviz_cli::commands::summary::run(server_url, id, *format, *records).await,

        Commands::Report { id, output } => {
            eqviz_cli::commands::report::run(server_url, id, output.as_deref()).await
        },

        Commands::Health => eqviz_cli::commands::health::run(server_url).await,
    }
}
