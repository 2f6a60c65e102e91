//! eqviz CLI Library
//!
//! Command-line client for the eqviz telemetry server.
//!
//! # Overview
//!
//! - **Upload**: Send a CSV file for ingestion (`eqviz upload`)
//! - **History**: List the most recent datasets (`eqviz history`)
//! - **Summary**: Print averages and the equipment type distribution (`eqviz summary`)
//! - **Report**: Download the PDF report of a dataset (`eqviz report`)
//! - **Health**: Check that the server and its store are reachable (`eqviz health`)

pub mod api;
pub mod commands;
pub mod error;

// Re-export commonly used types
pub use error::{CliError, Result};

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// eqviz - Equipment telemetry upload and reporting
#[derive(Parser, Debug)]
#[command(name = "eqviz")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Server URL
    #[arg(long, env = "EQVIZ_SERVER_URL", default_value = api::client::DEFAULT_SERVER_URL, global = true)]
    pub server_url: String,

    /// Print the command reference as markdown
    #[arg(long, hide = true)]
    pub markdown_help: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a CSV file as a new dataset
    Upload {
        /// Path to the CSV file
        file: PathBuf,
    },

    /// List the most recent datasets, newest first
    History {
        /// Number of datasets to show (the server caps this at its retention limit)
        #[arg(short, long)]
        limit: Option<u32>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Show the aggregate summary of a dataset
    Summary {
        /// Dataset id
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Also list every record
        #[arg(long)]
        records: bool,
    },

    /// Download the PDF report of a dataset
    Report {
        /// Dataset id
        id: String,

        /// Output file (defaults to the name suggested by the server)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check server health
    Health,
}

/// How query results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
