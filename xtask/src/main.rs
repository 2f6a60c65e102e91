//! Build automation tasks for eqviz
//!
//! - Generating the CLI reference from the clap definitions

use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for eqviz", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference in markdown
    GenerateCliDocs {
        /// Output directory for generated documentation
        #[arg(short, long, default_value = "docs")]
        output_dir: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output_dir } => generate_cli_docs(&output_dir)?,
    }

    Ok(())
}

fn generate_cli_docs(output_dir: &str) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    let markdown = clap_markdown::help_markdown::<eqviz_cli::Cli>();

    let content = format!(
        r#"# eqviz CLI Reference

This documentation is generated from the CLI source code. Last updated: {}.

## Overview

`eqviz` talks to a running eqviz server: it uploads equipment telemetry CSV
files, lists the most recent uploads, prints dataset summaries and downloads
PDF reports.

## Installation

```bash
cargo install --path crates/eqviz-cli
```

## Quick Start

```bash
# Upload a file
eqviz upload plant.csv

# Most recent uploads, newest first
eqviz history --limit 3

# Averages and type distribution of one dataset
eqviz summary <DATASET_ID>

# Save its PDF report
eqviz report <DATASET_ID> --output plant.pdf
```

## Commands

{}

## Environment Variables

- `EQVIZ_SERVER_URL` - Server URL (default: `http://localhost:8000`)
- `EQVIZ_API_TIMEOUT_SECS` - Request timeout in seconds (default: `60`)
- `LOG_LEVEL`, `LOG_FORMAT`, `LOG_FILTER` - Logging overrides

---

*To update, run `cargo xtask generate-cli-docs`.*
"#,
        chrono::Utc::now().format("%Y-%m-%d"),
        markdown
    );

    let output_path = PathBuf::from(output_dir);
    fs::create_dir_all(&output_path)?;

    let file_path = output_path.join("cli.md");
    fs::write(&file_path, content)?;

    println!("✅ Generated CLI documentation at: {}", file_path.display());

    Ok(())
}
