//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and apply OpenAPI security requirements
#[derive(Parser, Debug)]
#[command(name = "openapi-auth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// OpenAPI document (YAML or JSON)
    #[arg(short, long, global = true)]
    pub document: Option<PathBuf>,

    /// Authentication settings file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the declared security schemes
    Schemes,

    /// Show the requirement alternatives of an operation
    Resolve {
        /// Path template, e.g. /pets/{id}
        #[arg(short, long)]
        path: String,

        /// HTTP method
        #[arg(short, long, default_value = "get")]
        method: String,
    },

    /// Build a request for an operation and print it with credentials applied
    Decorate {
        /// Path template, e.g. /pets/{id}
        #[arg(short, long)]
        path: String,

        /// HTTP method
        #[arg(short, long, default_value = "get")]
        method: String,

        /// Request URL; defaults to the path on the configured base URI
        #[arg(short, long)]
        url: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
