//! CLI interface for Safedesk.
//!
//! One-shot queries against the configured dataset plus the long-running JSON-RPC server.

mod commands;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;
pub use utils::*;

#[derive(Parser)]
#[command(name = "safedesk")]
#[command(about = "Incident query server for the safety dashboard")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "SAFEDESK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Serve the incident methods over JSON-RPC
    Serve {
        /// Override server.transport from the configuration
        #[arg(long, short = 't')]
        transport: Option<String>,
    },

    /// Run one incident query and print the resulting page
    Query {
        #[arg(long, short = 'p', conflicts_with = "params_json")]
        params_file: Option<PathBuf>,

        #[arg(long, short = 'j', conflicts_with = "params_file")]
        params_json: Option<String>,
    },

    /// Print the distinct severities, statuses and types in the dataset
    Options,

    /// Print dashboard statistics for the dataset
    Stats,

    /// Generate a demo dataset as a JSON array of incidents
    Generate {
        #[arg(long, short = 'n', default_value_t = 1000)]
        count: usize,

        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Seed for a reproducible dataset
        #[arg(long)]
        seed: Option<u64>,

        /// Leave out the ten sample incidents
        #[arg(long)]
        no_samples: bool,
    },

    /// Initialize default configuration at default location
    Init {
        #[arg(long)]
        force: bool,
    },

    /// Manage configuration
    Config {
        #[arg(long)]
        show: bool,

        #[arg(long)]
        validate: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Run the CLI command
    pub async fn run(self) -> Result<()> {
        let config_path = self.config;

        match self.command {
            Commands::Serve { transport } => serve(config_path, transport).await,

            Commands::Query {
                params_file,
                params_json,
            } => query(config_path, params_file, params_json).await,

            Commands::Options => options(config_path).await,
            Commands::Stats => stats(config_path).await,

            Commands::Generate {
                count,
                output,
                seed,
                no_samples,
            } => generate(count, output, seed, !no_samples).await,

            Commands::Init { force } => init(config_path, force).await,
            Commands::Config { show, validate } => config(config_path, show, validate).await,

            Commands::Version => version().await,
        }
    }
}
