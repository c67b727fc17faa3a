//! CLI argument definitions using clap
//!
//! Commands:
//! - country-service init --config <path>
//! - country-service serve --config <path> [--port <port>] [--in-memory]
//! - country-service compact --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Persistence service for the countries pinned by the front-end
#[derive(Parser, Debug)]
#[command(name = "country-service")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory, the empty log, and a default config
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./country-service.json")]
        config: PathBuf,

        /// Data directory written into a newly created config
        #[arg(long, default_value = "./data")]
        data_dir: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./country-service.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,

        /// Keep records in memory only (nothing is written to disk)
        #[arg(long)]
        in_memory: bool,
    },

    /// Rewrite the log with one record per live country
    Compact {
        /// Path to configuration file
        #[arg(long, default_value = "./country-service.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
