//! CLI module for the country service
//!
//! Provides command-line interface for:
//! - init: Create data directory, empty log, and default config
//! - serve: Boot the store and serve HTTP
//! - compact: Rewrite the log without superseded records

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{compact, init, run, run_command, serve};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response;
