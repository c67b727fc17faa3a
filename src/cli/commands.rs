//! CLI command implementations
//!
//! `serve` boots in a fixed order: logging, config, store, HTTP listener.
//! The store handle is created here and handed to the server; nothing else
//! owns storage.

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::write_response;
use crate::http_server::HttpServer;
use crate::observability::{self, Event};
use crate::storage::{CountryStore, FileCountryStore, InMemoryCountryStore};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a single command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config, data_dir } => init(&config, &data_dir),
        Command::Serve {
            config,
            port,
            in_memory,
        } => serve(&config, port, in_memory),
        Command::Compact { config } => compact(&config),
    }
}

/// Create the data directory and empty log.
///
/// Writes a default config pointing at `data_dir` unless one already exists,
/// in which case its `data_dir` is used instead.
pub fn init(config_path: &Path, data_dir: &Path) -> CliResult<()> {
    let config = if config_path.exists() {
        Config::load(config_path)?
    } else {
        let config = Config::new(data_dir);
        config.save(config_path)?;
        config
    };

    if FileCountryStore::log_path(config.data_path()).exists() {
        return Err(CliError::already_initialized());
    }

    let store = FileCountryStore::open(config.data_path())?;

    write_response(json!({
        "config": config_path.display().to_string(),
        "log": store.path().display().to_string(),
    }))
}

/// Boot and serve until interrupted.
pub fn serve(config_path: &Path, port: Option<u16>, in_memory: bool) -> CliResult<()> {
    observability::init_logging(None);
    observability::log_event(Event::BootStart);

    let mut config = Config::load(config_path)?;
    if let Some(port) = port {
        config.http.port = port;
    }
    tracing::info!(
        event = %Event::ConfigLoaded,
        path = %config_path.display(),
        addr = %config.http.socket_addr()
    );

    let store: Arc<dyn CountryStore> = if in_memory {
        Arc::new(InMemoryCountryStore::new())
    } else {
        Arc::new(open_initialized(&config)?)
    };
    let live = store.len()?;
    tracing::info!(event = %Event::StoreOpened, in_memory, live);

    let server = HttpServer::new(config.http, store);

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::server_error(format!("Failed to start runtime: {}", e)))?;
    runtime
        .block_on(server.start())
        .map_err(|e| CliError::server_error(e.to_string()))
}

/// Compact the log of an initialized data directory.
pub fn compact(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let store = open_initialized(&config)?;
    let stats = store.compact()?;

    tracing::info!(
        event = %Event::StoreCompacted,
        records_before = stats.records_before,
        records_after = stats.records_after
    );

    write_response(json!({
        "records_before": stats.records_before,
        "records_after": stats.records_after,
        "bytes_before": stats.bytes_before,
        "bytes_after": stats.bytes_after,
    }))
}

fn open_initialized(config: &Config) -> CliResult<FileCountryStore> {
    if !FileCountryStore::log_path(config.data_path()).exists() {
        return Err(CliError::not_initialized());
    }
    Ok(FileCountryStore::open(config.data_path())?)
}
