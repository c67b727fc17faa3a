//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "http": { "host": "127.0.0.1", "port": 8000, "cors_origins": ["http://localhost:5173"] }
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::http_server::HttpServerConfig;

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: PathBuf,

    /// HTTP listener settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

impl Config {
    /// Config with defaults for everything but the data directory
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            http: HttpServerConfig::default(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if self.http.port == 0 {
            return Err(CliError::config_error("http.port must be > 0"));
        }

        if self.http.host.trim().is_empty() {
            return Err(CliError::config_error("http.host must not be empty"));
        }

        let invalid = self.http.invalid_cors_origins();
        if !invalid.is_empty() {
            return Err(CliError::config_error(format!(
                "http.cors_origins has invalid origins: {:?}",
                invalid
            )));
        }

        Ok(())
    }

    /// Write configuration as pretty JSON
    pub fn save(&self, path: &Path) -> CliResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json + "\n")
            .map_err(|e| CliError::config_error(format!("Failed to write config: {}", e)))
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        &self.data_dir
    }
}
