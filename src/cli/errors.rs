//! CLI-specific error types
//!
//! All CLI errors end the process with a non-zero exit code.

use std::io;

use thiserror::Error;

use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error
    IoError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// Record store could not be opened or written
    StorageError,
    /// HTTP server failed to bind or serve
    ServerError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "CLI_CONFIG_ERROR",
            Self::IoError => "CLI_IO_ERROR",
            Self::AlreadyInitialized => "CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "CLI_NOT_INITIALIZED",
            Self::StorageError => "CLI_STORAGE_ERROR",
            Self::ServerError => "CLI_SERVER_ERROR",
        }
    }
}

/// CLI error, displayed as `CODE: message`
#[derive(Debug, Error)]
#[error("{}: {message}", .code.code())]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized() -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            "Data directory already initialized",
        )
    }

    pub fn not_initialized() -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            "Data directory not initialized. Run 'country-service init' first.",
        )
    }

    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServerError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::new(CliErrorCode::StorageError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::not_initialized();
        let display = err.to_string();
        assert!(display.starts_with("CLI_NOT_INITIALIZED"));
        assert!(display.contains("country-service init"));
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(CliError::config_error("bad port"));
        assert_eq!(err.to_string(), "CLI_CONFIG_ERROR: bad port");
    }

    #[test]
    fn test_storage_error_conversion() {
        let err = CliError::from(StorageError::LockPoisoned);
        assert_eq!(err.code(), &CliErrorCode::StorageError);
        assert!(err.message().contains("STORAGE_LOCK_POISONED"));
    }
}
