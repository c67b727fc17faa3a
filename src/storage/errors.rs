//! Storage error types
//!
//! Error codes:
//! - STORAGE_IO_ERROR (ERROR severity)
//! - STORAGE_WRITE_FAILED (ERROR severity)
//! - STORAGE_READ_FAILED (ERROR severity)
//! - STORAGE_LOCK_POISONED (ERROR severity)
//! - STORAGE_UNUSABLE (FATAL severity)
//! - DATA_CORRUPTION (FATAL severity)

use std::fmt;
use std::io;

use thiserror::Error;

/// Severity levels for storage errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Operation fails, server continues
    Error,
    /// The store cannot be opened or trusted
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Storage error
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure outside a read or write of a record
    #[error("[ERROR] STORAGE_IO_ERROR: {message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Appending or syncing a record failed
    #[error("[ERROR] STORAGE_WRITE_FAILED: {message}")]
    WriteFailed {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Opening or reading the log failed
    #[error("[ERROR] STORAGE_READ_FAILED: {message}")]
    ReadFailed {
        message: String,
        #[source]
        source: io::Error,
    },

    /// Checksum mismatch, truncation, or undecodable record
    #[error("[FATAL] DATA_CORRUPTION: {reason} (byte_offset: {offset})")]
    DataCorruption { offset: u64, reason: String },

    /// A writer panicked while holding the store lock
    #[error("[ERROR] STORAGE_LOCK_POISONED: store lock poisoned")]
    LockPoisoned,

    /// A failed append could not be rolled back; the log tail is unknown
    #[error("[FATAL] STORAGE_UNUSABLE: {reason}")]
    Unusable { reason: String },
}

impl StorageError {
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    pub fn write_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::WriteFailed {
            message: message.into(),
            source,
        }
    }

    pub fn read_failed(message: impl Into<String>, source: io::Error) -> Self {
        Self::ReadFailed {
            message: message.into(),
            source,
        }
    }

    /// Create a data corruption error with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self::DataCorruption {
            offset,
            reason: reason.into(),
        }
    }

    pub fn unusable(reason: impl Into<String>) -> Self {
        Self::Unusable {
            reason: reason.into(),
        }
    }

    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "STORAGE_IO_ERROR",
            Self::WriteFailed { .. } => "STORAGE_WRITE_FAILED",
            Self::ReadFailed { .. } => "STORAGE_READ_FAILED",
            Self::DataCorruption { .. } => "DATA_CORRUPTION",
            Self::LockPoisoned => "STORAGE_LOCK_POISONED",
            Self::Unusable { .. } => "STORAGE_UNUSABLE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::DataCorruption { .. } | Self::Unusable { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Returns whether this error prevents the store from being used
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_corruption_is_fatal() {
        let err = StorageError::corruption_at_offset(0, "checksum mismatch");
        assert!(err.is_fatal());
        assert_eq!(err.code(), "DATA_CORRUPTION");
    }

    #[test]
    fn test_write_failed_not_fatal() {
        let err = StorageError::write_failed(
            "disk full",
            io::Error::new(io::ErrorKind::Other, "disk full"),
        );
        assert!(!err.is_fatal());
        assert_eq!(err.code(), "STORAGE_WRITE_FAILED");
    }

    #[test]
    fn test_error_display_contains_context() {
        let err = StorageError::corruption_at_offset(1024, "checksum mismatch");
        let display = err.to_string();
        assert!(display.contains("DATA_CORRUPTION"));
        assert!(display.contains("FATAL"));
        assert!(display.contains("checksum mismatch"));
        assert!(display.contains("byte_offset: 1024"));
    }

    #[test]
    fn test_unusable_is_fatal() {
        let err = StorageError::unusable("rollback failed");
        assert!(err.is_fatal());
        assert_eq!(err.code(), "STORAGE_UNUSABLE");
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error as _;

        let err = StorageError::io_error("rename failed", io::Error::new(io::ErrorKind::Other, "busy"));
        assert!(err.source().is_some());
    }
}
