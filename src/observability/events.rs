//! Lifecycle and mutation events
//!
//! Events are explicit and typed. Each renders as a stable upper-snake
//! string placed in the `event` field of a log line.

use std::fmt;

/// Observable events in the country service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Process startup begins
    BootStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Record store opened and replayed
    StoreOpened,
    /// HTTP listener bound, ready to serve
    ServerListening,
    /// Graceful shutdown finished
    ShutdownComplete,

    // Mutations
    /// A country was inserted or updated
    CountryUpserted,
    /// A delete request was applied
    CountryDeleted,
    /// The log was rewritten without superseded records
    StoreCompacted,

    // Failures
    /// A store call failed while serving a request
    StorageFailure,
}

impl Event {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::ServerListening => "SERVER_LISTENING",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
            Event::CountryUpserted => "COUNTRY_UPSERTED",
            Event::CountryDeleted => "COUNTRY_DELETED",
            Event::StoreCompacted => "STORE_COMPACTED",
            Event::StorageFailure => "STORAGE_FAILURE",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Event::StorageFailure)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
