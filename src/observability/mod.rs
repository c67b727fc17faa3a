//! Observability for the country service
//!
//! Structured logging through `tracing`. Every lifecycle or mutation log
//! line carries an `event` field naming an [`Event`].
//!
//! # Usage
//!
//! ```ignore
//! use country_service::observability::{self, Event};
//!
//! observability::init_logging(None);
//! observability::log_event(Event::BootStart);
//! tracing::info!(event = %Event::CountryUpserted, code = "US");
//! ```

mod events;

pub use events::Event;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=info";

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logging(default_filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.unwrap_or(DEFAULT_LOG_FILTER)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    if event.is_failure() {
        tracing::error!(event = %event);
    } else {
        tracing::info!(event = %event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_twice() {
        init_logging(Some("warn"));
        init_logging(None);
    }

    #[test]
    fn test_log_event() {
        // Verifies no panic with or without a subscriber
        log_event(Event::BootStart);
        log_event(Event::StorageFailure);
    }
}
