//! Record store for selected countries
//!
//! Two implementations share the `CountryStore` contract:
//!
//! - `FileCountryStore`: append-only log with a CRC32 per record and fsync
//!   after every write. Latest record per code wins; tombstones mark
//!   deletions. The live view is rebuilt on open.
//! - `InMemoryCountryStore`: no persistence.
//!
//! Listing is always ordered by name ascending.

mod checksum;
mod errors;
mod file_store;
mod memory;
mod reader;
mod record;
mod store;

pub use checksum::{compute_checksum, verify_checksum};
pub use errors::{Severity, StorageError, StorageResult};
pub use file_store::{CompactionStats, FileCountryStore};
pub use memory::InMemoryCountryStore;
pub use reader::LogReader;
pub use record::CountryRecord;
pub use store::CountryStore;
