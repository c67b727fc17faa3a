//! Durable country store backed by an append-only log
//!
//! Layout: `<data_dir>/data/selected_countries.dat`.
//!
//! Every upsert or delete appends one checksummed record and fsyncs before
//! the in-memory view is updated. On open the log is replayed to rebuild
//! that view; corruption aborts the open.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{SubsecRound, Utc};

use super::errors::{StorageError, StorageResult};
use super::reader::LogReader;
use super::record::CountryRecord;
use super::store::{sort_by_name, CountryStore};
use crate::countries::{truncate_name, NewCountry, SelectedCountry};

const DATA_SUBDIR: &str = "data";
const LOG_FILE: &str = "selected_countries.dat";
const COMPACT_SUFFIX: &str = "compact";

/// Where appended records go. The log file in production.
trait LogSink: Send + Sync {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
    /// Cut the sink back to `len` bytes; later appends land at the new end.
    fn truncate_to(&mut self, len: u64) -> io::Result<()>;
}

impl LogSink for File {
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate_to(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

struct LogState {
    sink: Box<dyn LogSink>,
    /// Length of the verified prefix of the log
    current_offset: u64,
    /// Records in the log, live and tombstoned
    record_count: usize,
    countries: BTreeMap<String, SelectedCountry>,
    /// Set when a failed append could not be cut back off the log
    unusable: Option<String>,
}

/// Outcome of a compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionStats {
    pub records_before: usize,
    pub records_after: usize,
    pub bytes_before: u64,
    pub bytes_after: u64,
}

/// Append-only, fsync-on-write country store.
pub struct FileCountryStore {
    log_path: PathBuf,
    state: RwLock<LogState>,
}

impl FileCountryStore {
    /// Path of the log file inside a data directory.
    pub fn log_path(data_dir: &Path) -> PathBuf {
        data_dir.join(DATA_SUBDIR).join(LOG_FILE)
    }

    /// Opens or creates the store in the given data directory.
    ///
    /// # Errors
    ///
    /// `WriteFailed` if the directory or log cannot be created, and
    /// `DataCorruption` if any existing record fails verification.
    pub fn open(data_dir: &Path) -> StorageResult<Self> {
        let log_path = Self::log_path(data_dir);

        if let Some(parent) = log_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StorageError::write_failed(
                        format!("Failed to create data directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let created = !log_path.exists();
        let file = open_append(&log_path)?;
        if created {
            sync_parent_dir(&log_path)?;
        }

        let current_offset = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        let (countries, record_count) = LogReader::open(&log_path)?.replay()?;

        tracing::debug!(
            path = %log_path.display(),
            records = record_count,
            live = countries.len(),
            "replayed country log"
        );

        Ok(Self {
            log_path,
            state: RwLock::new(LogState {
                sink: Box::new(file),
                current_offset,
                record_count,
                countries,
                unusable: None,
            }),
        })
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Total records in the log, including superseded ones and tombstones.
    pub fn record_count(&self) -> StorageResult<usize> {
        Ok(self.read_state()?.record_count)
    }

    /// Rewrites the log with exactly one record per live country.
    ///
    /// The new log is written beside the old one and fsynced, and its append
    /// handle is opened before it is renamed over the old log. The store only
    /// switches to the new handle once the rename has happened, so a failure
    /// at any step leaves it appending to whichever file is at `path()`.
    /// A store marked unusable by a failed rollback is usable again after a
    /// successful compaction.
    pub fn compact(&self) -> StorageResult<CompactionStats> {
        let mut state = self.write_state()?;

        let tmp_path = self.log_path.with_extension(COMPACT_SUFFIX);
        let mut bytes = Vec::new();
        for country in state.countries.values() {
            bytes.extend_from_slice(&CountryRecord::live(country).serialize());
        }

        let new_file = match write_compacted(&tmp_path, &bytes) {
            Ok(file) => file,
            Err(err) => {
                let _ = fs::remove_file(&tmp_path);
                return Err(err);
            }
        };

        if let Err(e) = fs::rename(&tmp_path, &self.log_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StorageError::io_error(
                format!("Failed to replace log: {}", self.log_path.display()),
                e,
            ));
        }

        let stats = CompactionStats {
            records_before: state.record_count,
            records_after: state.countries.len(),
            bytes_before: state.current_offset,
            bytes_after: bytes.len() as u64,
        };

        state.sink = Box::new(new_file);
        state.current_offset = stats.bytes_after;
        state.record_count = stats.records_after;
        state.unusable = None;

        sync_parent_dir(&self.log_path)?;

        Ok(stats)
    }

    fn read_state(&self) -> StorageResult<RwLockReadGuard<'_, LogState>> {
        self.state.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write_state(&self) -> StorageResult<RwLockWriteGuard<'_, LogState>> {
        self.state.write().map_err(|_| StorageError::LockPoisoned)
    }
}

fn open_append(path: &Path) -> StorageResult<File> {
    OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            StorageError::write_failed(format!("Failed to open log file: {}", path.display()), e)
        })
}

/// Writes and fsyncs the compacted log, returning an append handle to it.
fn write_compacted(path: &Path, bytes: &[u8]) -> StorageResult<File> {
    let mut tmp = File::create(path).map_err(|e| {
        StorageError::write_failed(
            format!("Failed to create compaction file: {}", path.display()),
            e,
        )
    })?;
    tmp.write_all(bytes)
        .map_err(|e| StorageError::write_failed("Failed to write compaction file", e))?;
    tmp.sync_all()
        .map_err(|e| StorageError::write_failed("fsync failed on compaction file", e))?;

    open_append(path)
}

/// fsync the directory holding `path` so a create or rename survives a crash.
fn sync_parent_dir(path: &Path) -> StorageResult<()> {
    let Some(dir) = path.parent() else {
        return Ok(());
    };

    let dir_handle = OpenOptions::new().read(true).open(dir).map_err(|e| {
        StorageError::io_error(
            format!("Failed to open data directory for fsync: {}", dir.display()),
            e,
        )
    })?;

    dir_handle.sync_all().map_err(|e| {
        StorageError::io_error(
            format!("Failed to fsync data directory: {}", dir.display()),
            e,
        )
    })
}

impl LogState {
    /// Append a record and fsync. The in-memory view is not touched.
    ///
    /// On failure the log is cut back to `current_offset`. If that cut fails
    /// too, every later append is refused with `Unusable`.
    fn append(&mut self, record: &CountryRecord) -> StorageResult<()> {
        if let Some(reason) = &self.unusable {
            return Err(StorageError::unusable(reason.clone()));
        }

        let serialized = record.serialize();

        if let Err(err) = self.write_and_sync(&serialized, &record.code) {
            self.roll_back();
            return Err(err);
        }

        self.current_offset += serialized.len() as u64;
        self.record_count += 1;

        Ok(())
    }

    fn write_and_sync(&mut self, bytes: &[u8], code: &str) -> StorageResult<()> {
        self.sink.append_bytes(bytes).map_err(|e| {
            StorageError::write_failed(format!("Failed to write record: {}", code), e)
        })?;

        self.sink.sync().map_err(|e| {
            StorageError::write_failed(format!("fsync failed after writing record: {}", code), e)
        })
    }

    fn roll_back(&mut self) {
        let offset = self.current_offset;
        let restored = self
            .sink
            .truncate_to(offset)
            .and_then(|()| self.sink.sync());

        if let Err(e) = restored {
            tracing::error!(offset, error = %e, "failed to roll back partial append");
            self.unusable = Some(format!(
                "Log could not be truncated to byte {} after a failed append: {}",
                offset, e
            ));
        }
    }
}

impl CountryStore for FileCountryStore {
    fn list(&self) -> StorageResult<Vec<SelectedCountry>> {
        let state = self.read_state()?;
        Ok(sort_by_name(state.countries.values().cloned().collect()))
    }

    fn upsert(&self, country: NewCountry) -> StorageResult<SelectedCountry> {
        let mut state = self.write_state()?;

        let created_at = state
            .countries
            .get(&country.code)
            .map(|existing| existing.created_at)
            .unwrap_or_else(|| Utc::now().trunc_subsecs(6));

        let stored = SelectedCountry::new(
            country.code,
            truncate_name(&country.name),
            country.flag_url,
            created_at,
        );

        state.append(&CountryRecord::live(&stored))?;
        state.countries.insert(stored.code.clone(), stored.clone());

        Ok(stored)
    }

    fn delete(&self, code: &str) -> StorageResult<()> {
        let mut state = self.write_state()?;

        if !state.countries.contains_key(code) {
            return Ok(());
        }

        state.append(&CountryRecord::tombstone(code))?;
        state.countries.remove(code);

        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.read_state()?.countries.len())
    }
}
