//! Sequential log reader with strict corruption detection
//!
//! Every record is checksum-verified as it is read. A truncated tail or a
//! checksum failure is reported as `DataCorruption` with its byte offset.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::errors::{StorageError, StorageResult};
use super::record::{CountryRecord, MIN_RECORD_SIZE};
use crate::countries::SelectedCountry;

/// Forward-only reader over the country log.
pub struct LogReader {
    log_path: PathBuf,
    reader: BufReader<File>,
    current_offset: u64,
    file_size: u64,
}

impl LogReader {
    /// Opens the log file for reading.
    pub fn open(log_path: &Path) -> StorageResult<Self> {
        let file = File::open(log_path).map_err(|e| {
            StorageError::read_failed(
                format!("Failed to open log file: {}", log_path.display()),
                e,
            )
        })?;

        let file_size = file
            .metadata()
            .map_err(|e| StorageError::read_failed("Failed to read file metadata", e))?
            .len();

        Ok(Self {
            log_path: log_path.to_path_buf(),
            reader: BufReader::new(file),
            current_offset: 0,
            file_size,
        })
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }

    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Reads the next record.
    ///
    /// - `Ok(Some(record))` if a record was read
    /// - `Ok(None)` at end of file
    /// - `Err(DataCorruption)` on truncation or checksum failure
    pub fn read_next(&mut self) -> StorageResult<Option<CountryRecord>> {
        if self.current_offset >= self.file_size {
            return Ok(None);
        }

        let remaining = self.file_size - self.current_offset;
        if remaining < MIN_RECORD_SIZE as u64 {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Truncated log: {} bytes remaining, minimum record size is {}",
                    remaining, MIN_RECORD_SIZE
                ),
            ));
        }

        let mut len_buf = [0u8; 4];
        self.reader.read_exact(&mut len_buf).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record length: {}", e),
            )
        })?;
        let record_length = u32::from_le_bytes(len_buf) as u64;

        if record_length < MIN_RECORD_SIZE as u64 || record_length > remaining {
            return Err(StorageError::corruption_at_offset(
                self.current_offset,
                format!(
                    "Invalid record length {} with {} bytes remaining",
                    record_length, remaining
                ),
            ));
        }

        let mut record_buf = vec![0u8; record_length as usize];
        record_buf[0..4].copy_from_slice(&len_buf);
        self.reader.read_exact(&mut record_buf[4..]).map_err(|e| {
            StorageError::corruption_at_offset(
                self.current_offset,
                format!("Failed to read record body: {}", e),
            )
        })?;

        let (record, consumed) = CountryRecord::deserialize(&record_buf)
            .map_err(|e| StorageError::corruption_at_offset(self.current_offset, e.to_string()))?;

        self.current_offset += consumed as u64;

        Ok(Some(record))
    }

    /// Reads all records in file order.
    pub fn read_all(&mut self) -> StorageResult<Vec<CountryRecord>> {
        let mut records = Vec::new();
        while let Some(record) = self.read_next()? {
            records.push(record);
        }
        Ok(records)
    }

    /// Replays the log into the live set of countries.
    ///
    /// Latest record per code wins; a tombstone removes the code.
    /// Returns the live map and the number of records scanned.
    pub fn replay(&mut self) -> StorageResult<(BTreeMap<String, SelectedCountry>, usize)> {
        let mut countries = BTreeMap::new();
        let mut scanned = 0;

        loop {
            let offset = self.current_offset;
            let Some(record) = self.read_next()? else {
                break;
            };
            scanned += 1;

            if record.is_tombstone {
                countries.remove(&record.code);
                continue;
            }

            let country = record.to_country().ok_or_else(|| {
                StorageError::corruption_at_offset(
                    offset,
                    format!("Timestamp out of range: {}", record.created_at_micros),
                )
            })?;
            countries.insert(country.code.clone(), country);
        }

        Ok((countries, scanned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn write_records(path: &Path, records: &[CountryRecord]) {
        let bytes: Vec<u8> = records.iter().flat_map(|r| r.serialize()).collect();
        fs::write(path, bytes).unwrap();
    }

    fn live(code: &str, name: &str) -> CountryRecord {
        CountryRecord::live(&SelectedCountry::new(code, name, "url", Utc::now()))
    }

    #[test]
    fn test_read_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.dat");
        fs::write(&path, b"").unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_none());
    }

    #[test]
    fn test_replay_latest_wins_and_tombstones_remove() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.dat");
        write_records(
            &path,
            &[
                live("US", "United States"),
                live("FR", "France"),
                live("US", "USA"),
                CountryRecord::tombstone("FR"),
            ],
        );

        let (countries, scanned) = LogReader::open(&path).unwrap().replay().unwrap();
        assert_eq!(scanned, 4);
        assert_eq!(countries.len(), 1);
        assert_eq!(countries["US"].name, "USA");
    }

    #[test]
    fn test_truncated_tail_is_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.dat");
        let mut bytes = live("US", "United States").serialize();
        bytes.extend_from_slice(&[1, 2, 3]);
        fs::write(&path, bytes).unwrap();

        let mut reader = LogReader::open(&path).unwrap();
        assert!(reader.read_next().unwrap().is_some());

        let err = reader.read_next().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(LogReader::open(&temp_dir.path().join("missing.dat")).is_err());
    }
}
