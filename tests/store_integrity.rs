//! Record store integrity tests
//!
//! - Corrupted or truncated logs are never silently accepted
//! - Concurrent upserts on one code leave exactly one record
//! - File and in-memory stores agree on observable behavior

use std::fs;
use std::sync::Arc;
use std::thread;

use country_service::countries::NewCountry;
use country_service::storage::{
    CountryRecord, CountryStore, FileCountryStore, InMemoryCountryStore, LogReader,
};
use tempfile::TempDir;

fn create_temp_data_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

fn exercise(store: &dyn CountryStore) -> Vec<(String, String, String)> {
    store.upsert(NewCountry::new("FR", "France", "fr1")).unwrap();
    store.upsert(NewCountry::new("US", "United States", "us1")).unwrap();
    store.upsert(NewCountry::new("BR", "Brazil", "br1")).unwrap();
    store.upsert(NewCountry::new("US", "USA", "us2")).unwrap();
    store.delete("FR").unwrap();
    store.delete("ZZ").unwrap();

    store
        .list()
        .unwrap()
        .into_iter()
        .map(|c| (c.code, c.name, c.flag_url))
        .collect()
}

#[test]
fn test_file_and_memory_stores_agree() {
    let temp_dir = create_temp_data_dir();
    let file_store = FileCountryStore::open(temp_dir.path()).unwrap();
    let memory_store = InMemoryCountryStore::new();

    let from_file = exercise(&file_store);
    let from_memory = exercise(&memory_store);

    assert_eq!(from_file, from_memory);
    assert_eq!(
        from_file,
        vec![
            ("BR".to_string(), "Brazil".to_string(), "br1".to_string()),
            ("US".to_string(), "USA".to_string(), "us2".to_string()),
        ]
    );
}

#[test]
fn test_corrupted_record_fails_open() {
    let temp_dir = create_temp_data_dir();
    let log_path = FileCountryStore::log_path(temp_dir.path());

    {
        let store = FileCountryStore::open(temp_dir.path()).unwrap();
        store.upsert(NewCountry::new("US", "United States", "url")).unwrap();
    }

    let mut contents = fs::read(&log_path).unwrap();
    let last = contents.len() - 1;
    contents[last] ^= 0xFF;
    fs::write(&log_path, contents).unwrap();

    match FileCountryStore::open(temp_dir.path()) {
        Ok(_) => panic!("corrupted log must not open"),
        Err(err) => {
            assert!(err.is_fatal());
            assert_eq!(err.code(), "DATA_CORRUPTION");
        }
    }
}

#[test]
fn test_torn_append_fails_open() {
    let temp_dir = create_temp_data_dir();
    let log_path = FileCountryStore::log_path(temp_dir.path());

    {
        let store = FileCountryStore::open(temp_dir.path()).unwrap();
        store.upsert(NewCountry::new("US", "United States", "url")).unwrap();
    }

    let partial = CountryRecord::tombstone("US").serialize();
    let mut contents = fs::read(&log_path).unwrap();
    contents.extend_from_slice(&partial[..partial.len() / 2]);
    fs::write(&log_path, contents).unwrap();

    assert!(FileCountryStore::open(temp_dir.path()).is_err());
}

#[test]
fn test_log_records_every_mutation() {
    let temp_dir = create_temp_data_dir();

    {
        let store = FileCountryStore::open(temp_dir.path()).unwrap();
        store.upsert(NewCountry::new("US", "United States", "a")).unwrap();
        store.upsert(NewCountry::new("US", "USA", "b")).unwrap();
        store.delete("US").unwrap();
    }

    let mut reader = LogReader::open(&FileCountryStore::log_path(temp_dir.path())).unwrap();
    let records = reader.read_all().unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].created_at_micros, records[1].created_at_micros);
    assert!(records[2].is_tombstone);
}

#[test]
fn test_concurrent_upserts_same_code() {
    let temp_dir = create_temp_data_dir();
    let store = Arc::new(FileCountryStore::open(temp_dir.path()).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                store
                    .upsert(NewCountry::new("US", format!("Name {}", i), format!("url{}", i)))
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let records = store.list().unwrap();
    assert_eq!(records.len(), 1);
    // Every writer observed the same creation stamp
    assert!(results.iter().all(|r| r.created_at == records[0].created_at));
    assert_eq!(store.record_count().unwrap(), 8);

    // The surviving state is whatever the last append wrote
    let reopened = FileCountryStore::open(temp_dir.path()).unwrap();
    assert_eq!(reopened.list().unwrap(), records);
}
