//! Non-durable country store

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{SubsecRound, Utc};

use super::errors::{StorageError, StorageResult};
use super::store::{sort_by_name, CountryStore};
use crate::countries::{truncate_name, NewCountry, SelectedCountry};

/// In-process store with the same contract as the file store.
#[derive(Default)]
pub struct InMemoryCountryStore {
    countries: RwLock<HashMap<String, SelectedCountry>>,
}

impl InMemoryCountryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CountryStore for InMemoryCountryStore {
    fn list(&self) -> StorageResult<Vec<SelectedCountry>> {
        let countries = self.countries.read().map_err(|_| StorageError::LockPoisoned)?;
        Ok(sort_by_name(countries.values().cloned().collect()))
    }

    fn upsert(&self, country: NewCountry) -> StorageResult<SelectedCountry> {
        let mut countries = self.countries.write().map_err(|_| StorageError::LockPoisoned)?;

        let name = truncate_name(&country.name);
        let stored = countries
            .entry(country.code.clone())
            .and_modify(|existing| {
                existing.name = name.clone();
                existing.flag_url = country.flag_url.clone();
            })
            .or_insert_with(|| {
                SelectedCountry::new(
                    country.code,
                    name,
                    country.flag_url,
                    Utc::now().trunc_subsecs(6),
                )
            });

        Ok(stored.clone())
    }

    fn delete(&self, code: &str) -> StorageResult<()> {
        self.countries
            .write()
            .map_err(|_| StorageError::LockPoisoned)?
            .remove(code);
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self
            .countries
            .read()
            .map_err(|_| StorageError::LockPoisoned)?
            .len())
    }
}
