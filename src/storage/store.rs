//! Record store contract shared by the durable and in-memory stores

use crate::countries::{NewCountry, SelectedCountry};

use super::errors::StorageResult;

/// Keyed storage of selected countries.
///
/// Implementations must make each `upsert` and `delete` atomic with respect
/// to concurrent calls on the same code (last writer wins).
pub trait CountryStore: Send + Sync {
    /// All countries ordered by name ascending.
    fn list(&self) -> StorageResult<Vec<SelectedCountry>>;

    /// Insert or update by code.
    ///
    /// An existing record keeps its `created_at`; only `name` and `flag_url`
    /// change. A new record is stamped with the current time.
    fn upsert(&self, country: NewCountry) -> StorageResult<SelectedCountry>;

    /// Remove by code. Deleting an unknown code succeeds.
    fn delete(&self, code: &str) -> StorageResult<()>;

    /// Number of live records.
    fn len(&self) -> StorageResult<usize>;

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Order countries for display: by name, then by code for equal names.
pub(crate) fn sort_by_name(mut countries: Vec<SelectedCountry>) -> Vec<SelectedCountry> {
    countries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.code.cmp(&b.code)));
    countries
}
