//! Country record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum stored length of a country name, in characters.
pub const NAME_MAX_CHARS: usize = 128;

/// A country pinned by the user.
///
/// `code` is the sole identity. `created_at` is set on first insertion and
/// never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedCountry {
    pub code: String,
    pub name: String,
    pub flag_url: String,
    pub created_at: DateTime<Utc>,
}

impl SelectedCountry {
    /// Create a record stamped with the given creation time
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        flag_url: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            flag_url: flag_url.into(),
            created_at,
        }
    }
}

/// Validated upsert input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCountry {
    pub code: String,
    pub name: String,
    pub flag_url: String,
}

impl NewCountry {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        flag_url: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            flag_url: flag_url.into(),
        }
    }
}

/// Wire representation of a country
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryResponse {
    pub code: String,
    pub name: String,
    #[serde(rename = "flagUrl")]
    pub flag_url: String,
}

impl From<&SelectedCountry> for CountryResponse {
    fn from(country: &SelectedCountry) -> Self {
        Self {
            code: country.code.clone(),
            name: country.name.clone(),
            flag_url: country.flag_url.clone(),
        }
    }
}

impl From<SelectedCountry> for CountryResponse {
    fn from(country: SelectedCountry) -> Self {
        Self {
            code: country.code,
            name: country.name,
            flag_url: country.flag_url,
        }
    }
}

/// Cut a name down to `NAME_MAX_CHARS` characters.
pub fn truncate_name(name: &str) -> String {
    match name.char_indices().nth(NAME_MAX_CHARS) {
        Some((idx, _)) => name[..idx].to_string(),
        None => name.to_string(),
    }
}
