//! Selected country model and request validation
//!
//! A `SelectedCountry` is the single entity of the service. It is keyed by
//! its `code` and carries an immutable `created_at` stamp.
//!
//! Inbound bodies are loosely typed. They are reduced to a `CountryPayload`
//! (string keys mapped to optional strings) and validated into a
//! `NewCountry` before the store is touched.

mod model;
mod payload;

pub use model::{truncate_name, CountryResponse, NewCountry, SelectedCountry, NAME_MAX_CHARS};
pub use payload::{validate, CountryPayload, ValidationError};
