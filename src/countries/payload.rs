//! Inbound payload mapping and required-field validation
//!
//! Parsing never fails: a body that is not a JSON object is treated as an
//! empty payload, which then fails validation.

use std::collections::HashMap;

use serde_json::Value;
use thiserror::Error;

use super::model::NewCountry;

/// Raised when a required field is absent, empty, or not a string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("code, name, and flagUrl are required.")]
pub struct ValidationError;

/// Loosely typed request body: field name to string value, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryPayload {
    fields: HashMap<String, Option<String>>,
}

impl CountryPayload {
    /// Empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a payload from raw request bytes.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => Self::from_json(&value),
            Err(_) => Self::new(),
        }
    }

    /// Build a payload from a parsed JSON value. Non-objects map to empty.
    pub fn from_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::new();
        };

        let fields = object
            .iter()
            .map(|(key, value)| (key.clone(), value.as_str().map(str::to_string)))
            .collect();

        Self { fields }
    }

    /// Set a field (builder style)
    pub fn with(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.fields.insert(key.into(), value.map(str::to_string));
        self
    }

    /// Look up a non-empty string field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Validate a payload into an upsert request.
pub fn validate(payload: &CountryPayload) -> Result<NewCountry, ValidationError> {
    let code = payload.get("code").ok_or(ValidationError)?;
    let name = payload.get("name").ok_or(ValidationError)?;
    let flag_url = payload.get("flagUrl").ok_or(ValidationError)?;

    Ok(NewCountry::new(code, name, flag_url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload() {
        let payload = CountryPayload::from_body(
            br#"{"code":"US","name":"United States","flagUrl":"https://flags/us.png"}"#,
        );
        let country = validate(&payload).unwrap();
        assert_eq!(country, NewCountry::new("US", "United States", "https://flags/us.png"));
    }

    #[test]
    fn test_missing_flag_url() {
        let payload = CountryPayload::from_body(br#"{"code":"US","name":"United States"}"#);
        assert_eq!(validate(&payload), Err(ValidationError));
    }

    #[test]
    fn test_empty_field_rejected() {
        let payload = CountryPayload::new()
            .with("code", Some(""))
            .with("name", Some("France"))
            .with("flagUrl", Some("url"));
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn test_non_string_field_rejected() {
        let payload = CountryPayload::from_body(br#"{"code":42,"name":"France","flagUrl":"url"}"#);
        assert_eq!(payload.get("code"), None);
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn test_null_field_rejected() {
        let payload = CountryPayload::from_body(br#"{"code":"FR","name":null,"flagUrl":"url"}"#);
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn test_malformed_json_is_empty() {
        let payload = CountryPayload::from_body(b"{not json");
        assert!(payload.is_empty());
        assert!(validate(&payload).is_err());
    }

    #[test]
    fn test_invalid_utf8_is_empty() {
        assert!(CountryPayload::from_body(&[0xff, 0xfe, 0x7b]).is_empty());
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(CountryPayload::from_body(br#"["US","United States"]"#).is_empty());
        assert!(CountryPayload::from_body(b"\"US\"").is_empty());
    }

    #[test]
    fn test_extra_fields_ignored() {
        let payload = CountryPayload::from_body(
            br#"{"code":"BR","name":"Brazil","flagUrl":"url","capital":"Brasilia","population":1}"#,
        );
        assert_eq!(validate(&payload).unwrap().code, "BR");
    }

    #[test]
    fn test_error_message() {
        assert_eq!(ValidationError.to_string(), "code, name, and flagUrl are required.");
    }
}
