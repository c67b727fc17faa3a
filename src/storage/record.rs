//! On-disk record format for the selected country log
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Code             | (length-prefixed string)
//! +------------------+
//! | Name             | (length-prefixed string)
//! +------------------+
//! | Flag URL         | (length-prefixed string)
//! +------------------+
//! | Created At       | (i64 LE, microseconds since the Unix epoch)
//! +------------------+
//! | Tombstone Flag   | (u8: 0 = live, 1 = deleted)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum covers all bytes except the checksum itself.

use std::io::{self, Read};

use chrono::{DateTime, Utc};

use super::checksum::compute_checksum;
use crate::countries::SelectedCountry;

/// Smallest possible record: length + 3 empty strings + timestamp + flag + checksum
pub const MIN_RECORD_SIZE: usize = 4 + 4 + 4 + 4 + 8 + 1 + 4;

/// A single entry in the log. Latest entry per code wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRecord {
    pub code: String,
    pub name: String,
    pub flag_url: String,
    pub created_at_micros: i64,
    pub is_tombstone: bool,
}

impl CountryRecord {
    /// Live record for a country
    pub fn live(country: &SelectedCountry) -> Self {
        Self {
            code: country.code.clone(),
            name: country.name.clone(),
            flag_url: country.flag_url.clone(),
            created_at_micros: country.created_at.timestamp_micros(),
            is_tombstone: false,
        }
    }

    /// Deletion marker for a code
    pub fn tombstone(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            flag_url: String::new(),
            created_at_micros: 0,
            is_tombstone: true,
        }
    }

    /// Convert a live record back into a country.
    ///
    /// Returns `None` for tombstones or out-of-range timestamps.
    pub fn to_country(&self) -> Option<SelectedCountry> {
        if self.is_tombstone {
            return None;
        }
        let created_at: DateTime<Utc> = DateTime::from_timestamp_micros(self.created_at_micros)?;
        Some(SelectedCountry::new(
            self.code.clone(),
            self.name.clone(),
            self.flag_url.clone(),
            created_at,
        ))
    }

    fn serialize_body(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(
            12 + self.code.len() + self.name.len() + self.flag_url.len() + 9,
        );

        for field in [&self.code, &self.name, &self.flag_url] {
            buf.extend_from_slice(&(field.len() as u32).to_le_bytes());
            buf.extend_from_slice(field.as_bytes());
        }

        buf.extend_from_slice(&self.created_at_micros.to_le_bytes());
        buf.push(if self.is_tombstone { 1 } else { 0 });

        buf
    }

    /// Serialize the complete record to bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let body = self.serialize_body();
        let record_length = (4 + body.len() + 4) as u32;

        let mut record = Vec::with_capacity(record_length as usize);
        record.extend_from_slice(&record_length.to_le_bytes());
        record.extend_from_slice(&body);

        let checksum = compute_checksum(&record);
        record.extend_from_slice(&checksum.to_le_bytes());

        record
    }

    /// Deserialize a record from bytes, verifying checksum.
    ///
    /// Returns the record and the number of bytes consumed.
    pub fn deserialize(data: &[u8]) -> io::Result<(Self, usize)> {
        if data.len() < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Record too short",
            ));
        }

        let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;

        if record_length < MIN_RECORD_SIZE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid record length: {}", record_length),
            ));
        }

        if data.len() < record_length {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "Record truncated: expected {} bytes, got {}",
                    record_length,
                    data.len()
                ),
            ));
        }

        let checksum_offset = record_length - 4;
        let stored_checksum = u32::from_le_bytes([
            data[checksum_offset],
            data[checksum_offset + 1],
            data[checksum_offset + 2],
            data[checksum_offset + 3],
        ]);
        let computed_checksum = compute_checksum(&data[..checksum_offset]);

        if computed_checksum != stored_checksum {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Checksum mismatch: computed {:08x}, stored {:08x}",
                    computed_checksum, stored_checksum
                ),
            ));
        }

        let mut cursor = io::Cursor::new(&data[4..checksum_offset]);

        fn read_string<R: Read>(reader: &mut R) -> io::Result<String> {
            let mut len_buf = [0u8; 4];
            reader.read_exact(&mut len_buf)?;
            let len = u32::from_le_bytes(len_buf) as usize;

            let mut buf = vec![0u8; len];
            reader.read_exact(&mut buf)?;

            String::from_utf8(buf).map_err(|e| {
                io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {}", e))
            })
        }

        let code = read_string(&mut cursor)?;
        let name = read_string(&mut cursor)?;
        let flag_url = read_string(&mut cursor)?;

        let mut ts_buf = [0u8; 8];
        cursor.read_exact(&mut ts_buf)?;
        let created_at_micros = i64::from_le_bytes(ts_buf);

        let mut tombstone_buf = [0u8; 1];
        cursor.read_exact(&mut tombstone_buf)?;

        Ok((
            Self {
                code,
                name,
                flag_url,
                created_at_micros,
                is_tombstone: tombstone_buf[0] != 0,
            },
            record_length,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_country() -> SelectedCountry {
        let created_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        SelectedCountry::new("USA", "United States", "https://flags/us.png", created_at)
    }

    #[test]
    fn test_live_record_restores_country() {
        let country = sample_country();
        let bytes = CountryRecord::live(&country).serialize();

        let (record, consumed) = CountryRecord::deserialize(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(record.to_country(), Some(country));
    }

    #[test]
    fn test_tombstone_has_no_country() {
        let bytes = CountryRecord::tombstone("USA").serialize();
        let (record, _) = CountryRecord::deserialize(&bytes).unwrap();

        assert!(record.is_tombstone);
        assert_eq!(record.code, "USA");
        assert!(record.to_country().is_none());
    }

    #[test]
    fn test_empty_strings_are_min_size() {
        assert_eq!(CountryRecord::tombstone("").serialize().len(), MIN_RECORD_SIZE);
    }

    #[test]
    fn test_checksum_mismatch_rejected() {
        let mut bytes = CountryRecord::live(&sample_country()).serialize();
        bytes[10] ^= 0xFF;

        let err = CountryRecord::deserialize(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Checksum mismatch"));
    }

    #[test]
    fn test_truncated_record_rejected() {
        let bytes = CountryRecord::live(&sample_country()).serialize();
        let err = CountryRecord::deserialize(&bytes[..bytes.len() - 3]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_consumes_only_first_record() {
        let mut bytes = CountryRecord::live(&sample_country()).serialize();
        let first_len = bytes.len();
        bytes.extend(CountryRecord::tombstone("USA").serialize());

        let (_, consumed) = CountryRecord::deserialize(&bytes).unwrap();
        assert_eq!(consumed, first_len);
    }
}
