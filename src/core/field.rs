//! Decoded field values
//!
//! The backend encodes a few things in ways that are awkward to carry around:
//! an unset many-to-one is the literal `false`, a set one is an
//! `[id, display name]` pair, and timestamps are plain strings. These types
//! are what those encodings become once decoded.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp format used by the backend for datetime fields (always UTC)
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A many-to-one reference as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ForeignKey {
    /// The `false` sentinel
    Unset,
    Present { id: i64, name: String },
}

impl ForeignKey {
    pub fn id(&self) -> Option<i64> {
        match self {
            ForeignKey::Unset => None,
            ForeignKey::Present { id, .. } => Some(*id),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            ForeignKey::Unset => None,
            ForeignKey::Present { name, .. } => Some(name),
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, ForeignKey::Present { .. })
    }

    /// Split into `(id, display name)`, both absent when unset
    pub fn into_parts(self) -> (Option<i64>, Option<String>) {
        match self {
            ForeignKey::Unset => (None, None),
            ForeignKey::Present { id, name } => (Some(id), Some(name)),
        }
    }
}

/// Parse a backend timestamp
pub fn parse_datetime(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT).map(|naive| naive.and_utc())
}

/// Render a timestamp the way the backend expects it
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_unset_foreign_key_has_no_parts() {
        let fk = ForeignKey::Unset;
        assert!(!fk.is_set());
        assert_eq!(fk.id(), None);
        assert_eq!(fk.name(), None);
        assert_eq!(fk.into_parts(), (None, None));
    }

    #[test]
    fn test_present_foreign_key_parts() {
        let fk = ForeignKey::Present {
            id: 7,
            name: "Acme".to_string(),
        };
        assert!(fk.is_set());
        assert_eq!(fk.id(), Some(7));
        assert_eq!(fk.name(), Some("Acme"));
        assert_eq!(fk.into_parts(), (Some(7), Some("Acme".to_string())));
    }

    #[test]
    fn test_parse_datetime() {
        let parsed = parse_datetime("2024-03-05 14:07:09").expect("valid timestamp");
        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 3);
        assert_eq!(parsed.day(), 5);
        assert_eq!(parsed.hour(), 14);
        assert_eq!(parsed.second(), 9);
        assert_eq!(format_datetime(&parsed), "2024-03-05 14:07:09");
    }

    #[test]
    fn test_parse_datetime_rejects_other_formats() {
        assert!(parse_datetime("2024-03-05").is_err());
        assert!(parse_datetime("2024-03-05T14:07:09Z").is_err());
        assert!(parse_datetime("yesterday").is_err());
    }
}
