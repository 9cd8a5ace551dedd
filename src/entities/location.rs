//! Location read models
//!
//! Two shapes of the same record: [`LocationListResponse`] for listings,
//! which carries only the related division ids, and [`LocationResponse`] for
//! a single location joined with its divisions.

use super::division::DivisionResponse;
use crate::core::error::RecordError;
use crate::core::record::{RawRecord, map_records};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const LOCATION_MODEL: &str = "res.location";

pub const LOCATION_FIELDS: &[&str] = &[
    "id",
    "name",
    "company_id",
    "division_ids",
    "create_date",
    "write_date",
];

/// One-to-many field linking a location to its divisions
pub const DIVISION_IDS_FIELD: &str = "division_ids";

/// Location as returned by listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationListResponse {
    pub id: i64,
    pub name: String,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub division_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocationListResponse {
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        let (company_id, company_name) = record.foreign_key("company_id")?.into_parts();
        Ok(Self {
            id: record.id()?,
            name: record.text("name")?,
            company_id,
            company_name,
            division_ids: record.id_list(DIVISION_IDS_FIELD)?,
            created_at: record.datetime("create_date")?,
            updated_at: record.datetime("write_date")?,
        })
    }

    /// Map a whole listing, preserving order; one bad record fails all
    pub fn from_records(records: Vec<RawRecord>) -> Result<Vec<Self>, RecordError> {
        map_records(records, Self::from_record)
    }
}

/// Single location with its divisions resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationResponse {
    pub id: i64,
    pub name: String,
    pub company_id: Option<i64>,
    pub company_name: Option<String>,
    pub divisions: Vec<DivisionResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocationResponse {
    /// Merge the primary location record with every fetched division
    pub fn from_joined(
        location: &RawRecord,
        divisions: Vec<RawRecord>,
    ) -> Result<Self, RecordError> {
        let (company_id, company_name) = location.foreign_key("company_id")?.into_parts();
        Ok(Self {
            id: location.id()?,
            name: location.text("name")?,
            company_id,
            company_name,
            divisions: map_records(divisions, DivisionResponse::from_record)?,
            created_at: location.datetime("create_date")?,
            updated_at: location.datetime("write_date")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn location(id: i64, company: Value, created: &str) -> RawRecord {
        RawRecord::from_value(
            LOCATION_MODEL,
            json!({
                "id": id,
                "name": format!("Location {}", id),
                "company_id": company,
                "division_ids": [5, 6],
                "create_date": created,
                "write_date": "2024-03-01 00:00:00"
            }),
        )
        .unwrap()
    }

    #[test]
    fn test_unset_company_maps_to_none() {
        let mapped =
            LocationListResponse::from_record(&location(1, json!(false), "2024-01-01 00:00:00"))
                .unwrap();
        assert_eq!(mapped.company_id, None);
        assert_eq!(mapped.company_name, None);
        assert_eq!(mapped.division_ids, vec![5, 6]);
    }

    #[test]
    fn test_company_pair_maps_to_id_and_name() {
        let mapped = LocationListResponse::from_record(&location(
            1,
            json!([7, "Acme"]),
            "2024-01-01 00:00:00",
        ))
        .unwrap();
        assert_eq!(mapped.company_id, Some(7));
        assert_eq!(mapped.company_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_listing_preserves_order() {
        let records = vec![
            location(3, json!(false), "2024-01-01 00:00:00"),
            location(1, json!(false), "2024-01-01 00:00:00"),
            location(2, json!(false), "2024-01-01 00:00:00"),
        ];
        let ids: Vec<_> = LocationListResponse::from_records(records)
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_one_bad_date_fails_the_whole_listing() {
        let records = vec![
            location(1, json!(false), "2024-01-01 00:00:00"),
            location(2, json!(false), "2024-13-45 99:99:99"),
        ];
        let err = LocationListResponse::from_records(records).unwrap_err();
        assert!(matches!(err, RecordError::Malformed { ref field, .. } if field == "create_date"));
    }

    #[test]
    fn test_from_joined_keeps_division_order() {
        let divisions = vec![
            RawRecord::from_value(
                "res.division",
                json!({ "id": 6, "name": "Ops", "create_date": "2024-01-01 00:00:00", "write_date": "2024-01-01 00:00:00" }),
            )
            .unwrap(),
            RawRecord::from_value(
                "res.division",
                json!({ "id": 5, "name": "Sales", "create_date": "2024-01-01 00:00:00", "write_date": "2024-01-01 00:00:00" }),
            )
            .unwrap(),
        ];
        let joined = LocationResponse::from_joined(
            &location(1, json!([7, "Acme"]), "2024-01-01 00:00:00"),
            divisions,
        )
        .unwrap();
        let names: Vec<_> = joined.divisions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Ops", "Sales"]);
        assert_eq!(joined.company_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_serialized_shape() {
        let mapped =
            LocationListResponse::from_record(&location(1, json!(false), "2024-01-01 00:00:00"))
                .unwrap();
        let value = serde_json::to_value(&mapped).unwrap();
        assert_eq!(value["company_id"], Value::Null);
        assert_eq!(value["created_at"], "2024-01-01T00:00:00Z");
    }
}
