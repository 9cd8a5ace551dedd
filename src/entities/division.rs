//! Division read model

use crate::core::error::RecordError;
use crate::core::record::RawRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const DIVISION_MODEL: &str = "res.division";

pub const DIVISION_FIELDS: &[&str] = &["id", "name", "create_date", "write_date"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionResponse {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DivisionResponse {
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        Ok(Self {
            id: record.id()?,
            name: record.text("name")?,
            created_at: record.datetime("create_date")?,
            updated_at: record.datetime("write_date")?,
        })
    }
}
