//! Raw records as returned by the backend
//!
//! A [`RawRecord`] is a field-name → dynamic-value map. The accessors here are
//! the only place that inspects raw values; everything they return is typed.
//! Any accessor failure is a [`RecordError::Malformed`] naming the model and
//! field.

use crate::core::error::RecordError;
use crate::core::field::{ForeignKey, parse_datetime};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// One loosely-typed record of a named collection
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    model: String,
    fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(model: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            model: model.into(),
            fields,
        }
    }

    /// Build from a JSON value, which must be an object
    pub fn from_value(model: &str, value: Value) -> Result<Self, RecordError> {
        match value {
            Value::Object(fields) => Ok(Self::new(model, fields)),
            other => Err(RecordError::malformed(
                model,
                "*",
                format!("expected an object, got {}", kind(&other)),
            )),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn require(&self, field: &str) -> Result<&Value, RecordError> {
        self.fields
            .get(field)
            .ok_or_else(|| self.malformed(field, "field is missing"))
    }

    fn malformed(&self, field: &str, message: impl Into<String>) -> RecordError {
        RecordError::malformed(&self.model, field, message)
    }

    /// The record identity
    pub fn id(&self) -> Result<i64, RecordError> {
        self.integer("id")
    }

    /// An integer given either as a number or as its decimal string
    pub fn integer(&self, field: &str) -> Result<i64, RecordError> {
        let value = self.require(field)?;
        as_integer(value)
            .ok_or_else(|| self.malformed(field, format!("expected an integer, got {}", value)))
    }

    /// A required text field
    pub fn text(&self, field: &str) -> Result<String, RecordError> {
        match self.require(field)? {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(self.malformed(field, format!("expected text, got {}", kind(other)))),
        }
    }

    /// A text field where `false` (or null) means "not set"
    pub fn optional_text(&self, field: &str) -> Result<Option<String>, RecordError> {
        match self.require(field)? {
            Value::Bool(false) | Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s.clone())),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(self.malformed(field, format!("expected text, got {}", kind(other)))),
        }
    }

    /// A boolean-like field
    ///
    /// Normalized by comparing the value's text with `"true"`, so `"true"`
    /// and `true` are true and everything else (including `"yes"` or a
    /// non-empty phone number) is false.
    pub fn flag(&self, field: &str) -> Result<bool, RecordError> {
        let text = match self.require(field)? {
            Value::Bool(b) => b.to_string(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Ok(text == "true")
    }

    /// A many-to-one field: `false` or `[id, display name]`
    pub fn foreign_key(&self, field: &str) -> Result<ForeignKey, RecordError> {
        match self.require(field)? {
            Value::Bool(false) | Value::Null => Ok(ForeignKey::Unset),
            Value::Array(pair) if pair.len() == 2 => {
                let id = as_integer(&pair[0]).ok_or_else(|| {
                    self.malformed(field, format!("foreign id is not an integer: {}", pair[0]))
                })?;
                let name = match &pair[1] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Ok(ForeignKey::Present { id, name })
            }
            other => Err(self.malformed(
                field,
                format!("expected false or an [id, name] pair, got {}", other),
            )),
        }
    }

    /// A one-to-many / many-to-many field: a list of foreign ids
    pub fn id_list(&self, field: &str) -> Result<Vec<i64>, RecordError> {
        match self.require(field)? {
            Value::Bool(false) => Ok(Vec::new()),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    as_integer(item).ok_or_else(|| {
                        self.malformed(field, format!("related id is not an integer: {}", item))
                    })
                })
                .collect(),
            other => Err(self.malformed(
                field,
                format!("expected a list of ids, got {}", kind(other)),
            )),
        }
    }

    /// A datetime field in the backend's fixed format
    pub fn datetime(&self, field: &str) -> Result<DateTime<Utc>, RecordError> {
        match self.require(field)? {
            Value::String(s) => parse_datetime(s)
                .map_err(|e| self.malformed(field, format!("invalid datetime '{}': {}", s, e))),
            other => Err(self.malformed(
                field,
                format!("expected a datetime string, got {}", kind(other)),
            )),
        }
    }
}

/// Map every record with `f`, in order, failing on the first error
pub fn map_records<T>(
    records: Vec<RawRecord>,
    f: impl Fn(&RawRecord) -> Result<T, RecordError>,
) -> Result<Vec<T>, RecordError> {
    records.iter().map(f).collect()
}

fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        RawRecord::from_value("res.test", value).expect("object")
    }

    #[test]
    fn test_foreign_key_false_is_unset() {
        let r = record(json!({ "company_id": false }));
        assert_eq!(r.foreign_key("company_id").unwrap(), ForeignKey::Unset);
    }

    #[test]
    fn test_foreign_key_pair_is_unpacked() {
        let r = record(json!({ "company_id": [7, "Acme"] }));
        assert_eq!(
            r.foreign_key("company_id").unwrap(),
            ForeignKey::Present {
                id: 7,
                name: "Acme".to_string()
            }
        );
    }

    #[test]
    fn test_foreign_key_id_may_be_a_string() {
        let r = record(json!({ "company_id": ["12", "Globex"] }));
        assert_eq!(r.foreign_key("company_id").unwrap().id(), Some(12));
    }

    #[test]
    fn test_foreign_key_rejects_other_shapes() {
        for bad in [json!(true), json!([1]), json!(["x", "Acme"]), json!("Acme")] {
            let r = record(json!({ "company_id": bad }));
            assert!(matches!(
                r.foreign_key("company_id"),
                Err(RecordError::Malformed { .. })
            ));
        }
    }

    #[test]
    fn test_flag_uses_text_comparison() {
        let r = record(json!({
            "a": true,
            "b": "true",
            "c": false,
            "d": "false",
            "e": "+62 811 000",
            "f": 1
        }));
        assert!(r.flag("a").unwrap());
        assert!(r.flag("b").unwrap());
        assert!(!r.flag("c").unwrap());
        assert!(!r.flag("d").unwrap());
        assert!(!r.flag("e").unwrap());
        assert!(!r.flag("f").unwrap());
    }

    #[test]
    fn test_optional_text_sentinel() {
        let r = record(json!({ "website": false, "email": "a@b.c" }));
        assert_eq!(r.optional_text("website").unwrap(), None);
        assert_eq!(r.optional_text("email").unwrap(), Some("a@b.c".to_string()));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let r = record(json!({ "id": 1 }));
        let err = r.text("name").unwrap_err();
        assert!(err.to_string().contains("name"));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_id_list() {
        let r = record(json!({ "division_ids": [5, 6], "empty": [], "unset": false }));
        assert_eq!(r.id_list("division_ids").unwrap(), vec![5, 6]);
        assert!(r.id_list("empty").unwrap().is_empty());
        assert!(r.id_list("unset").unwrap().is_empty());
    }

    #[test]
    fn test_datetime_parse_failure_is_malformed() {
        let r = record(json!({ "create_date": "05/03/2024", "write_date": false }));
        assert!(matches!(
            r.datetime("create_date"),
            Err(RecordError::Malformed { .. })
        ));
        assert!(matches!(
            r.datetime("write_date"),
            Err(RecordError::Malformed { .. })
        ));
    }

    #[test]
    fn test_map_records_preserves_order_and_fails_whole_batch() {
        let records = vec![
            record(json!({ "id": 3 })),
            record(json!({ "id": 1 })),
            record(json!({ "id": 2 })),
        ];
        let ids = map_records(records, RawRecord::id).unwrap();
        assert_eq!(ids, vec![3, 1, 2]);

        let records = vec![record(json!({ "id": 3 })), record(json!({ "id": "x" }))];
        assert!(map_records(records, RawRecord::id).is_err());
    }

    #[test]
    fn test_from_value_rejects_non_objects() {
        assert!(RawRecord::from_value("res.test", json!([1, 2])).is_err());
    }
}
