//! Partner read model and mutation requests

use crate::core::error::{RecordError, ValidationError};
use crate::core::record::{RawRecord, map_records};
use crate::core::service::FieldMap;
use crate::core::validation::{required, required_text};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARTNER_MODEL: &str = "res.partner";

pub const PARTNER_FIELDS: &[&str] = &["name", "phone", "mobile", "email", "website"];

/// Partner as returned by searches and updates
///
/// After an update only `name` is filled, with the backend's confirmed
/// display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PartnerResponse {
    pub name: String,
    pub phone: Option<String>,
    pub mobile: Option<bool>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl PartnerResponse {
    pub fn from_record(record: &RawRecord) -> Result<Self, RecordError> {
        Ok(Self {
            name: record.text("name")?,
            phone: record.optional_text("phone")?,
            mobile: Some(record.flag("mobile")?),
            email: record.optional_text("email")?,
            website: record.optional_text("website")?,
        })
    }

    pub fn from_records(records: Vec<RawRecord>) -> Result<Vec<Self>, RecordError> {
        map_records(records, Self::from_record)
    }

    /// Response carrying only a confirmed display name
    pub fn confirmed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Fields of a partner to create
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CreatePartnerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<bool>,
    pub website: Option<String>,
}

impl CreatePartnerRequest {
    /// Check required fields in order (name, email, phone, mobile) and
    /// build the field map sent to the backend
    ///
    /// An absent website is sent as `false`, the backend's unset value.
    pub fn to_fields(&self) -> Result<FieldMap, ValidationError> {
        let name = required_text("name", self.name.as_deref())?;
        let email = required_text("email", self.email.as_deref())?;
        let phone = required_text("phone", self.phone.as_deref())?;
        let mobile = required("mobile", self.mobile)?;

        let mut fields = FieldMap::new();
        fields.insert("name".to_string(), Value::from(name));
        fields.insert("email".to_string(), Value::from(email));
        fields.insert("phone".to_string(), Value::from(phone));
        fields.insert("mobile".to_string(), Value::Bool(mobile));
        fields.insert(
            "website".to_string(),
            self.website
                .as_deref()
                .map_or(Value::Bool(false), Value::from),
        );
        Ok(fields)
    }
}

/// Fields of an existing partner to overwrite
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdatePartnerRequest {
    pub id: Option<i64>,
    #[serde(flatten)]
    pub partner: CreatePartnerRequest,
}

impl UpdatePartnerRequest {
    /// `Id is required` comes before any field check
    pub fn to_parts(&self) -> Result<(i64, FieldMap), ValidationError> {
        let id = required("id", self.id)?;
        Ok((id, self.partner.to_fields()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> CreatePartnerRequest {
        CreatePartnerRequest {
            name: Some("Tomás".to_string()),
            email: Some("tomas@example.com".to_string()),
            phone: Some("+34 600 000 000".to_string()),
            mobile: Some(false),
            website: None,
        }
    }

    #[test]
    fn test_false_sentinels_map_to_none() {
        let record = RawRecord::from_value(
            PARTNER_MODEL,
            json!({
                "id": 1,
                "name": "Tomás",
                "phone": false,
                "mobile": false,
                "email": "tomas@example.com",
                "website": false
            }),
        )
        .unwrap();
        let partner = PartnerResponse::from_record(&record).unwrap();
        assert_eq!(partner.phone, None);
        assert_eq!(partner.website, None);
        assert_eq!(partner.mobile, Some(false));
        assert_eq!(partner.email.as_deref(), Some("tomas@example.com"));
    }

    #[test]
    fn test_mobile_text_true_is_true() {
        let record = RawRecord::from_value(
            PARTNER_MODEL,
            json!({ "name": "A", "phone": false, "mobile": "true", "email": false, "website": false }),
        )
        .unwrap();
        assert_eq!(
            PartnerResponse::from_record(&record).unwrap().mobile,
            Some(true)
        );
    }

    #[test]
    fn test_validation_order() {
        let mut request = CreatePartnerRequest::default();
        assert_eq!(request.to_fields().unwrap_err().to_string(), "Name is required");

        request.name = Some("A".to_string());
        assert_eq!(request.to_fields().unwrap_err().to_string(), "Email is required");

        request.email = Some("a@example.com".to_string());
        assert_eq!(request.to_fields().unwrap_err().to_string(), "Phone is required");

        request.phone = Some("1".to_string());
        assert_eq!(request.to_fields().unwrap_err().to_string(), "Mobile is required");
    }

    #[test]
    fn test_fields_sent_to_backend() {
        let fields = complete().to_fields().unwrap();
        assert_eq!(fields["name"], "Tomás");
        assert_eq!(fields["mobile"], false);
        assert_eq!(fields["website"], false);
    }

    #[test]
    fn test_update_checks_id_first() {
        let request = UpdatePartnerRequest::default();
        assert_eq!(request.to_parts().unwrap_err().to_string(), "Id is required");

        let request = UpdatePartnerRequest {
            id: Some(4),
            partner: complete(),
        };
        let (id, fields) = request.to_parts().unwrap();
        assert_eq!(id, 4);
        assert_eq!(fields["email"], "tomas@example.com");
    }
}
