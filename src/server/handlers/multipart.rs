//! Partner form binding from `multipart/form-data`

use crate::core::attachment::Attachment;
use crate::core::error::{BridgeError, BridgeResult, RequestError};
use crate::entities::partner::{CreatePartnerRequest, UpdatePartnerRequest};
use axum::extract::Multipart;

/// Part carrying the optional image
pub const FILE_PART: &str = "file";

/// Text fields and file of a partner form
#[derive(Debug, Default)]
pub struct PartnerForm {
    pub id: Option<i64>,
    pub partner: CreatePartnerRequest,
    pub file: Option<Attachment>,
}

impl PartnerForm {
    /// Read every part; unknown parts are ignored
    ///
    /// Empty text parts count as absent. An empty file part without a file
    /// name is what browsers send when nothing was chosen, so it is ignored
    /// too.
    pub async fn from_multipart(mut multipart: Multipart) -> BridgeResult<Self> {
        let mut form = PartnerForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == FILE_PART {
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await?;
                if bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty) {
                    continue;
                }
                let mut attachment = Attachment::new(content_type, bytes.to_vec());
                if let Some(file_name) = file_name {
                    attachment = attachment.with_file_name(file_name);
                }
                form.file = Some(attachment);
                continue;
            }

            let value = field.text().await?;
            if value.is_empty() {
                continue;
            }
            match name.as_str() {
                "id" => form.id = Some(parse_id(&value)?),
                "name" => form.partner.name = Some(value),
                "email" => form.partner.email = Some(value),
                "phone" => form.partner.phone = Some(value),
                "mobile" => form.partner.mobile = Some(parse_flag(&value)?),
                "website" => form.partner.website = Some(value),
                other => tracing::debug!(part = other, "ignoring unknown form part"),
            }
        }

        Ok(form)
    }

    pub fn into_create(self) -> (CreatePartnerRequest, Option<Attachment>) {
        (self.partner, self.file)
    }

    pub fn into_update(self) -> (UpdatePartnerRequest, Option<Attachment>) {
        let request = UpdatePartnerRequest {
            id: self.id,
            partner: self.partner,
        };
        (request, self.file)
    }
}

fn parse_id(value: &str) -> Result<i64, BridgeError> {
    value.trim().parse().map_err(|_| {
        RequestError::InvalidField {
            field: "id".to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

fn parse_flag(value: &str) -> Result<bool, BridgeError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(RequestError::InvalidBody {
            message: format!("mobile must be true or false, got '{}'", other),
        }
        .into()),
    }
}
