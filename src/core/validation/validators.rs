//! Reusable validators

use crate::core::attachment::{ACCEPTED_IMAGE_TYPES, Attachment, MAX_ATTACHMENT_BYTES};
use crate::core::error::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

/// Validator: text field is present and non-empty
pub fn required_text<'a>(
    field: &'static str,
    value: Option<&'a str>,
) -> Result<&'a str, ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::Required { field }),
    }
}

/// Validator: field is present
pub fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or(ValidationError::Required { field })
}

/// Validator: attachment content type is one of `allowed`
pub fn content_type_in(
    allowed: &'static [&'static str],
) -> impl Fn(&Attachment) -> Result<(), ValidationError> + Send + Sync + Clone {
    move |attachment: &Attachment| {
        if allowed.contains(&attachment.content_type.as_str()) {
            Ok(())
        } else {
            Err(ValidationError::AttachmentType {
                content_type: attachment.content_type.clone(),
            })
        }
    }
}

/// Validator: attachment is at most `max` bytes (inclusive)
pub fn max_size(
    max: usize,
) -> impl Fn(&Attachment) -> Result<(), ValidationError> + Send + Sync + Clone {
    move |attachment: &Attachment| {
        let size = attachment.size();
        if size > max {
            Err(ValidationError::AttachmentTooLarge { size, max })
        } else {
            Ok(())
        }
    }
}

/// Validator: optional image attachment, type checked before size
pub fn attachment(attachment: Option<&Attachment>) -> Result<(), ValidationError> {
    let Some(attachment) = attachment else {
        return Ok(());
    };
    content_type_in(ACCEPTED_IMAGE_TYPES)(attachment)?;
    max_size(MAX_ATTACHMENT_BYTES)(attachment)
}

/// Validator: page size must be positive
pub fn positive_limit(limit: usize) -> Result<usize, ValidationError> {
    if limit == 0 {
        Err(ValidationError::InvalidArgument {
            argument: "limit".to_string(),
            message: "must be greater than zero".to_string(),
        })
    } else {
        Ok(limit)
    }
}

/// Validator: sort field is a plain field identifier
pub fn sort_field(field: &str) -> Result<&str, ValidationError> {
    static FIELD_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = FIELD_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field identifier pattern is valid")
    });
    if regex.is_match(field) {
        Ok(field)
    } else {
        Err(ValidationError::InvalidArgument {
            argument: "order_by".to_string(),
            message: format!("'{}' is not a field name", field),
        })
    }
}

/// Validator: id fits the backend's 32-bit integer range
pub fn backend_id(argument: &str, id: i64) -> Result<i64, ValidationError> {
    if i32::try_from(id).is_ok() {
        Ok(id)
    } else {
        Err(ValidationError::InvalidArgument {
            argument: argument.to_string(),
            message: format!("{} is outside the supported id range", id),
        })
    }
}
