//! Binary attachments uploaded alongside a mutation

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Largest accepted attachment, inclusive (2 MiB)
pub const MAX_ATTACHMENT_BYTES: usize = 2_097_152;

/// Request body ceiling for uploads: the largest accepted attachment plus
/// room for the text parts
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_ATTACHMENT_BYTES * 2;

/// Content types accepted for image attachments
pub const ACCEPTED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg"];

/// An uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            file_name: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Base64 form stored in the backend's image field
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}
