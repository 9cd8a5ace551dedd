//! Typed error handling for the bridge
//!
//! Every failure the bridge can report falls in one of a few categories so
//! that callers can tell "fix your input" apart from "the backend is down"
//! without matching on message strings.
//!
//! # Error Categories
//!
//! - [`RemoteError`]: the backend could not be reached or answered with
//!   something that cannot be interpreted
//! - [`RecordError`]: a fetched record could not be mapped, or was missing
//! - [`ValidationError`]: caller input rejected before any remote call
//! - [`ConfigError`]: configuration parsing and validation
//! - [`RequestError`]: HTTP request binding
//!
//! # Example
//!
//! ```rust,ignore
//! match service.create_partner(request, None).await {
//!     Ok(id) => println!("created {}", id),
//!     Err(BridgeError::Validation(e)) => println!("bad input: {}", e),
//!     Err(BridgeError::Remote(RemoteError::Unavailable { .. })) => retry_later(),
//!     Err(e) => eprintln!("failed: {}", e),
//! }
//! ```

use crate::core::attachment::{MAX_ATTACHMENT_BYTES, MAX_UPLOAD_BODY_BYTES};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type of the bridge
#[derive(Debug)]
pub enum BridgeError {
    /// Transport or protocol failures talking to the backend
    Remote(RemoteError),

    /// Failures mapping fetched records
    Record(RecordError),

    /// Caller input rejected before any remote call
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP request binding errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for BridgeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BridgeError::Remote(e) => write!(f, "{}", e),
            BridgeError::Record(e) => write!(f, "{}", e),
            BridgeError::Validation(e) => write!(f, "{}", e),
            BridgeError::Config(e) => write!(f, "{}", e),
            BridgeError::Request(e) => write!(f, "{}", e),
            BridgeError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for BridgeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BridgeError::Remote(e) => Some(e),
            BridgeError::Record(e) => Some(e),
            BridgeError::Validation(e) => Some(e),
            BridgeError::Config(e) => Some(e),
            BridgeError::Request(e) => Some(e),
            BridgeError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BridgeError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BridgeError::Remote(e) => e.status_code(),
            BridgeError::Record(e) => e.status_code(),
            BridgeError::Validation(_) => StatusCode::BAD_REQUEST,
            BridgeError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BridgeError::Request(_) => StatusCode::BAD_REQUEST,
            BridgeError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BridgeError::Remote(e) => e.error_code(),
            BridgeError::Record(e) => e.error_code(),
            BridgeError::Validation(_) => "VALIDATION_ERROR",
            BridgeError::Config(_) => "CONFIG_ERROR",
            BridgeError::Request(_) => "INVALID_REQUEST",
            BridgeError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Whether the caller can fix this by changing its input
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BridgeError::Record(RecordError::NotFound { model, id }) => Some(serde_json::json!({
                "model": model,
                "id": id
            })),
            BridgeError::Record(RecordError::Malformed { model, field, .. }) => {
                Some(serde_json::json!({
                    "model": model,
                    "field": field
                }))
            }
            BridgeError::Remote(RemoteError::Protocol { model, method, .. }) => {
                Some(serde_json::json!({
                    "model": model,
                    "method": method
                }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Remote Errors
// =============================================================================

/// Errors raised while talking to the backend
///
/// Neither kind is retried: every operation is a single attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The transport could not reach the backend
    Unavailable { message: String },

    /// The backend answered, but not with something we can interpret
    Protocol {
        model: String,
        method: String,
        message: String,
    },
}

impl RemoteError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        RemoteError::Unavailable {
            message: message.into(),
        }
    }

    pub fn protocol(
        model: impl Into<String>,
        method: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RemoteError::Protocol {
            model: model.into(),
            method: method.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RemoteError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RemoteError::Protocol { .. } => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RemoteError::Unavailable { .. } => "REMOTE_UNAVAILABLE",
            RemoteError::Protocol { .. } => "REMOTE_PROTOCOL_ERROR",
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteError::Unavailable { message } => {
                write!(f, "Remote backend unavailable: {}", message)
            }
            RemoteError::Protocol {
                model,
                method,
                message,
            } => {
                write!(
                    f,
                    "Unexpected response from {} on '{}': {}",
                    method, model, message
                )
            }
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<RemoteError> for BridgeError {
    fn from(err: RemoteError) -> Self {
        BridgeError::Remote(err)
    }
}

// =============================================================================
// Record Errors
// =============================================================================

/// Errors raised while mapping fetched records into typed responses
#[derive(Debug, Clone, PartialEq)]
pub enum RecordError {
    /// A record field is missing or has an unexpected shape
    ///
    /// Aborts the whole mapping call: no partial results are returned.
    Malformed {
        model: String,
        field: String,
        message: String,
    },

    /// A lookup by id matched no record
    NotFound { model: String, id: i64 },
}

impl RecordError {
    pub fn malformed(
        model: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RecordError::Malformed {
            model: model.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RecordError::Malformed { .. } => StatusCode::BAD_GATEWAY,
            RecordError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RecordError::Malformed { .. } => "MALFORMED_RECORD",
            RecordError::NotFound { .. } => "RECORD_NOT_FOUND",
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::Malformed {
                model,
                field,
                message,
            } => {
                write!(
                    f,
                    "Malformed {} record, field '{}': {}",
                    model, field, message
                )
            }
            RecordError::NotFound { model, id } => {
                write!(f, "{} with id '{}' not found", model, id)
            }
        }
    }
}

impl std::error::Error for RecordError {}

impl From<RecordError> for BridgeError {
    fn from(err: RecordError) -> Self {
        BridgeError::Record(err)
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to caller input
///
/// `Display` renders the exact message shown to API users.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is absent or empty
    Required { field: &'static str },

    /// Attachment content type is not an accepted image type
    AttachmentType { content_type: String },

    /// Attachment is larger than the accepted maximum
    AttachmentTooLarge { size: usize, max: usize },

    /// Any other rejected argument
    InvalidArgument { argument: String, message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Required { field } => {
                let mut chars = field.chars();
                match chars.next() {
                    Some(first) => write!(
                        f,
                        "{}{} is required",
                        first.to_uppercase(),
                        chars.as_str()
                    ),
                    None => write!(f, "Field is required"),
                }
            }
            ValidationError::AttachmentType { .. } => write!(f, "File type must be png or jpg"),
            ValidationError::AttachmentTooLarge { .. } => {
                write!(f, "File size must be less than 2MB")
            }
            ValidationError::InvalidArgument { argument, message } => {
                write!(f, "Invalid value for '{}': {}", argument, message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for BridgeError {
    fn from(err: ValidationError) -> Self {
        BridgeError::Validation(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Missing required field in configuration
    MissingField { field: String, context: String },

    /// Invalid value in configuration
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::MissingField { field, context } => {
                write!(f, "Missing required field '{}' in {}", field, context)
            }
            ConfigError::InvalidValue {
                field,
                value,
                message,
            } => {
                write!(
                    f,
                    "Invalid value '{}' for field '{}': {}",
                    value, field, message
                )
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        BridgeError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP request binding
#[derive(Debug)]
pub enum RequestError {
    /// Invalid request body
    InvalidBody { message: String },

    /// A form field could not be parsed
    InvalidField { field: String, value: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidBody { message } => {
                write!(f, "Invalid request body: {}", message)
            }
            RequestError::InvalidField { field, value } => {
                write!(f, "Invalid value '{}' for field '{}'", value, field)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl From<RequestError> for BridgeError {
    fn from(err: RequestError) -> Self {
        BridgeError::Request(err)
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for BridgeError {
    fn from(err: serde_yaml::Error) -> Self {
        BridgeError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<axum::extract::multipart::MultipartError> for BridgeError {
    /// A body cut off at the upload ceiling can only be an oversized file;
    /// its exact size is unknown, so the ceiling is reported instead.
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return BridgeError::Validation(ValidationError::AttachmentTooLarge {
                size: MAX_UPLOAD_BODY_BYTES,
                max: MAX_ATTACHMENT_BYTES,
            });
        }
        BridgeError::Request(RequestError::InvalidBody {
            message: err.body_text(),
        })
    }
}

/// A specialized Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_messages_match_user_facing_text() {
        assert_eq!(
            ValidationError::Required { field: "name" }.to_string(),
            "Name is required"
        );
        assert_eq!(
            ValidationError::Required { field: "email" }.to_string(),
            "Email is required"
        );
        assert_eq!(
            ValidationError::Required { field: "id" }.to_string(),
            "Id is required"
        );
    }

    #[test]
    fn test_attachment_messages() {
        let err = ValidationError::AttachmentType {
            content_type: "image/gif".to_string(),
        };
        assert_eq!(err.to_string(), "File type must be png or jpg");

        let err = ValidationError::AttachmentTooLarge {
            size: 2_097_153,
            max: 2_097_152,
        };
        assert_eq!(err.to_string(), "File size must be less than 2MB");
    }

    #[test]
    fn test_status_codes_separate_input_from_backend_failures() {
        let validation: BridgeError = ValidationError::Required { field: "name" }.into();
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert!(validation.is_client_error());

        let unavailable: BridgeError = RemoteError::unavailable("connection refused").into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!unavailable.is_client_error());

        let protocol: BridgeError =
            RemoteError::protocol("res.partner", "search_count", "not an integer").into();
        assert_eq!(protocol.status_code(), StatusCode::BAD_GATEWAY);

        let malformed: BridgeError =
            RecordError::malformed("res.location", "create_date", "bad date").into();
        assert_eq!(malformed.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(malformed.error_code(), "MALFORMED_RECORD");
    }

    #[test]
    fn test_not_found_response_has_details() {
        let err = BridgeError::Record(RecordError::NotFound {
            model: "res.location".to_string(),
            id: 42,
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        let response = err.to_response();
        assert_eq!(response.code, "RECORD_NOT_FOUND");
        assert_eq!(response.details.unwrap()["id"], 42);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingField {
            field: "url".to_string(),
            context: "remote".to_string(),
        };
        assert!(err.to_string().contains("url"));
        assert!(err.to_string().contains("remote"));
    }
}
