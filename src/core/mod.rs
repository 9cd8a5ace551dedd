//! Core types: errors, filters, records and the record client contract

pub mod attachment;
pub mod error;
pub mod field;
pub mod filter;
pub mod query;
pub mod record;
pub mod service;
pub mod validation;

pub use attachment::Attachment;
pub use error::{
    BridgeError, BridgeResult, ConfigError, RecordError, RemoteError, RequestError,
    ValidationError,
};
pub use field::ForeignKey;
pub use filter::{Direction, FilterCondition, FilterExpression, Operator, Projection, SortOrder};
pub use query::{Page, PaginationMeta, QueryParams};
pub use record::RawRecord;
pub use service::{FieldMap, NameRecord, RecordClient};
