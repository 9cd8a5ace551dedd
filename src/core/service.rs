//! The record client contract
//!
//! [`RecordClient`] is everything the query and mutation services need from
//! the backend. Implementations are expected to issue exactly one remote call
//! per read operation (two for `update`, which confirms the new display
//! name), never retry, and keep no cache.

use crate::core::attachment::Attachment;
use crate::core::error::RemoteError;
use crate::core::filter::{FilterExpression, Projection};
use crate::core::record::RawRecord;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

/// Field name → value map sent on create/update
pub type FieldMap = Map<String, Value>;

/// `(id, display name)` pair confirming a record after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameRecord {
    pub id: i64,
    pub display_name: String,
}

/// Named operations against the backend's entity collections
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Number of records matching `filter`, ignoring pagination
    async fn count(&self, model: &str, filter: &FilterExpression) -> Result<u64, RemoteError>;

    /// Records matching `filter`, restricted by `projection`
    ///
    /// Without a limit every match is returned.
    async fn fetch(
        &self,
        model: &str,
        filter: &FilterExpression,
        projection: &Projection,
    ) -> Result<Vec<RawRecord>, RemoteError>;

    /// Create a record and return its new id
    async fn create(
        &self,
        model: &str,
        fields: FieldMap,
        attachment: Option<&Attachment>,
    ) -> Result<i64, RemoteError>;

    /// Update a record and return its confirmed display name
    async fn update(
        &self,
        model: &str,
        id: i64,
        fields: FieldMap,
        attachment: Option<&Attachment>,
    ) -> Result<NameRecord, RemoteError>;

    /// Delete a record
    async fn remove(&self, model: &str, id: i64) -> Result<bool, RemoteError>;
}
