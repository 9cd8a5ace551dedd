//! Two-stage joined fetch
//!
//! A primary fetch, key extraction from a one-to-many field of every primary
//! record, then a dependent fetch with `id in <keys>`. The dependent fetch
//! needs the primary's output, so the two calls always run in sequence.

use crate::core::error::{BridgeResult, RecordError};
use crate::core::filter::{FilterExpression, Projection};
use crate::core::record::RawRecord;
use crate::core::service::RecordClient;

/// Which records to join and through which field
#[derive(Debug, Clone)]
pub struct JoinSpec {
    pub primary_model: String,
    pub primary_filter: FilterExpression,
    pub primary_projection: Projection,

    /// One-to-many field on the primary records holding the dependent ids
    pub key_field: String,

    pub dependent_model: String,
    pub dependent_projection: Projection,
}

impl JoinSpec {
    pub fn new(
        primary_model: impl Into<String>,
        primary_filter: FilterExpression,
        primary_projection: Projection,
    ) -> Self {
        Self {
            primary_model: primary_model.into(),
            primary_filter,
            primary_projection,
            key_field: String::new(),
            dependent_model: String::new(),
            dependent_projection: Projection::fields(&[]),
        }
    }

    /// Join `dependent_model` through `key_field`
    pub fn through(
        mut self,
        key_field: impl Into<String>,
        dependent_model: impl Into<String>,
        dependent_projection: Projection,
    ) -> Self {
        self.key_field = key_field.into();
        self.dependent_model = dependent_model.into();
        self.dependent_projection = dependent_projection;
        self
    }
}

/// Keys read from the primary records, in record order
///
/// Not deduplicated: two primaries sharing a dependent id contribute it
/// twice, and the backend still returns that dependent once.
pub fn collect_keys(records: &[RawRecord], key_field: &str) -> Result<Vec<i64>, RecordError> {
    let mut keys = Vec::new();
    for record in records {
        keys.extend(record.id_list(key_field)?);
    }
    Ok(keys)
}

/// Raw outcome of a joined fetch
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecords {
    pub primary_model: String,
    pub primaries: Vec<RawRecord>,
    pub keys: Vec<i64>,
    pub dependents: Vec<RawRecord>,
}

impl JoinedRecords {
    /// The single primary record with every dependent
    ///
    /// No primary is [`RecordError::NotFound`] for `id`. Extra primaries are
    /// dropped with a warning; their dependents are still included.
    pub fn into_single(self, id: i64) -> Result<(RawRecord, Vec<RawRecord>), RecordError> {
        let count = self.primaries.len();
        let mut primaries = self.primaries.into_iter();
        let Some(primary) = primaries.next() else {
            return Err(RecordError::NotFound {
                model: self.primary_model,
                id,
            });
        };
        if count > 1 {
            tracing::warn!(
                model = primary.model(),
                id,
                count,
                "join matched several primary records, using the first"
            );
        }
        Ok((primary, self.dependents))
    }
}

/// Run the primary fetch, extract keys, then run the dependent fetch
///
/// The dependent fetch is issued even when no key was collected, in which
/// case it carries an empty `id in []` filter. The first error from either
/// stage is returned.
pub async fn fetch_joined(
    client: &dyn RecordClient,
    spec: &JoinSpec,
) -> BridgeResult<JoinedRecords> {
    let primaries = client
        .fetch(
            &spec.primary_model,
            &spec.primary_filter,
            &spec.primary_projection,
        )
        .await?;

    let keys = collect_keys(&primaries, &spec.key_field)?;
    tracing::debug!(
        model = %spec.primary_model,
        primaries = primaries.len(),
        keys = keys.len(),
        "collected join keys"
    );

    let dependents = client
        .fetch(
            &spec.dependent_model,
            &FilterExpression::id_in(&keys),
            &spec.dependent_projection,
        )
        .await?;

    Ok(JoinedRecords {
        primary_model: spec.primary_model.clone(),
        primaries,
        keys,
        dependents,
    })
}
