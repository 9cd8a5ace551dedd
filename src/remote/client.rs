//! [`RecordClient`] on top of an [`RpcTransport`]
//!
//! Encodes the record operations onto the backend's method names and
//! interprets their results:
//!
//! | operation | method         | args                 | kwargs                          |
//! |-----------|----------------|----------------------|---------------------------------|
//! | fetch     | `search_read`  | `[domain]`           | `fields`, `offset`, `limit`, `order` |
//! | count     | `search_count` | `[domain]`           |                                 |
//! | create    | `create`       | `[fields]`           |                                 |
//! | update    | `write`, then `name_get` | `[[id], fields]`, `[[id]]` |                   |
//! | remove    | `unlink`       | `[[id]]`             |                                 |

use super::transport::{RpcCall, RpcTransport};
use crate::core::attachment::Attachment;
use crate::core::error::RemoteError;
use crate::core::filter::{FilterExpression, Projection};
use crate::core::record::RawRecord;
use crate::core::service::{FieldMap, NameRecord, RecordClient};
use async_trait::async_trait;
use serde_json::{Value, json};

/// Field receiving base64-encoded image attachments
pub const IMAGE_FIELD: &str = "image_1920";

/// Record client speaking the backend's `execute_kw` method set
pub struct RpcRecordClient<T> {
    transport: T,
}

impl<T: RpcTransport> RpcRecordClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, call: RpcCall) -> Result<(RpcCall, Value), RemoteError> {
        tracing::debug!(model = %call.model, method = %call.method, "remote call");
        let echo = RpcCall::new(&call.model, &call.method, Vec::new());
        match self.transport.execute_kw(call).await {
            Ok(value) => Ok((echo, value)),
            Err(e) => {
                tracing::warn!(
                    model = %echo.model,
                    method = %echo.method,
                    error = %e,
                    "remote call failed"
                );
                Err(e)
            }
        }
    }
}

fn with_attachment(mut fields: FieldMap, attachment: Option<&Attachment>) -> FieldMap {
    if let Some(attachment) = attachment {
        fields.insert(IMAGE_FIELD.to_string(), Value::String(attachment.to_base64()));
    }
    fields
}

#[async_trait]
impl<T: RpcTransport> RecordClient for RpcRecordClient<T> {
    async fn count(&self, model: &str, filter: &FilterExpression) -> Result<u64, RemoteError> {
        let call = RpcCall::new(model, "search_count", vec![filter.to_domain()]);
        let (call, result) = self.call(call).await?;
        result
            .as_u64()
            .ok_or_else(|| call.protocol_error(format!("expected a count, got {}", result)))
    }

    async fn fetch(
        &self,
        model: &str,
        filter: &FilterExpression,
        projection: &Projection,
    ) -> Result<Vec<RawRecord>, RemoteError> {
        let mut call = RpcCall::new(model, "search_read", vec![filter.to_domain()])
            .with_kwarg("fields", projection.fields.clone());
        if let Some(offset) = projection.offset {
            call = call.with_kwarg("offset", offset);
        }
        if let Some(limit) = projection.limit {
            call = call.with_kwarg("limit", limit);
        }
        if let Some(sort) = &projection.sort {
            call = call.with_kwarg("order", sort.to_string());
        }

        let (call, result) = self.call(call).await?;
        let Value::Array(rows) = result else {
            return Err(call.protocol_error(format!("expected a list of records, got {}", result)));
        };
        rows.into_iter()
            .map(|row| {
                RawRecord::from_value(model, row).map_err(|e| call.protocol_error(e.to_string()))
            })
            .collect()
    }

    async fn create(
        &self,
        model: &str,
        fields: FieldMap,
        attachment: Option<&Attachment>,
    ) -> Result<i64, RemoteError> {
        let fields = with_attachment(fields, attachment);
        let call = RpcCall::new(model, "create", vec![Value::Object(fields)]);
        let (call, result) = self.call(call).await?;
        result
            .as_i64()
            .ok_or_else(|| call.protocol_error(format!("expected the new id, got {}", result)))
    }

    async fn update(
        &self,
        model: &str,
        id: i64,
        fields: FieldMap,
        attachment: Option<&Attachment>,
    ) -> Result<NameRecord, RemoteError> {
        let fields = with_attachment(fields, attachment);
        let write = RpcCall::new(model, "write", vec![json!([id]), Value::Object(fields)]);
        let (call, written) = self.call(write).await?;
        if written != Value::Bool(true) {
            return Err(call.protocol_error(format!("write was not confirmed: {}", written)));
        }

        let name_get = RpcCall::new(model, "name_get", vec![json!([id])]);
        let (call, names) = self.call(name_get).await?;
        let pair = names
            .as_array()
            .and_then(|entries| entries.first())
            .and_then(Value::as_array)
            .filter(|pair| pair.len() == 2)
            .ok_or_else(|| call.protocol_error(format!("expected [[id, name]], got {}", names)))?;
        let confirmed_id = pair[0]
            .as_i64()
            .ok_or_else(|| call.protocol_error(format!("id is not an integer: {}", pair[0])))?;
        let display_name = pair[1]
            .as_str()
            .ok_or_else(|| call.protocol_error(format!("name is not text: {}", pair[1])))?;

        Ok(NameRecord {
            id: confirmed_id,
            display_name: display_name.to_string(),
        })
    }

    async fn remove(&self, model: &str, id: i64) -> Result<bool, RemoteError> {
        let call = RpcCall::new(model, "unlink", vec![json!([id])]);
        let (call, result) = self.call(call).await?;
        result
            .as_bool()
            .ok_or_else(|| call.protocol_error(format!("expected a boolean, got {}", result)))
    }
}
