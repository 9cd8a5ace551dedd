//! Partner search and mutations
//!
//! Every mutation validates its request, including the attachment, before
//! the first remote call.

use crate::core::attachment::Attachment;
use crate::core::error::{BridgeResult, RemoteError};
use crate::core::filter::{FilterExpression, Projection};
use crate::core::service::RecordClient;
use crate::core::validation::{self, backend_id, required};
use crate::entities::partner::{
    CreatePartnerRequest, PARTNER_FIELDS, PARTNER_MODEL, PartnerResponse, UpdatePartnerRequest,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct PartnerService {
    client: Arc<dyn RecordClient>,
}

impl PartnerService {
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        Self { client }
    }

    /// Partners whose name contains `name`, case-insensitively
    pub async fn search_partner(&self, name: Option<&str>) -> BridgeResult<Vec<PartnerResponse>> {
        let filter = FilterExpression::new().with_search("name", name);
        let records = self
            .client
            .fetch(PARTNER_MODEL, &filter, &Projection::fields(PARTNER_FIELDS))
            .await?;
        Ok(PartnerResponse::from_records(records)?)
    }

    /// Create a partner and return its id
    pub async fn create_partner(
        &self,
        request: CreatePartnerRequest,
        file: Option<Attachment>,
    ) -> BridgeResult<i64> {
        let fields = request.to_fields()?;
        validation::attachment(file.as_ref())?;

        let id = self
            .client
            .create(PARTNER_MODEL, fields, file.as_ref())
            .await?;
        tracing::info!(id, "partner created");
        Ok(id)
    }

    /// Overwrite a partner; the response holds the confirmed name only
    pub async fn update_partner(
        &self,
        request: UpdatePartnerRequest,
        file: Option<Attachment>,
    ) -> BridgeResult<PartnerResponse> {
        let (id, fields) = request.to_parts()?;
        validation::attachment(file.as_ref())?;
        let id = backend_id("id", id)?;

        let confirmed = self
            .client
            .update(PARTNER_MODEL, id, fields, file.as_ref())
            .await?;
        tracing::info!(id = confirmed.id, "partner updated");
        Ok(PartnerResponse::confirmed(confirmed.display_name))
    }

    /// Delete a partner and describe the outcome
    pub async fn delete_partner(&self, id: Option<i64>) -> BridgeResult<String> {
        let id = backend_id("id", required("id", id)?)?;
        if !self.client.remove(PARTNER_MODEL, id).await? {
            return Err(
                RemoteError::protocol(PARTNER_MODEL, "unlink", "deletion was not confirmed").into(),
            );
        }
        tracing::info!(id, "partner deleted");
        Ok(format!("Record with id: {} has been deleted", id))
    }
}
