//! Location queries
//!
//! Read-only access to locations: paged listings with a total count, plain
//! listings, and the single-location view joined with its divisions.

use crate::core::error::{BridgeResult, RemoteError};
use crate::core::filter::{Direction, FilterCondition, FilterExpression, Operator, Projection, SortOrder};
use crate::core::query::{Page, QueryParams};
use crate::core::service::RecordClient;
use crate::core::validation::{backend_id, positive_limit, sort_field};
use crate::entities::division::{DIVISION_FIELDS, DIVISION_MODEL};
use crate::entities::location::{
    DIVISION_IDS_FIELD, LOCATION_FIELDS, LOCATION_MODEL, LocationListResponse, LocationResponse,
};
use crate::links::{JoinSpec, fetch_joined};
use std::sync::Arc;

/// Typed location queries over a [`RecordClient`]
#[derive(Clone)]
pub struct LocationQuery {
    client: Arc<dyn RecordClient>,
}

impl LocationQuery {
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        Self { client }
    }

    /// One page of locations, optionally filtered by name, with the total
    ///
    /// The fetch and the count run concurrently and both must succeed.
    pub async fn get_paged_locations(
        &self,
        params: &QueryParams,
    ) -> BridgeResult<Page<LocationListResponse>> {
        let limit = positive_limit(params.limit)?;
        let order_by = sort_field(&params.order_by)?;

        let filter = FilterExpression::positive_ids().with_search("name", params.search());
        let projection = Projection::fields(LOCATION_FIELDS)
            .paged(params.page, limit)
            .sorted(SortOrder::new(
                order_by,
                Direction::from_ascending(params.asc),
            ));

        let (records, total) = futures::try_join!(
            self.client.fetch(LOCATION_MODEL, &filter, &projection),
            self.client.count(LOCATION_MODEL, &filter),
        )?;
        if records.len() > limit {
            return Err(RemoteError::protocol(
                LOCATION_MODEL,
                "search_read",
                format!("returned {} records for a limit of {}", records.len(), limit),
            )
            .into());
        }

        let data = LocationListResponse::from_records(records)?;
        let total = usize::try_from(total).unwrap_or(usize::MAX);
        Ok(Page::new(data, params.page, limit, total))
    }

    /// Every location, newest id first
    pub async fn get_all_locations(&self) -> BridgeResult<Vec<LocationListResponse>> {
        self.list(FilterExpression::positive_ids()).await
    }

    /// Locations whose name contains `name`, newest id first
    ///
    /// An absent or empty name lists everything.
    pub async fn search_locations(
        &self,
        name: Option<&str>,
    ) -> BridgeResult<Vec<LocationListResponse>> {
        self.list(FilterExpression::positive_ids().with_search("name", name))
            .await
    }

    /// Locations owned by a company, newest id first
    pub async fn get_locations_by_company_id(
        &self,
        company_id: i64,
    ) -> BridgeResult<Vec<LocationListResponse>> {
        let company_id = backend_id("company_id", company_id)?;
        self.list(FilterExpression::new().with(FilterCondition::new(
            "company_id",
            Operator::Eq,
            company_id,
        )))
        .await
    }

    /// A single location with its divisions
    pub async fn get_location_by_id(&self, id: i64) -> BridgeResult<LocationResponse> {
        let id = backend_id("id", id)?;
        let spec = JoinSpec::new(
            LOCATION_MODEL,
            FilterExpression::by_id(id),
            Projection::fields(LOCATION_FIELDS),
        )
        .through(
            DIVISION_IDS_FIELD,
            DIVISION_MODEL,
            Projection::fields(DIVISION_FIELDS),
        );

        let (location, divisions) = fetch_joined(self.client.as_ref(), &spec)
            .await?
            .into_single(id)?;
        Ok(LocationResponse::from_joined(&location, divisions)?)
    }

    async fn list(&self, filter: FilterExpression) -> BridgeResult<Vec<LocationListResponse>> {
        let projection = Projection::fields(LOCATION_FIELDS).sorted(SortOrder::desc("id"));
        let records = self
            .client
            .fetch(LOCATION_MODEL, &filter, &projection)
            .await?;
        Ok(LocationListResponse::from_records(records)?)
    }
}
