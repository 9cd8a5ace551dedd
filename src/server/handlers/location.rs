//! Location endpoints

use super::AppState;
use crate::core::error::BridgeResult;
use crate::core::query::{Page, QueryParams};
use crate::entities::location::{LocationListResponse, LocationResponse};
use crate::server::response::{ApiResponse, DATA_FOUND};
use axum::extract::{Path, Query, State};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// `GET /location`
pub async fn list_locations(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> BridgeResult<ApiResponse<Page<LocationListResponse>>> {
    let page = state.locations.get_paged_locations(&params).await?;
    Ok(ApiResponse::ok(DATA_FOUND, page))
}

/// `GET /location/all`
pub async fn all_locations(
    State(state): State<AppState>,
) -> BridgeResult<ApiResponse<Vec<LocationListResponse>>> {
    let locations = state.locations.get_all_locations().await?;
    Ok(ApiResponse::ok(DATA_FOUND, locations))
}

/// `GET /location/search?name=`
pub async fn search_locations(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> BridgeResult<ApiResponse<Vec<LocationListResponse>>> {
    let locations = state
        .locations
        .search_locations(query.name.as_deref())
        .await?;
    Ok(ApiResponse::ok(DATA_FOUND, locations))
}

/// `GET /location/company/{company_id}`
pub async fn locations_by_company(
    State(state): State<AppState>,
    Path(company_id): Path<i64>,
) -> BridgeResult<ApiResponse<Vec<LocationListResponse>>> {
    let locations = state
        .locations
        .get_locations_by_company_id(company_id)
        .await?;
    Ok(ApiResponse::ok(DATA_FOUND, locations))
}

/// `GET /location/{id}`
pub async fn location_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> BridgeResult<ApiResponse<LocationResponse>> {
    let location = state.locations.get_location_by_id(id).await?;
    Ok(ApiResponse::ok(DATA_FOUND, location))
}
