//! Partner endpoints

use super::AppState;
use super::multipart::PartnerForm;
use crate::core::error::BridgeResult;
use crate::entities::partner::PartnerResponse;
use crate::server::response::{
    ApiResponse, DATA_CREATED, DATA_FOUND, DATA_NOT_FOUND, DATA_UPDATED,
};
use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<i64>,
}

/// `GET /partner/search?name=`
///
/// An empty result is a 404 carrying the message only.
pub async fn search_partner(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> BridgeResult<ApiResponse<Vec<PartnerResponse>>> {
    let partners = state.partners.search_partner(query.name.as_deref()).await?;
    if partners.is_empty() {
        return Ok(ApiResponse::message(DATA_NOT_FOUND).with_status(StatusCode::NOT_FOUND));
    }
    Ok(ApiResponse::ok(DATA_FOUND, partners))
}

/// `POST /partner`
pub async fn create_partner(
    State(state): State<AppState>,
    multipart: Multipart,
) -> BridgeResult<ApiResponse<i64>> {
    let (request, file) = PartnerForm::from_multipart(multipart).await?.into_create();
    let id = state.partners.create_partner(request, file).await?;
    Ok(ApiResponse::ok(DATA_CREATED, id))
}

/// `PUT /partner`
pub async fn update_partner(
    State(state): State<AppState>,
    multipart: Multipart,
) -> BridgeResult<ApiResponse<PartnerResponse>> {
    let (request, file) = PartnerForm::from_multipart(multipart).await?.into_update();
    let partner = state.partners.update_partner(request, file).await?;
    Ok(ApiResponse::ok(DATA_UPDATED, partner))
}

/// `DELETE /partner?id=`
pub async fn delete_partner(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> BridgeResult<ApiResponse<()>> {
    let message = state.partners.delete_partner(query.id).await?;
    Ok(ApiResponse::message(message))
}
