//! Route table

use super::handlers::{AppState, location, partner};
use crate::core::attachment::MAX_UPLOAD_BODY_BYTES;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

/// Partner routes
///
/// - GET /partner/search?name=
/// - POST /partner (multipart)
/// - PUT /partner (multipart, with id)
/// - DELETE /partner?id=
///
/// Bodies over [`MAX_UPLOAD_BODY_BYTES`] are cut off while the form is read
/// and answered with the attachment size error.
pub fn partner_routes(state: AppState) -> Router {
    Router::new()
        .route("/partner/search", get(partner::search_partner))
        .route(
            "/partner",
            axum::routing::post(partner::create_partner)
                .put(partner::update_partner)
                .delete(partner::delete_partner),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
        .with_state(state)
}

/// Location routes
///
/// - GET /location?search=&page=&limit=&order_by=&asc=
/// - GET /location/all
/// - GET /location/search?name=
/// - GET /location/company/{company_id}
/// - GET /location/{id}
pub fn location_routes(state: AppState) -> Router {
    Router::new()
        .route("/location", get(location::list_locations))
        .route("/location/all", get(location::all_locations))
        .route("/location/search", get(location::search_locations))
        .route(
            "/location/company/{company_id}",
            get(location::locations_by_company),
        )
        .route("/location/{id}", get(location::location_by_id))
        .with_state(state)
}

/// Health check routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/healthz", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
    }))
}
