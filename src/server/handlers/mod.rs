//! HTTP handlers
//!
//! Thin adapters: bind the request, call the matching service function and
//! wrap the result in an [`ApiResponse`](super::response::ApiResponse).
//! Failures are returned as [`BridgeError`](crate::core::BridgeError), which
//! renders itself.

pub mod location;
pub mod multipart;
pub mod partner;

use crate::services::{LocationQuery, PartnerService};

/// Shared state of every handler
#[derive(Clone)]
pub struct AppState {
    pub locations: LocationQuery,
    pub partners: PartnerService,
}
