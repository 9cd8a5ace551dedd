//! HTTP server
//!
//! This module provides a `ServerBuilder` that wires:
//! - partner routes (search, multipart create/update, delete)
//! - location routes (paged, listings, single location with divisions)
//! - health check routes

pub mod builder;
pub mod handlers;
pub mod response;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use response::ApiResponse;
