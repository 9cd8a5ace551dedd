//! # ERP Bridge
//!
//! A typed REST facade over the record RPC API of a business-management
//! backend.
//!
//! ## Features
//!
//! - **Typed Records**: loosely-typed backend records are mapped into typed
//!   read models, with `false` sentinels, `[id, name]` foreign keys and fixed
//!   format timestamps decoded in one place
//! - **Filters and Projections**: conjunctive domains, field lists, paging
//!   and sort as value objects
//! - **Joined Fetches**: a primary fetch followed by a dependent fetch keyed
//!   off a one-to-many field
//! - **Validated Mutations**: request and attachment checks run before any
//!   remote call
//! - **Pluggable Transport**: JSON-RPC over HTTP in production, an in-memory
//!   backend for tests and local development
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use erp_bridge::prelude::*;
//!
//! let config = BridgeConfig::from_yaml_file("bridge.yaml")?;
//! let transport = JsonRpcTransport::connect(&config.remote).await?;
//!
//! ServerBuilder::new()
//!     .with_client(RpcRecordClient::new(transport))
//!     .serve(&config.server.bind)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod links;
pub mod remote;
pub mod server;
pub mod services;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        Attachment, BridgeError, BridgeResult, Direction, FilterCondition, FilterExpression,
        ForeignKey, Operator, Page, PaginationMeta, Projection, QueryParams, RawRecord,
        RecordClient, RecordError, RemoteError, SortOrder, ValidationError,
    };

    // === Entities ===
    pub use crate::entities::{
        CreatePartnerRequest, DivisionResponse, LocationListResponse, LocationResponse,
        PartnerResponse, UpdatePartnerRequest,
    };

    // === Remote ===
    pub use crate::remote::{
        InMemoryBackend, JsonRpcTransport, RpcCall, RpcRecordClient, RpcTransport,
    };

    // === Services ===
    pub use crate::services::{LocationQuery, PartnerService};

    // === Config ===
    pub use crate::config::BridgeConfig;

    // === Server ===
    pub use crate::server::{ApiResponse, ServerBuilder};
}
