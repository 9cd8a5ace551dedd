//! Remote side of the bridge
//!
//! - [`RpcTransport`]: executes one named operation against the backend
//! - [`RpcRecordClient`]: the [`RecordClient`](crate::core::RecordClient)
//!   built on any transport
//! - [`JsonRpcTransport`]: HTTP JSON-RPC transport used in production
//! - [`InMemoryBackend`]: transport over in-memory records for tests and
//!   local development

pub mod client;
pub mod in_memory;
pub mod json_rpc;
pub mod transport;

pub use client::{IMAGE_FIELD, RpcRecordClient};
pub use in_memory::InMemoryBackend;
pub use json_rpc::JsonRpcTransport;
pub use transport::{RpcCall, RpcTransport, Session};
