//! The RPC collaborator: execute a named operation on a collection

use crate::core::error::RemoteError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// One `execute_kw` call: model, method, positional and keyword arguments
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    pub model: String,
    pub method: String,
    pub args: Vec<Value>,
    pub kwargs: Map<String, Value>,
}

impl RpcCall {
    pub fn new(model: impl Into<String>, method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            method: method.into(),
            args,
            kwargs: Map::new(),
        }
    }

    pub fn with_kwarg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.to_string(), value.into());
        self
    }

    /// Protocol error attributed to this call
    pub fn protocol_error(&self, message: impl Into<String>) -> RemoteError {
        RemoteError::protocol(&self.model, &self.method, message)
    }
}

/// Authenticated credentials reused for every call
///
/// Created once at startup and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub database: String,
    pub uid: i64,
    pub password: String,
}

impl Session {
    pub fn new(database: impl Into<String>, uid: i64, password: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            uid,
            password: password.into(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("database", &self.database)
            .field("uid", &self.uid)
            .field("password", &"***")
            .finish()
    }
}

/// Executes remote operations against the backend
///
/// Implementations own the session and the wire format. A call is a single
/// attempt: no retries, no caching, no timeout imposed here.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn execute_kw(&self, call: RpcCall) -> Result<Value, RemoteError>;
}
