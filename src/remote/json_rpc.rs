//! JSON-RPC transport over HTTP
//!
//! Talks to the backend's `/jsonrpc` endpoint: `common.authenticate` once at
//! startup, then `object.execute_kw` for every record operation, always with
//! the same `(database, uid, password)` triple.

use super::transport::{RpcCall, RpcTransport, Session};
use crate::config::RemoteConfig;
use crate::core::error::RemoteError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

/// Failures of a single JSON-RPC exchange
#[derive(Debug, Error)]
enum JsonRpcError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend answered with HTTP status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("backend fault {code}: {message}")]
    Fault { code: i64, message: String },
}

impl JsonRpcError {
    fn into_remote(self, model: &str, method: &str) -> RemoteError {
        match self {
            JsonRpcError::Http(e) if e.is_decode() => {
                RemoteError::protocol(model, method, e.to_string())
            }
            e @ (JsonRpcError::Http(_) | JsonRpcError::Status(_)) => {
                RemoteError::unavailable(e.to_string())
            }
            e @ (JsonRpcError::Decode(_) | JsonRpcError::Fault { .. }) => {
                RemoteError::protocol(model, method, e.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<FaultBody>,
}

#[derive(Debug, Deserialize)]
struct FaultBody {
    #[serde(default)]
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<FaultData>,
}

#[derive(Debug, Deserialize)]
struct FaultData {
    #[serde(default)]
    message: Option<String>,
}

/// JSON-RPC client bound to one authenticated session
pub struct JsonRpcTransport {
    http: reqwest::Client,
    endpoint: String,
    session: Session,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Build the HTTP client and authenticate once
    pub async fn connect(config: &RemoteConfig) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| RemoteError::unavailable(format!("cannot build HTTP client: {}", e)))?;
        let endpoint = endpoint_for(&config.url);

        let uid = authenticate(&http, &endpoint, config).await?;
        tracing::info!(database = %config.database, uid, "authenticated against backend");

        Ok(Self::with_session(
            http,
            endpoint,
            Session::new(&config.database, uid, &config.password),
        ))
    }

    /// Use an already established session
    pub fn with_session(http: reqwest::Client, endpoint: impl Into<String>, session: Session) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            session,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call_service(
        &self,
        service: &str,
        method: &str,
        args: Vec<Value>,
    ) -> Result<Value, JsonRpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        post_call(&self.http, &self.endpoint, id, service, method, args).await
    }
}

#[async_trait]
impl RpcTransport for JsonRpcTransport {
    async fn execute_kw(&self, call: RpcCall) -> Result<Value, RemoteError> {
        let RpcCall {
            model,
            method,
            args,
            kwargs,
        } = call;
        let params = vec![
            json!(self.session.database),
            json!(self.session.uid),
            json!(self.session.password),
            Value::String(model.clone()),
            Value::String(method.clone()),
            Value::Array(args),
            Value::Object(kwargs),
        ];
        self.call_service("object", "execute_kw", params)
            .await
            .map_err(|e| e.into_remote(&model, &method))
    }
}

/// `<url>/jsonrpc`, tolerating a trailing slash on the base url
pub fn endpoint_for(url: &str) -> String {
    format!("{}/jsonrpc", url.trim_end_matches('/'))
}

async fn authenticate(
    http: &reqwest::Client,
    endpoint: &str,
    config: &RemoteConfig,
) -> Result<i64, RemoteError> {
    let args = vec![
        json!(config.database),
        json!(config.username),
        json!(config.password),
        json!({}),
    ];
    let result = post_call(http, endpoint, 0, "common", "authenticate", args)
        .await
        .map_err(|e| e.into_remote("common", "authenticate"))?;
    match result.as_i64() {
        Some(uid) if uid > 0 => Ok(uid),
        _ => Err(RemoteError::protocol(
            "common",
            "authenticate",
            format!("credentials rejected for user '{}'", config.username),
        )),
    }
}

async fn post_call(
    http: &reqwest::Client,
    endpoint: &str,
    id: u64,
    service: &str,
    method: &str,
    args: Vec<Value>,
) -> Result<Value, JsonRpcError> {
    let body = json!({
        "jsonrpc": "2.0",
        "method": "call",
        "params": {
            "service": service,
            "method": method,
            "args": args,
        },
        "id": id,
    });

    let response = http.post(endpoint).json(&body).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(JsonRpcError::Status(status.as_u16()));
    }

    let bytes = response.bytes().await?;
    let parsed: JsonRpcResponse =
        serde_json::from_slice(&bytes).map_err(|e| JsonRpcError::Decode(e.to_string()))?;

    match parsed.error {
        Some(fault) => {
            let message = fault
                .data
                .and_then(|d| d.message)
                .unwrap_or(fault.message);
            Err(JsonRpcError::Fault {
                code: fault.code,
                message,
            })
        }
        None => Ok(parsed.result.unwrap_or(Value::Null)),
    }
}
