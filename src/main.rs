//! ERP bridge server
//!
//! Usage: `erp-bridge [config.yaml]`. The config path falls back to
//! `ERP_BRIDGE_CONFIG`, then `bridge.yaml`. `ERP_BRIDGE_*` variables override
//! individual values.

use anyhow::{Context, Result};
use erp_bridge::prelude::*;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "bridge.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, RUST_LOG wins over the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ERP_BRIDGE_CONFIG").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let mut config = BridgeConfig::from_yaml_file(&path)?;
    config.apply_env_overrides();
    config.validate()?;
    tracing::info!(config = %path, remote = %config.remote.url, "configuration loaded");

    let transport = JsonRpcTransport::connect(&config.remote)
        .await
        .context("cannot authenticate against the backend")?;

    ServerBuilder::new()
        .with_client(RpcRecordClient::new(transport))
        .serve(&config.server.bind)
        .await
}
