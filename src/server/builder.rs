//! ServerBuilder for fluent API to build HTTP servers

use super::handlers::AppState;
use super::router::{health_routes, location_routes, partner_routes};
use crate::core::service::RecordClient;
use crate::services::{LocationQuery, PartnerService};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the bridge's HTTP server
///
/// # Example
///
/// ```ignore
/// let transport = JsonRpcTransport::connect(&config.remote).await?;
/// ServerBuilder::new()
///     .with_client(RpcRecordClient::new(transport))
///     .serve(&config.server.bind)
///     .await?;
/// ```
pub struct ServerBuilder {
    client: Option<Arc<dyn RecordClient>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self { client: None }
    }

    /// Set the record client (required)
    pub fn with_client(self, client: impl RecordClient + 'static) -> Self {
        self.with_shared_client(Arc::new(client))
    }

    /// Set an already shared record client (required)
    pub fn with_shared_client(mut self, client: Arc<dyn RecordClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the router with health, partner and location routes
    pub fn build(self) -> Result<Router> {
        let client = self
            .client
            .ok_or_else(|| anyhow::anyhow!("RecordClient is required. Call .with_client()"))?;

        let state = AppState {
            locations: LocationQuery::new(client.clone()),
            partners: PartnerService::new(client),
        };

        let app = health_routes()
            .merge(partner_routes(state.clone()))
            .merge(location_routes(state));

        Ok(app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        ))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Handles SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
///
/// A signal whose handler cannot be installed is logged and never fires.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
