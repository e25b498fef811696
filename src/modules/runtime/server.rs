//! HTTP server for querygate

use axum::{
    routing::{get, post},
    Router,
};
use querygate_core::{GatewayError, ServerConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::connectors::Connector;
use crate::handlers::{QueryHandler, SearchHandler};
use crate::state::{AppState, Templates};

/// Runtime server fronting a single connector
pub struct Runtime {
    config: ServerConfig,
    state: AppState,
}

impl Runtime {
    /// Create a runtime, reading the templates from the configured directory
    pub fn new(config: ServerConfig, connector: Arc<dyn Connector>) -> Result<Self, GatewayError> {
        let templates = Templates::load(&config.templates_dir)?;
        Ok(Self::with_templates(config, connector, templates))
    }

    /// Create a runtime with templates already in memory
    pub fn with_templates(
        config: ServerConfig,
        connector: Arc<dyn Connector>,
        templates: Templates,
    ) -> Self {
        Self {
            config,
            state: AppState::new(connector, templates),
        }
    }

    /// Build the Axum router
    pub fn build_router(&self) -> Router {
        // CORS configuration
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            // HTML search page
            .route("/search.html", get(SearchHandler::page))
            .route("/search_results.html", post(SearchHandler::results))
            // JSON endpoints
            .route("/query", post(QueryHandler::query))
            .route("/execute", post(QueryHandler::execute))
            // Health check
            .route("/health", get(Self::health_check))
            // State
            .with_state(self.state.clone())
            // Middleware
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Health check endpoint
    async fn health_check() -> &'static str {
        "OK"
    }

    /// Start the server
    pub async fn run(&self) -> Result<(), GatewayError> {
        let addr: SocketAddr = self
            .config
            .bind_address()
            .parse()
            .map_err(|e| GatewayError::Server(format!("Invalid address: {}", e)))?;

        let app = self.build_router();

        info!("Starting querygate server on http://{}", addr);
        info!("Connector: {}", self.state.connector.name());
        info!("Search page: http://{}/search.html", addr);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| GatewayError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, app)
            .with_graceful_shutdown(Self::shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server(format!("Server error: {}", e)))?;

        info!("Server stopped");
        self.shutdown().await?;

        Ok(())
    }

    /// Wait for shutdown signal
    async fn shutdown_signal() {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for CTRL+C: {}", e);
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
                    warn!("Failed to listen for SIGTERM: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {
                debug!("Received CTRL+C, shutting down...");
            }
            _ = terminate => {
                debug!("Received SIGTERM, shutting down...");
            }
        }
    }

    /// Gracefully shutdown the runtime
    pub async fn shutdown(&self) -> Result<(), GatewayError> {
        info!("Closing database connection...");
        if let Err(e) = self.state.connector.close().await {
            warn!("Error closing connector: {}", e);
        }
        info!("Shutdown complete");
        Ok(())
    }
}
