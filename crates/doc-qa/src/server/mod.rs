//! HTTP server with the upload form and the question endpoint

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::QaConfig;
use crate::error::{Error, Result};
use crate::providers::LlmProvider;
use state::AppState;

/// doc-qa HTTP server
pub struct QaServer {
    config: QaConfig,
    state: AppState,
}

impl QaServer {
    /// Create a server backed by Ollama
    pub fn new(config: QaConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create a server around an injected model provider
    pub fn with_provider(config: QaConfig, llm: Arc<dyn LlmProvider>) -> Self {
        let state = AppState::with_provider(config.clone(), llm);
        Self { config, state }
    }

    /// Shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.router();

        tracing::info!("Starting doc-qa server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Build the full router for the given state
pub fn build_router(state: AppState) -> Router {
    let max_upload_size = state.config().server.max_upload_size;
    let enable_cors = state.config().server.enable_cors;

    let router = Router::new()
        .route("/", get(routes::ui::index))
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes(max_upload_size))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        router.layer(cors)
    } else {
        router
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
