//! API routes for the web server

pub mod ask;
pub mod ui;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::SUPPORTED_EXTENSIONS;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Upload + question, with a larger body limit for the document
        .route(
            "/ask",
            post(ask::ask_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    let llm = state.pipeline().llm();

    Json(serde_json::json!({
        "name": "doc-qa",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ask a question about one PDF, Markdown or HTML document",
        "endpoints": {
            "GET /": "Upload form",
            "POST /api/ask": "Multipart upload with `file` and `question` fields",
            "GET /api/info": "This document",
            "GET /health": "Liveness check"
        },
        "supported_extensions": SUPPORTED_EXTENSIONS,
        "llm": {
            "provider": llm.name(),
            "model": llm.model(),
        },
        "chunking": {
            "max_chars": config.chunking.max_chars,
            "strategy": config.chunking.strategy,
        },
        "max_upload_size": config.server.max_upload_size,
    }))
}
