use axum::{routing::get, Router};

use crate::handlers;
use crate::AppState;

/// Create the API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Directory tree
        .route("/api/tree", get(handlers::get_tree))
        // File read + clipboard copy
        .route("/api/file", get(handlers::get_file))
}
