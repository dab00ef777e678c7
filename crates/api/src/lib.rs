//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST routes under `/api/uploads`
//! - A JSON extractor that rejects malformed bodies with 400
//! - The `{status_code, message, data}` response envelope

pub mod extractors;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use upload_core::upload::UploadService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload orchestrator bound to the configured provider.
    pub uploads: Arc<UploadService>,
}

impl AppState {
    /// Create state around an upload service.
    #[must_use]
    pub fn new(uploads: UploadService) -> Self {
        Self {
            uploads: Arc::new(uploads),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
