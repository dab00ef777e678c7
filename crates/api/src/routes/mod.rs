//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod health;
pub mod uploads;

/// Base path of the upload endpoints.
pub const UPLOADS_BASE_PATH: &str = "/api/uploads";

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .nest(UPLOADS_BASE_PATH, uploads::routes())
}
