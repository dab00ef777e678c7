//! Presigned upload routes.
//!
//! Every handler is a thin translation between JSON bodies and
//! `UploadService`; provider failures surface as 500 with their text.

use axum::{
    Router,
    extract::{Path, State},
    response::Response,
    routing::post,
};
use serde::Deserialize;
use tracing::info;
use upload_core::storage::{UploadInput, UploadPart};

use crate::{
    AppState,
    extractors::ApiJson,
    response::{ApiError, no_content, ok},
};

/// Creates the upload routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/presign", post(presign_single))
        .route("/presign-multi", post(presign_multi))
        .route("/presign-download", post(presign_download))
        .route("/delete", post(delete_object))
        // Multipart flows
        .route("/multipart/start", post(start_multipart))
        .route("/multipart/{upload_id}/presign", post(presign_part))
        .route("/multipart/{upload_id}/complete", post(complete_multipart))
        .route("/multipart/{upload_id}/abort", post(abort_multipart))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for a single upload presign.
#[derive(Debug, Deserialize)]
pub struct PresignRequest {
    /// Object key.
    #[serde(default)]
    pub key: String,
    /// Expected content type.
    #[serde(default)]
    pub content_type: String,
}

/// Request body for a batch presign.
#[derive(Debug, Deserialize)]
pub struct PresignMultiRequest {
    /// Files to presign, in response order.
    #[serde(default)]
    pub files: Vec<UploadInput>,
}

/// Request body naming a single object.
#[derive(Debug, Deserialize)]
pub struct KeyRequest {
    /// Object key.
    #[serde(default)]
    pub key: String,
}

/// Request body for starting a multipart upload.
#[derive(Debug, Deserialize)]
pub struct StartMultipartRequest {
    /// Object key.
    #[serde(default)]
    pub key: String,
    /// Expected content type.
    #[serde(default)]
    pub content_type: String,
    /// Size limit in bytes, `0` for none.
    #[serde(default)]
    pub max_size: u64,
}

/// Request body for presigning one part.
#[derive(Debug, Deserialize)]
pub struct PresignPartRequest {
    /// Object key.
    #[serde(default)]
    pub key: String,
    /// 1-based part number.
    #[serde(default)]
    pub part_number: i32,
}

/// Request body for completing a multipart upload.
#[derive(Debug, Deserialize)]
pub struct CompleteMultipartRequest {
    /// Object key.
    #[serde(default)]
    pub key: String,
    /// Upload id; the path segment is used when omitted.
    #[serde(default)]
    pub upload_id: Option<String>,
    /// Uploaded parts with their ETags.
    #[serde(default)]
    pub parts: Vec<UploadPart>,
}

/// The body's upload id wins over the path segment.
fn resolve_upload_id(path_id: String, body_id: Option<String>) -> String {
    body_id.unwrap_or(path_id)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/presign`
async fn presign_single(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PresignRequest>,
) -> Result<Response, ApiError> {
    let presigned = state
        .uploads
        .presign_single(&payload.key, &payload.content_type)
        .await?;
    Ok(ok(presigned))
}

/// POST `/presign-multi`
async fn presign_multi(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PresignMultiRequest>,
) -> Result<Response, ApiError> {
    let presigned = state.uploads.presign_many(&payload.files).await?;
    Ok(ok(presigned))
}

/// POST `/presign-download`
async fn presign_download(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<KeyRequest>,
) -> Result<Response, ApiError> {
    let presigned = state.uploads.presign_download(&payload.key).await?;
    Ok(ok(presigned))
}

/// POST `/delete`
async fn delete_object(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<KeyRequest>,
) -> Result<Response, ApiError> {
    state.uploads.delete_object(&payload.key).await?;
    info!(key = %payload.key, "Object deleted");
    Ok(no_content())
}

/// POST `/multipart/start`
async fn start_multipart(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<StartMultipartRequest>,
) -> Result<Response, ApiError> {
    let session = state
        .uploads
        .start_multipart(&payload.key, &payload.content_type, payload.max_size)
        .await?;
    Ok(ok(session))
}

/// POST `/multipart/{upload_id}/presign`
async fn presign_part(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
    ApiJson(payload): ApiJson<PresignPartRequest>,
) -> Result<Response, ApiError> {
    let presigned = state
        .uploads
        .multipart_part_url(&payload.key, &upload_id, payload.part_number)
        .await?;
    Ok(ok(presigned))
}

/// POST `/multipart/{upload_id}/complete`
async fn complete_multipart(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
    ApiJson(payload): ApiJson<CompleteMultipartRequest>,
) -> Result<Response, ApiError> {
    let upload_id = resolve_upload_id(upload_id, payload.upload_id);
    state
        .uploads
        .complete_multipart(&payload.key, &upload_id, &payload.parts)
        .await?;
    info!(key = %payload.key, upload_id = %upload_id, "Multipart upload completed");
    Ok(no_content())
}

/// POST `/multipart/{upload_id}/abort`
async fn abort_multipart(
    State(state): State<AppState>,
    Path(upload_id): Path<String>,
    ApiJson(payload): ApiJson<KeyRequest>,
) -> Result<Response, ApiError> {
    state
        .uploads
        .abort_multipart(&payload.key, &upload_id)
        .await?;
    info!(key = %payload.key, upload_id = %upload_id, "Multipart upload aborted");
    Ok(no_content())
}
