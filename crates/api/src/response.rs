//! Response envelope and error mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use upload_core::storage::StorageError;
use upload_shared::AppError;

/// Message carried by every success envelope.
pub const SUCCESS_MESSAGE: &str = "success";

/// Message carried by every 400 envelope.
pub const BAD_REQUEST_MESSAGE: &str = "bad request";

/// Success envelope: `{status_code, message, data}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    /// HTTP status code, repeated in the body.
    pub status_code: u16,
    /// Always `"success"`.
    pub message: String,
    /// Operation result.
    pub data: T,
}

/// Error envelope: `{status_code, message, error?}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// HTTP status code, repeated in the body.
    pub status_code: u16,
    /// Human-readable summary.
    pub message: String,
    /// Underlying error text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// 200 response wrapping `data` in the success envelope.
pub fn ok<T: Serialize>(data: T) -> Response {
    let body = SuccessResponse {
        status_code: StatusCode::OK.as_u16(),
        message: SUCCESS_MESSAGE.to_string(),
        data,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// 204 response with no body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Handler error rendered with the error envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let detail = self.0.detail().to_string();

        let message = match self.0 {
            AppError::Validation(_) => {
                warn!(error = %detail, "Rejected request body");
                BAD_REQUEST_MESSAGE.to_string()
            }
            _ => {
                error!(code = self.0.error_code(), error = %detail, "Request failed");
                detail.clone()
            }
        };

        let body = ErrorResponse {
            status_code: status.as_u16(),
            message,
            error: Some(detail),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self(err.into())
    }
}
