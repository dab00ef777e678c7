//! Request extractors.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use upload_shared::AppError;

use crate::response::ApiError;

/// JSON body extractor whose rejections use the error envelope.
///
/// The `Content-Type` header is not inspected. Only a body that is not valid
/// JSON, or whose values have the wrong type, becomes a 400; absent fields
/// take their `#[serde(default)]` values.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| ApiError(AppError::Validation(rejection.body_text())))?;

        serde_json::from_slice(&body)
            .map(Self)
            .map_err(|err| ApiError(AppError::Validation(err.to_string())))
    }
}
