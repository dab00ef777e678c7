//! In-memory provider for tests.
//!
//! Issues deterministic fake URLs, records every backend call and treats
//! deleting a missing object as success. Enabled by the `test-util` feature.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::error::StorageError;
use super::provider::{StorageProvider, ensure_upload_id, validate_completion};
use super::types::{MultipartSession, PresignResponse, UploadInput, UploadPart};

/// Base URL of every presigned URL this provider issues.
pub const BASE_URL: &str = "https://storage.test";

/// Recording in-memory `StorageProvider`.
#[derive(Debug, Default)]
pub struct InMemoryProvider {
    fail_on: Option<String>,
    next_upload: AtomicU64,
    calls: Mutex<Vec<String>>,
    completed: Mutex<HashMap<String, Vec<UploadPart>>>,
}

impl InMemoryProvider {
    /// Create a provider that accepts every call.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every backend call touching `key`.
    #[must_use]
    pub fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.fail_on = Some(key.into());
        self
    }

    /// Backend calls made so far, as `operation:key`.
    ///
    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    /// Parts handed to the backend for a completed upload, in forwarded order.
    ///
    /// # Panics
    ///
    /// Panics if the completion log mutex is poisoned.
    #[must_use]
    pub fn completed_parts(&self, upload_id: &str) -> Option<Vec<UploadPart>> {
        self.completed
            .lock()
            .expect("completion log poisoned")
            .get(upload_id)
            .cloned()
    }

    fn call(&self, operation: &str, key: &str) -> Result<(), StorageError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(format!("{operation}:{key}"));
        if self.fail_on.as_deref() == Some(key) {
            return Err(StorageError::provider(operation, "backend rejected key"));
        }
        Ok(())
    }

    fn presigned(method: &str, key: &str, query: &str, expires: Duration) -> PresignResponse {
        PresignResponse {
            url: format!("{BASE_URL}/{key}?{query}X-Expires={}", expires.as_secs()),
            method: method.to_string(),
            headers: HashMap::new(),
            fields: HashMap::new(),
            expires,
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl StorageProvider for InMemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn presign_upload(
        &self,
        input: &UploadInput,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError> {
        self.call("presign_upload", &input.key)?;
        Ok(Self::presigned("PUT", &input.key, "", expires))
    }

    async fn presign_download(
        &self,
        key: &str,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError> {
        self.call("presign_download", key)?;
        Ok(Self::presigned("GET", key, "", expires))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.call("delete_object", key)
    }

    async fn initiate_multipart(
        &self,
        input: &UploadInput,
    ) -> Result<MultipartSession, StorageError> {
        self.call("initiate_multipart", &input.key)?;
        let n = self.next_upload.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(MultipartSession::new(format!("upload-{n}"), &input.key))
    }

    async fn presign_multipart_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError> {
        self.call("presign_multipart_part", key)?;
        let query = format!("uploadId={upload_id}&partNumber={part_number}&");
        Ok(Self::presigned("PUT", key, &query, expires))
    }

    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[UploadPart],
    ) -> Result<(), StorageError> {
        let parts = validate_completion(upload_id, parts)?;
        self.call("complete_multipart", key)?;
        self.completed
            .lock()
            .expect("completion log poisoned")
            .insert(upload_id.to_string(), parts);
        Ok(())
    }

    async fn abort_multipart(&self, key: &str, upload_id: &str) -> Result<(), StorageError> {
        ensure_upload_id(upload_id)?;
        self.call("abort_multipart", key)
    }
}
