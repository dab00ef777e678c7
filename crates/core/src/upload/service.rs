//! Upload service bound to a single storage provider.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::storage::{
    MultipartSession, PresignResponse, ProviderRegistry, ProviderSlug, StorageError,
    StorageProvider, UploadInput, UploadPart,
};

/// Expiry of single, batch and download presigns: 15 minutes.
pub const PRESIGN_TTL: Duration = Duration::from_secs(15 * 60);

/// Expiry of multipart part presigns: 30 minutes.
pub const PART_PRESIGN_TTL: Duration = Duration::from_secs(30 * 60);

/// Pass-through orchestrator with fixed expiry policy.
///
/// Holds no per-request state, so one instance is shared by every handler.
#[derive(Clone)]
pub struct UploadService {
    provider: Arc<dyn StorageProvider>,
}

impl UploadService {
    /// Create a service bound to `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Bind the provider registered under `slug`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ProviderNotFound` if `slug` is not registered.
    pub fn from_registry(
        registry: &ProviderRegistry,
        slug: &ProviderSlug,
    ) -> Result<Self, StorageError> {
        let provider = registry.get(slug)?;
        info!(provider = provider.name(), "Upload service bound to provider");
        Ok(Self::new(provider))
    }

    /// Name of the bound provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Presign a single upload.
    pub async fn presign_single(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<PresignResponse, StorageError> {
        debug!(key = %key, content_type = %content_type, "Presigning upload");
        let input = UploadInput::new(key, content_type);
        self.provider.presign_upload(&input, PRESIGN_TTL).await
    }

    /// Presign a batch of uploads; all or nothing.
    pub async fn presign_many(
        &self,
        inputs: &[UploadInput],
    ) -> Result<Vec<PresignResponse>, StorageError> {
        debug!(count = inputs.len(), "Presigning upload batch");
        self.provider.presign_multi_upload(inputs, PRESIGN_TTL).await
    }

    /// Presign a download.
    pub async fn presign_download(&self, key: &str) -> Result<PresignResponse, StorageError> {
        debug!(key = %key, "Presigning download");
        self.provider.presign_download(key, PRESIGN_TTL).await
    }

    /// Delete an object.
    pub async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        debug!(key = %key, "Deleting object");
        self.provider.delete_object(key).await
    }

    /// Open a multipart upload.
    pub async fn start_multipart(
        &self,
        key: &str,
        content_type: &str,
        max_size: u64,
    ) -> Result<MultipartSession, StorageError> {
        let input = UploadInput::new(key, content_type).with_max_size(max_size);
        let session = self.provider.initiate_multipart(&input).await?;
        info!(key = %key, upload_id = %session.upload_id, "Multipart upload started");
        Ok(session)
    }

    /// Presign the upload of one part.
    pub async fn multipart_part_url(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
    ) -> Result<PresignResponse, StorageError> {
        debug!(key = %key, upload_id = %upload_id, part_number, "Presigning part");
        self.provider
            .presign_multipart_part(key, upload_id, part_number, PART_PRESIGN_TTL)
            .await
    }

    /// Assemble the object from its uploaded parts.
    pub async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[UploadPart],
    ) -> Result<(), StorageError> {
        debug!(key = %key, upload_id = %upload_id, parts = parts.len(), "Completing multipart upload");
        self.provider.complete_multipart(key, upload_id, parts).await
    }

    /// Abandon a multipart upload.
    pub async fn abort_multipart(&self, key: &str, upload_id: &str) -> Result<(), StorageError> {
        debug!(key = %key, upload_id = %upload_id, "Aborting multipart upload");
        self.provider.abort_multipart(key, upload_id).await
    }
}
