//! S3 provider backed by the AWS SDK.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{
    Client,
    config::Region,
    error::DisplayErrorContext,
    presigning::{PresignedRequest, PresigningConfig},
    types::{CompletedMultipartUpload, CompletedPart},
};
use tracing::{debug, info};

use super::config::S3Settings;
use super::error::StorageError;
use super::provider::{StorageProvider, ensure_upload_id, validate_completion};
use super::registry::ProviderSlug;
use super::types::{MultipartSession, PresignResponse, UploadInput, UploadPart};

/// S3 (and S3-compatible) storage provider.
#[derive(Clone)]
pub struct S3Provider {
    client: Client,
    bucket: String,
}

impl S3Provider {
    /// Wrap an existing client.
    #[must_use]
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the default AWS credential chain and `settings`.
    pub async fn from_settings(settings: &S3Settings) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        info!(
            bucket = %settings.bucket,
            region = %settings.region,
            endpoint = ?settings.endpoint,
            "S3 storage initialized"
        );

        Self::new(Client::from_conf(builder.build()), settings.bucket.clone())
    }

    /// Bucket every key is resolved against.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn presigning(operation: &str, expires: Duration) -> Result<PresigningConfig, StorageError> {
        PresigningConfig::expires_in(expires).map_err(|e| StorageError::provider(operation, e))
    }
}

fn metadata(src: &HashMap<String, String>) -> Option<HashMap<String, String>> {
    (!src.is_empty()).then(|| src.clone())
}

fn content_type(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn to_response(request: &PresignedRequest, key: &str, expires: Duration) -> PresignResponse {
    PresignResponse {
        url: request.uri().to_string(),
        method: request.method().to_string(),
        headers: request
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        fields: HashMap::new(),
        expires,
        key: key.to_string(),
    }
}

#[async_trait]
impl StorageProvider for S3Provider {
    fn name(&self) -> &'static str {
        ProviderSlug::S3
    }

    async fn presign_upload(
        &self,
        input: &UploadInput,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError> {
        const OP: &str = "s3 presign put";
        debug!(key = %input.key, "Generating presigned upload URL");

        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&input.key)
            .set_content_type(content_type(&input.content_type))
            .set_metadata(metadata(&input.metadata))
            .presigned(Self::presigning(OP, expires)?)
            .await
            .map_err(|e| StorageError::provider(OP, DisplayErrorContext(e)))?;

        Ok(to_response(&presigned, &input.key, expires))
    }

    async fn presign_download(
        &self,
        key: &str,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError> {
        const OP: &str = "s3 presign get";
        debug!(key = %key, "Generating presigned download URL");

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(Self::presigning(OP, expires)?)
            .await
            .map_err(|e| StorageError::provider(OP, DisplayErrorContext(e)))?;

        Ok(to_response(&presigned, key, expires))
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::provider("s3 delete object", DisplayErrorContext(e)))?;

        Ok(())
    }

    async fn initiate_multipart(
        &self,
        input: &UploadInput,
    ) -> Result<MultipartSession, StorageError> {
        const OP: &str = "create multipart upload";
        debug!(key = %input.key, max_size = input.max_size, "Creating multipart upload");

        let output = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(&input.key)
            .set_content_type(content_type(&input.content_type))
            .set_metadata(metadata(&input.metadata))
            .send()
            .await
            .map_err(|e| StorageError::provider(OP, DisplayErrorContext(e)))?;

        let upload_id = output
            .upload_id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| StorageError::provider(OP, "backend returned no upload id"))?;

        Ok(MultipartSession::new(upload_id, &input.key))
    }

    async fn presign_multipart_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError> {
        const OP: &str = "presign upload part";

        let presigned = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .presigned(Self::presigning(OP, expires)?)
            .await
            .map_err(|e| StorageError::provider(OP, DisplayErrorContext(e)))?;

        Ok(to_response(&presigned, key, expires))
    }

    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[UploadPart],
    ) -> Result<(), StorageError> {
        let parts = validate_completion(upload_id, parts)?;

        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(
                parts
                    .into_iter()
                    .map(|part| {
                        CompletedPart::builder()
                            .part_number(part.part_number)
                            .e_tag(part.etag)
                            .build()
                    })
                    .collect(),
            ))
            .build();

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(|e| StorageError::provider("complete multipart upload", DisplayErrorContext(e)))?;

        Ok(())
    }

    async fn abort_multipart(&self, key: &str, upload_id: &str) -> Result<(), StorageError> {
        ensure_upload_id(upload_id)?;

        self.client
            .abort_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await
            .map_err(|e| StorageError::provider("abort multipart upload", DisplayErrorContext(e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::Credentials;

    /// Presigning is a local computation, so static credentials and an
    /// unroutable endpoint are enough.
    fn offline_provider() -> S3Provider {
        let credentials = Credentials::new("AKIDEXAMPLE", "secret", None, None, "test");
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .endpoint_url("http://127.0.0.1:9")
            .force_path_style(true)
            .build();
        S3Provider::new(Client::from_conf(config), "uploads")
    }

    #[tokio::test]
    async fn test_presign_upload_signs_put_with_expiry() {
        let provider = offline_provider();
        let input = UploadInput::new("a/b.bin", "application/octet-stream");

        let response = provider
            .presign_upload(&input, Duration::from_secs(900))
            .await
            .expect("presign works offline");

        assert_eq!(response.method, "PUT");
        assert_eq!(response.key, "a/b.bin");
        assert_eq!(response.expires, Duration::from_secs(900));
        assert!(response.url.contains("/uploads/a/b.bin"));
        assert!(response.url.contains("X-Amz-Expires=900"));
        assert!(response.fields.is_empty());
    }

    #[tokio::test]
    async fn test_presign_download_signs_get() {
        let provider = offline_provider();

        let response = provider
            .presign_download("reports/q1.pdf", Duration::from_secs(600))
            .await
            .expect("presign works offline");

        assert_eq!(response.method, "GET");
        assert!(response.url.contains("/uploads/reports/q1.pdf"));
        assert!(response.url.contains("X-Amz-Expires=600"));
    }

    #[tokio::test]
    async fn test_presign_part_carries_upload_id_and_part_number() {
        let provider = offline_provider();

        let response = provider
            .presign_multipart_part("big.bin", "abc123", 3, Duration::from_secs(1800))
            .await
            .expect("presign works offline");

        assert!(response.url.contains("uploadId=abc123"));
        assert!(response.url.contains("partNumber=3"));
        assert_eq!(response.expires, Duration::from_secs(1800));
    }

    #[tokio::test]
    async fn test_presign_rejects_expiry_over_a_week() {
        let provider = offline_provider();
        let input = UploadInput::new("a.bin", "");

        let err = provider
            .presign_upload(&input, Duration::from_secs(8 * 24 * 3600))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Provider(_)));
        assert!(err.to_string().starts_with("s3 presign put: "));
    }

    // The endpoint is unroutable, so reaching the backend would yield a
    // Provider error rather than InvalidArgument.
    #[tokio::test]
    async fn test_complete_validates_before_backend_call() {
        let provider = offline_provider();

        let err = provider
            .complete_multipart("a.bin", "", &[UploadPart::new(1, "etag")])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));

        let err = provider
            .complete_multipart("a.bin", "abc123", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_abort_validates_before_backend_call() {
        let provider = offline_provider();
        let err = provider.abort_multipart("a.bin", "").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
    }

    #[test]
    fn test_provider_name_and_bucket() {
        let provider = offline_provider();
        assert_eq!(provider.name(), "s3");
        assert_eq!(provider.bucket(), "uploads");
    }

    #[test]
    fn test_optional_fields_are_omitted_when_empty() {
        assert!(content_type("").is_none());
        assert_eq!(content_type("image/png").as_deref(), Some("image/png"));
        assert!(metadata(&HashMap::new()).is_none());
    }
}
