//! The capability contract every storage backend implements.

use std::time::Duration;

use async_trait::async_trait;

use super::error::StorageError;
use super::types::{MultipartSession, PresignResponse, UploadInput, UploadPart};

/// Uniform operations against one storage backend.
///
/// Implementations are stateless apart from their client handle and are
/// shared across requests as `Arc<dyn StorageProvider>`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Slug this backend is registered under.
    fn name(&self) -> &'static str;

    /// Presign a single PUT-style upload for `input.key`.
    async fn presign_upload(
        &self,
        input: &UploadInput,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError>;

    /// Presign a download of `key`.
    async fn presign_download(
        &self,
        key: &str,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError>;

    /// Delete `key`. Missing-object behavior is backend-defined.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Presign every input in order.
    ///
    /// Stops at the first failure and discards the presigns issued so far;
    /// those URLs stay valid until they expire.
    async fn presign_multi_upload(
        &self,
        inputs: &[UploadInput],
        expires: Duration,
    ) -> Result<Vec<PresignResponse>, StorageError> {
        let mut out = Vec::with_capacity(inputs.len());
        for input in inputs {
            out.push(self.presign_upload(input, expires).await?);
        }
        Ok(out)
    }

    /// Start a multipart upload. The session expiry is fixed by the backend.
    async fn initiate_multipart(
        &self,
        input: &UploadInput,
    ) -> Result<MultipartSession, StorageError>;

    /// Presign the upload of one part. Part number legality is left to the backend.
    async fn presign_multipart_part(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        expires: Duration,
    ) -> Result<PresignResponse, StorageError>;

    /// Assemble the object from the uploaded parts.
    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[UploadPart],
    ) -> Result<(), StorageError>;

    /// Abandon an in-progress multipart upload.
    async fn abort_multipart(&self, key: &str, upload_id: &str) -> Result<(), StorageError>;
}

/// Reject an empty upload id.
///
/// # Errors
///
/// Returns `StorageError::InvalidArgument` when `upload_id` is empty.
pub fn ensure_upload_id(upload_id: &str) -> Result<(), StorageError> {
    if upload_id.is_empty() {
        return Err(StorageError::invalid_argument("upload_id required"));
    }
    Ok(())
}

/// Parts sorted by part number, as backends expect them on completion.
///
/// # Errors
///
/// Returns `StorageError::InvalidArgument` when `parts` is empty.
pub fn ordered_parts(parts: &[UploadPart]) -> Result<Vec<UploadPart>, StorageError> {
    if parts.is_empty() {
        return Err(StorageError::invalid_argument("no parts provided"));
    }
    let mut ordered = parts.to_vec();
    ordered.sort_by_key(|part| part.part_number);
    Ok(ordered)
}

/// Argument checks for `complete_multipart`, run before any backend call.
///
/// # Errors
///
/// Returns `StorageError::InvalidArgument` for an empty upload id or part list.
pub fn validate_completion(
    upload_id: &str,
    parts: &[UploadPart],
) -> Result<Vec<UploadPart>, StorageError> {
    ensure_upload_id(upload_id)?;
    ordered_parts(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::testing::InMemoryProvider;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![UploadPart::new(1, "a")], "upload_id required")]
    #[case("upload-1", vec![], "no parts provided")]
    #[case("", vec![], "upload_id required")]
    fn test_validate_completion_rejects(
        #[case] upload_id: &str,
        #[case] parts: Vec<UploadPart>,
        #[case] message: &str,
    ) {
        let err = validate_completion(upload_id, &parts).unwrap_err();
        assert!(matches!(err, StorageError::InvalidArgument(_)));
        assert_eq!(err.to_string(), message);
    }

    #[test]
    fn test_ordered_parts_sorts_by_part_number() {
        let parts = vec![
            UploadPart::new(3, "c"),
            UploadPart::new(1, "a"),
            UploadPart::new(2, "b"),
        ];
        let ordered = ordered_parts(&parts).expect("non-empty parts");
        let numbers: Vec<i32> = ordered.iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_presign_multi_upload_keeps_order() {
        let provider = InMemoryProvider::new();
        let inputs = vec![
            UploadInput::new("b.txt", "text/plain"),
            UploadInput::new("a.txt", "text/plain"),
            UploadInput::new("c.txt", "text/plain"),
        ];

        let out = provider
            .presign_multi_upload(&inputs, Duration::from_secs(60))
            .await
            .expect("all presigns succeed");

        let keys: Vec<&str> = out.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["b.txt", "a.txt", "c.txt"]);
        assert!(out.iter().all(|p| p.expires == Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_presign_multi_upload_fails_fast() {
        let provider = InMemoryProvider::new().failing_on("bad.txt");
        let inputs = vec![
            UploadInput::new("a.txt", "text/plain"),
            UploadInput::new("bad.txt", "text/plain"),
            UploadInput::new("c.txt", "text/plain"),
        ];

        let err = provider
            .presign_multi_upload(&inputs, Duration::from_secs(60))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Provider(_)));
        // c.txt is never attempted
        assert_eq!(
            provider.calls(),
            vec!["presign_upload:a.txt", "presign_upload:bad.txt"]
        );
    }

    #[tokio::test]
    async fn test_presign_multi_upload_empty_input() {
        let provider = InMemoryProvider::new();
        let out = provider
            .presign_multi_upload(&[], Duration::from_secs(60))
            .await
            .expect("empty batch succeeds");
        assert!(out.is_empty());
        assert!(provider.calls().is_empty());
    }
}
