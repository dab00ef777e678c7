//! Storage data model shared by every provider.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DurationSeconds, serde_as};

/// Lifetime of a multipart session, independent of any caller expiry.
pub const MULTIPART_SESSION_TTL_HOURS: i64 = 24;

/// A single object the client intends to upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadInput {
    /// Object key in storage (e.g. `uploads/users/123/file.pdf`).
    #[serde(default)]
    pub key: String,
    /// Expected content type.
    #[serde(default)]
    pub content_type: String,
    /// Custom metadata stored with the object.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Size limit in bytes, `0` means unlimited.
    #[serde(default)]
    pub max_size: u64,
}

impl UploadInput {
    /// Create an input with no metadata and no size limit.
    #[must_use]
    pub fn new(key: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content_type: content_type.into(),
            ..Self::default()
        }
    }

    /// Set the size limit.
    #[must_use]
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Add a metadata entry.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Result of a presign operation.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresignResponse {
    /// The presigned URL.
    pub url: String,
    /// HTTP method the URL is signed for (PUT for uploads, GET for downloads).
    pub method: String,
    /// Headers the caller must send along with the request.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    /// Form fields for POST-style uploads, empty for PUT presigns.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, String>,
    /// How long the URL stays valid, serialized as seconds.
    #[serde_as(as = "DurationSeconds<u64>")]
    pub expires: Duration,
    /// Object key the URL refers to.
    pub key: String,
}

/// One uploaded part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPart {
    /// 1-based part number.
    pub part_number: i32,
    /// Backend-issued ETag returned after the part was uploaded.
    pub etag: String,
}

impl UploadPart {
    /// Create a part reference.
    #[must_use]
    pub fn new(part_number: i32, etag: impl Into<String>) -> Self {
        Self {
            part_number,
            etag: etag.into(),
        }
    }
}

/// State of a multipart upload as handed back to the client.
///
/// `parts` is accumulated client-side; the server never tracks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipartSession {
    /// Opaque, backend-assigned upload id.
    pub upload_id: String,
    /// Object key being assembled.
    pub key: String,
    /// Parts collected so far.
    #[serde(default)]
    pub parts: Vec<UploadPart>,
    /// When the session is considered stale.
    pub expires: DateTime<Utc>,
}

impl MultipartSession {
    /// Open a session that expires `MULTIPART_SESSION_TTL_HOURS` from now.
    #[must_use]
    pub fn new(upload_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            upload_id: upload_id.into(),
            key: key.into(),
            parts: Vec::new(),
            expires: Utc::now() + TimeDelta::hours(MULTIPART_SESSION_TTL_HOURS),
        }
    }
}
