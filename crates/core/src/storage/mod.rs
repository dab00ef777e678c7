//! Storage providers for direct-to-bucket uploads.
//!
//! This module provides a backend-agnostic contract for presigned object
//! operations and the multipart-upload protocol:
//! - `StorageProvider` trait implemented by every backend
//! - `S3Provider` backed by the AWS SDK (AWS S3, MinIO, Cloudflare R2)
//! - `ProviderRegistry` mapping provider slugs to live backends
//!
//! # Multipart protocol
//!
//! ```text
//! ┌────────────────────┐   upload_id    ┌──────────────────────────┐
//! │ initiate_multipart │ ─────────────▶ │ presign_multipart_part × N│
//! └────────────────────┘                └──────────────────────────┘
//!                                                    │ client PUTs bytes,
//!                                                    │ collects ETags
//!                                                    ▼
//!                              ┌───────────────────────────────────────┐
//!                              │ complete_multipart  /  abort_multipart │
//!                              └───────────────────────────────────────┘
//! ```
//!
//! The server holds no session state; the upload id and the backend carry it.

mod config;
mod error;
mod provider;
mod registry;
mod s3;
#[cfg(any(test, feature = "test-util"))]
pub mod testing;
mod types;

pub use config::{RegistryConfig, S3Settings};
pub use error::StorageError;
pub use provider::{StorageProvider, ensure_upload_id, ordered_parts, validate_completion};
pub use registry::{ProviderRegistry, ProviderSlug};
pub use s3::S3Provider;
pub use types::{
    MULTIPART_SESSION_TTL_HOURS, MultipartSession, PresignResponse, UploadInput, UploadPart,
};

#[cfg(test)]
pub use provider::MockStorageProvider;
