//! Upload orchestration.
//!
//! Applies the service's default expirations and shapes raw request
//! parameters into storage inputs before delegating to the one provider
//! bound at startup.

mod service;

pub use service::{PART_PRESIGN_TTL, PRESIGN_TTL, UploadService};
