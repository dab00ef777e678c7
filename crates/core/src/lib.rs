//! Core upload logic for the upload service.
//!
//! This crate owns the multipart-upload protocol and the storage provider
//! abstraction. It has ZERO web dependencies.
//!
//! # Modules
//!
//! - `storage` - Provider trait, data model, S3 adapter and provider registry
//! - `upload` - Orchestrator applying default expirations before delegating to a provider

pub mod storage;
pub mod upload;
