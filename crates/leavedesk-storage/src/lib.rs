//! Leavedesk Storage Library
//!
//! This crate provides the attachment store abstraction and its backends
//! (local filesystem, in-memory, S3-compatible).
//!
//! # Key format
//!
//! The attachment namespace is flat. Keys written by the upload workflow follow
//! `{employee_external_id}_{request_id}_{epoch_millis}.{extension}`; see the
//! `keys` module. Keys must not contain `..`, `/`, or `\`.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-memory")]
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use keys::{generate_attachment_key, parse_attachment_key, AttachmentKey};
#[cfg(feature = "storage-local")]
pub use local::LocalStore;
pub use leavedesk_core::StorageBackend;
#[cfg(feature = "storage-memory")]
pub use memory::MemoryStore;
#[cfg(feature = "storage-s3")]
pub use s3::S3Store;
pub use traits::{AttachmentStore, PutMode, StorageError, StorageResult};
