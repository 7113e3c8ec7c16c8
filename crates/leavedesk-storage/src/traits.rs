//! Attachment store abstraction
//!
//! This module defines the `AttachmentStore` trait every backend implements.

use crate::StorageBackend;
use async_trait::async_trait;
use leavedesk_core::models::StoredFile;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Object already exists: {0}")]
    Conflict(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Listing failed: {0}")]
    ListFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Whether a write may replace an existing object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutMode {
    /// Fail with `StorageError::Conflict` if the key exists.
    Create,
    Overwrite,
}

/// Attachment store abstraction
///
/// The namespace is flat and shared by every leave request; backends never
/// invent sub-folders.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Store `data` under `key` and return the public URL of the object.
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
        mode: PutMode,
    ) -> StorageResult<String>;

    /// List objects whose key starts with `prefix` (`""` lists everything),
    /// in ascending key order.
    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredFile>>;

    /// Retrievable URL for `key`. Does not check that the object exists.
    async fn public_url(&self, key: &str) -> StorageResult<String>;

    /// Check if an object exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

/// Reject keys that could escape a flat namespace.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}

/// Keys under `prefix` that fit the flat namespace, in ascending order.
///
/// Backends whose listing can return nested or otherwise invalid keys pass it
/// through here so the resolver never picks a key `public_url` would refuse.
pub(crate) fn flat_listing<I>(names: I, prefix: &str) -> Vec<StoredFile>
where
    I: IntoIterator<Item = String>,
{
    let mut files: Vec<StoredFile> = names
        .into_iter()
        .filter(|name| name.starts_with(prefix) && validate_key(name).is_ok())
        .map(StoredFile::new)
        .collect();
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}
