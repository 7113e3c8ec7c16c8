//! In-memory attachment store, for development runs and tests.

use crate::traits::{flat_listing, validate_key, AttachmentStore, PutMode, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use leavedesk_core::models::StoredFile;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Attachment store keeping objects in a process-local map.
#[derive(Clone)]
pub struct MemoryStore {
    files: Arc<Mutex<BTreeMap<String, Vec<u8>>>>,
    base_url: String,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            files: Arc::new(Mutex::new(BTreeMap::new())),
            base_url: base_url.into(),
        }
    }

    fn files(&self) -> StorageResult<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.files
            .lock()
            .map_err(|_| StorageError::BackendError("memory store lock poisoned".to_string()))
    }

    /// Seed an object without going through `put` validation.
    pub fn insert(&self, key: &str, data: Vec<u8>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(key.to_string(), data);
        }
    }

    /// Contents of a stored object.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.files.lock().ok().and_then(|f| f.get(key).cloned())
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory://attachments")
    }
}

#[async_trait]
impl AttachmentStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
        mode: PutMode,
    ) -> StorageResult<String> {
        validate_key(key)?;
        let size = data.len();
        {
            let mut files = self.files()?;
            if mode == PutMode::Create && files.contains_key(key) {
                return Err(StorageError::Conflict(key.to_string()));
            }
            files.insert(key.to_string(), data);
        }
        tracing::debug!(key = %key, size_bytes = size, "Memory storage upload successful");
        Ok(self.generate_url(key))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredFile>> {
        let files = self.files()?;
        Ok(flat_listing(files.keys().cloned(), prefix))
    }

    async fn public_url(&self, key: &str) -> StorageResult<String> {
        validate_key(key)?;
        Ok(self.generate_url(key))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.files()?.contains_key(key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
