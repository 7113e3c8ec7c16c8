use async_trait::async_trait;
use leavedesk_core::models::StoredFile;
use leavedesk_storage::{AttachmentStore, PutMode, StorageBackend, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Store that refuses every write, as a read-only bucket would.
#[derive(Default)]
pub struct ReadOnlyStore {
    pub put_calls: AtomicUsize,
}

#[async_trait]
impl AttachmentStore for ReadOnlyStore {
    async fn put(
        &self,
        key: &str,
        _data: Vec<u8>,
        _content_type: &str,
        _mode: PutMode,
    ) -> StorageResult<String> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::PermissionDenied(format!(
            "write of {} refused",
            key
        )))
    }

    async fn list(&self, _prefix: &str) -> StorageResult<Vec<StoredFile>> {
        Ok(Vec::new())
    }

    async fn public_url(&self, key: &str) -> StorageResult<String> {
        Ok(format!("https://read-only.example.com/{}", key))
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
