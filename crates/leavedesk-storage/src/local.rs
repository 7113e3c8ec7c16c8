use crate::traits::{validate_key, AttachmentStore, PutMode, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use leavedesk_core::models::StoredFile;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem attachment store
#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new LocalStore instance
    ///
    /// # Arguments
    /// * `base_path` - Directory holding the attachments (e.g., "/var/lib/leavedesk/attachments")
    /// * `base_url` - Base URL serving that directory (e.g., "http://localhost:3000/attachments")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            base_path,
            base_url,
        })
    }

    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self.base_path.join(key))
    }

    fn generate_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), key)
    }
}

fn write_error(path: &std::path::Path, key: &str, e: std::io::Error) -> StorageError {
    match e.kind() {
        ErrorKind::AlreadyExists => StorageError::Conflict(key.to_string()),
        ErrorKind::PermissionDenied => {
            StorageError::PermissionDenied(format!("{}: {}", path.display(), e))
        }
        _ => StorageError::UploadFailed(format!(
            "Failed to write file {}: {}",
            path.display(),
            e
        )),
    }
}

#[async_trait]
impl AttachmentStore for LocalStore {
    async fn put(
        &self,
        key: &str,
        data: Vec<u8>,
        _content_type: &str,
        mode: PutMode,
    ) -> StorageResult<String> {
        let path = self.key_to_path(key)?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut options = fs::OpenOptions::new();
        options.write(true);
        match mode {
            PutMode::Create => options.create_new(true),
            PutMode::Overwrite => options.create(true).truncate(true),
        };

        let mut file = options
            .open(&path)
            .await
            .map_err(|e| write_error(&path, key, e))?;

        file.write_all(&data)
            .await
            .map_err(|e| write_error(&path, key, e))?;

        file.sync_all()
            .await
            .map_err(|e| write_error(&path, key, e))?;

        tracing::info!(
            path = %path.display(),
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(self.generate_url(key))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<StoredFile>> {
        let mut entries = fs::read_dir(&self.base_path).await.map_err(|e| {
            StorageError::ListFailed(format!(
                "Failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StorageError::ListFailed(e.to_string()))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            // Non UTF-8 names cannot be keys.
            if let Ok(name) = entry.file_name().into_string() {
                if name.starts_with(prefix) {
                    files.push(StoredFile::new(name));
                }
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));

        tracing::debug!(
            path = %self.base_path.display(),
            prefix = %prefix,
            count = files.len(),
            "Local storage listing"
        );

        Ok(files)
    }

    async fn public_url(&self, key: &str) -> StorageResult<String> {
        validate_key(key)?;
        Ok(self.generate_url(key))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.key_to_path(key)?;
        fs::try_exists(&path).await.map_err(|e| {
            StorageError::BackendError(format!("Failed to check {}: {}", path.display(), e))
        })
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}
