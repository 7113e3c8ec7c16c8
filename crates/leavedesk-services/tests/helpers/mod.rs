//! Test helpers: in-memory stores and fixtures for workflow tests.
//!
//! Run from workspace root: `cargo test -p leavedesk-services`.
#![allow(dead_code)]

pub mod fixtures;
pub mod storage;

use std::sync::Arc;

use leavedesk_core::{AttachmentConfig, MatchingConfig};
use leavedesk_db::MemoryRecordStore;
use leavedesk_services::{AttachmentOpener, AttachmentReconciler, AttachmentUploadService};
use leavedesk_storage::{AttachmentStore, MemoryStore};

/// Workflows wired to shared in-memory stores.
pub struct TestApp {
    pub store: MemoryStore,
    pub records: MemoryRecordStore,
    pub uploads: AttachmentUploadService,
    pub opener: AttachmentOpener,
    pub reconciler: AttachmentReconciler,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new("https://files.example.com/attachments"))
    }

    pub fn with_store(store: MemoryStore) -> Self {
        let records = MemoryRecordStore::new();
        let shared: Arc<dyn AttachmentStore> = Arc::new(store.clone());
        let config = AttachmentConfig::default();

        Self {
            uploads: AttachmentUploadService::new(
                shared.clone(),
                Arc::new(records.clone()),
                config.clone(),
            ),
            opener: AttachmentOpener::new(shared.clone(), MatchingConfig::default()),
            reconciler: AttachmentReconciler::new(
                shared,
                Arc::new(records.clone()),
                config.upload_status,
            ),
            store,
            records,
        }
    }

    pub async fn stored_keys(&self) -> Vec<String> {
        self.store
            .list("")
            .await
            .expect("memory listing")
            .into_iter()
            .map(|f| f.name)
            .collect()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}
