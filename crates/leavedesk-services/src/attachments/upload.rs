use std::sync::Arc;

use leavedesk_core::constants::DEFAULT_ATTACHMENT_EXTENSION;
use leavedesk_core::models::{AttachmentUpload, LeaveRequest, LeaveRequestUpdate};
use leavedesk_core::AttachmentConfig;
use leavedesk_db::LeaveRequestStore;
use leavedesk_storage::{generate_attachment_key, AttachmentStore, PutMode};

use super::error::AttachmentError;

/// Attach a justification file to a leave request.
///
/// The workflow is validate → store → record. The object is written before the
/// record is touched, and a failed record update does not remove the object:
/// the store is the source of truth for bytes and the record is an index that
/// reconciliation can repair.
pub struct AttachmentUploadService {
    store: Arc<dyn AttachmentStore>,
    records: Arc<dyn LeaveRequestStore>,
    config: AttachmentConfig,
}

impl AttachmentUploadService {
    pub fn new(
        store: Arc<dyn AttachmentStore>,
        records: Arc<dyn LeaveRequestStore>,
        config: AttachmentConfig,
    ) -> Self {
        Self {
            store,
            records,
            config,
        }
    }

    /// Check type and size. Makes no store or record call.
    pub fn validate(&self, file: &AttachmentUpload) -> Result<(), AttachmentError> {
        let mime = file.mime_type.trim();
        if !mime.eq_ignore_ascii_case(&self.config.content_type) {
            return Err(AttachmentError::InvalidFileType {
                expected: self.config.content_type.clone(),
                actual: mime.to_string(),
            });
        }

        let size_bytes = file.effective_size();
        if size_bytes > self.config.max_size_bytes {
            return Err(AttachmentError::FileTooLarge {
                size_bytes,
                max_bytes: self.config.max_size_bytes,
            });
        }

        Ok(())
    }

    /// Store `file` under a fresh key and point the request at it.
    ///
    /// Returns the updated request. No retry is attempted at any step.
    pub async fn upload(
        &self,
        request_id: i64,
        employee_external_id: &str,
        file: AttachmentUpload,
    ) -> Result<LeaveRequest, AttachmentError> {
        self.validate(&file)?;

        let extension = file
            .extension()
            .unwrap_or(DEFAULT_ATTACHMENT_EXTENSION)
            .to_string();
        let key = generate_attachment_key(
            employee_external_id,
            request_id,
            chrono::Utc::now().timestamp_millis(),
            &extension,
        )?;
        let size_bytes = file.bytes.len();

        tracing::info!(
            request_id = request_id,
            key = %key,
            original_filename = %file.file_name,
            size_bytes = size_bytes,
            "Uploading leave request attachment"
        );

        let url = self
            .store
            .put(&key, file.bytes, &self.config.content_type, PutMode::Create)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, request_id = request_id, key = %key, "Failed to store attachment");
                AttachmentError::from(e)
            })?;

        let update = LeaveRequestUpdate::attachment(key.clone(), self.config.upload_status.clone());
        let rows = self.records.update_by_id(request_id, &update).await?;

        match rows.into_iter().next() {
            Some(request) => {
                tracing::info!(
                    request_id = request_id,
                    key = %key,
                    storage_url = %url,
                    status = %request.status,
                    "Attachment recorded"
                );
                Ok(request)
            }
            None => {
                tracing::warn!(
                    request_id = request_id,
                    key = %key,
                    "Attachment stored but no leave request was updated"
                );
                Err(AttachmentError::RecordNotFound { request_id, key })
            }
        }
    }
}
