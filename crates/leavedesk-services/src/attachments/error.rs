use leavedesk_core::{AppError, ErrorMetadata, LogLevel};
use leavedesk_storage::StorageError;

/// Failures of the attachment workflows.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Only {expected} files can be attached, got {actual}")]
    InvalidFileType { expected: String, actual: String },

    #[error("File is {size_bytes} bytes, the limit is {max_bytes} bytes")]
    FileTooLarge { size_bytes: u64, max_bytes: u64 },

    #[error("An attachment with key {0} already exists")]
    StorageConflict(String),

    #[error("Attachment store refused the write: {0}")]
    PermissionDenied(String),

    #[error("Attachment {key} was stored but leave request {request_id} does not exist")]
    RecordNotFound { request_id: i64, key: String },

    #[error("No stored file matches {reference} ({count} files searched)", count = .searched.len())]
    NotFound {
        reference: String,
        searched: Vec<String>,
    },

    #[error("Leave request has no attachment")]
    NoAttachment,

    #[error("Storage error: {0}")]
    Storage(#[source] StorageError),

    #[error("Record store error: {0}")]
    Record(#[source] AppError),
}

impl From<StorageError> for AttachmentError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(key) => AttachmentError::StorageConflict(key),
            StorageError::PermissionDenied(msg) => AttachmentError::PermissionDenied(msg),
            other => AttachmentError::Storage(other),
        }
    }
}

impl From<AppError> for AttachmentError {
    fn from(err: AppError) -> Self {
        AttachmentError::Record(err)
    }
}

impl ErrorMetadata for AttachmentError {
    fn error_code(&self) -> &'static str {
        match self {
            AttachmentError::InvalidFileType { .. } => "INVALID_FILE_TYPE",
            AttachmentError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AttachmentError::StorageConflict(_) => "STORAGE_CONFLICT",
            AttachmentError::PermissionDenied(_) => "PERMISSION_DENIED",
            AttachmentError::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            AttachmentError::NotFound { .. } => "ATTACHMENT_NOT_FOUND",
            AttachmentError::NoAttachment => "NO_ATTACHMENT",
            AttachmentError::Storage(_) => "STORAGE_ERROR",
            AttachmentError::Record(_) => "RECORD_STORE_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AttachmentError::InvalidFileType { .. }
                | AttachmentError::FileTooLarge { .. }
                | AttachmentError::StorageConflict(_)
                | AttachmentError::Storage(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            AttachmentError::InvalidFileType { .. } => "Please upload a PDF file".to_string(),
            AttachmentError::FileTooLarge { max_bytes, .. } => format!(
                "The file is too large (maximum {} MB)",
                max_bytes / (1024 * 1024)
            ),
            AttachmentError::StorageConflict(_) => {
                "An attachment with the same name already exists, please try again".to_string()
            }
            AttachmentError::PermissionDenied(_) => {
                "You are not allowed to upload attachments".to_string()
            }
            AttachmentError::RecordNotFound { request_id, .. } => {
                format!("Leave request {} could not be updated", request_id)
            }
            AttachmentError::NotFound { .. } => "The attachment could not be found".to_string(),
            AttachmentError::NoAttachment => "This request has no attachment".to_string(),
            AttachmentError::Storage(_) => "Failed to access attachment storage".to_string(),
            AttachmentError::Record(err) => err.client_message(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AttachmentError::InvalidFileType { .. }
            | AttachmentError::FileTooLarge { .. }
            | AttachmentError::NoAttachment => LogLevel::Debug,
            AttachmentError::StorageConflict(_)
            | AttachmentError::RecordNotFound { .. }
            | AttachmentError::NotFound { .. } => LogLevel::Warn,
            AttachmentError::PermissionDenied(_) | AttachmentError::Storage(_) => LogLevel::Error,
            AttachmentError::Record(err) => err.log_level(),
        }
    }
}
