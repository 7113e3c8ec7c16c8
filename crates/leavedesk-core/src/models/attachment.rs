use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::matching::{normalize, MatchTier};

/// One entry of an attachment store listing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredFile {
    pub name: String,
}

impl StoredFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl From<&str> for StoredFile {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A name under comparison during one resolution call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentCandidate {
    pub original_name: String,
    pub normalized_name: String,
}

impl AttachmentCandidate {
    pub fn new(original_name: &str) -> Self {
        Self {
            original_name: original_name.to_string(),
            normalized_name: normalize(original_name),
        }
    }
}

/// A file picked by the user for attachment to a leave request.
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub file_name: String,
    /// Size as declared by the caller.
    pub size_bytes: u64,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl AttachmentUpload {
    /// Build an upload whose declared size is the byte length.
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Extension of the original file name, if it has one.
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
    }

    /// Effective size used for validation: the larger of declared and actual.
    pub fn effective_size(&self) -> u64 {
        self.size_bytes.max(self.bytes.len() as u64)
    }
}

/// Retrievable location of an attachment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenedAttachment {
    /// Store key the reference resolved to; `None` when the reference was already a URL.
    pub key: Option<String>,
    pub url: String,
    pub matched_by: Option<MatchTier>,
}
