use std::sync::Arc;

use leavedesk_core::models::{LeaveRequest, OpenedAttachment};
use leavedesk_core::{resolve, MatchingConfig, Resolution};
use leavedesk_storage::AttachmentStore;

use super::error::AttachmentError;

/// Turns a leave request's stored reference into a retrievable URL.
pub struct AttachmentOpener {
    store: Arc<dyn AttachmentStore>,
    matching: MatchingConfig,
}

fn is_url(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

impl AttachmentOpener {
    pub fn new(store: Arc<dyn AttachmentStore>, matching: MatchingConfig) -> Self {
        Self { store, matching }
    }

    /// Find the stored file a bare reference points at.
    pub async fn resolve(&self, stored_ref: &str) -> Result<Resolution, AttachmentError> {
        let listing = self.store.list("").await?;

        match resolve(stored_ref, &listing, &self.matching) {
            Some(resolution) => {
                tracing::debug!(
                    reference = %stored_ref,
                    key = %resolution.file.name,
                    tier = ?resolution.tier,
                    score = ?resolution.score,
                    "Attachment reference resolved"
                );
                Ok(resolution)
            }
            None => {
                tracing::warn!(
                    reference = %stored_ref,
                    searched = listing.len(),
                    "No stored file matches attachment reference"
                );
                Err(AttachmentError::NotFound {
                    reference: stored_ref.to_string(),
                    searched: listing.into_iter().map(|f| f.name).collect(),
                })
            }
        }
    }

    /// Open a stored reference. URLs are returned unchanged.
    pub async fn open(&self, stored_ref: &str) -> Result<OpenedAttachment, AttachmentError> {
        let reference = stored_ref.trim();
        if reference.is_empty() {
            return Err(AttachmentError::NoAttachment);
        }
        if is_url(reference) {
            return Ok(OpenedAttachment {
                key: None,
                url: reference.to_string(),
                matched_by: None,
            });
        }

        let resolution = self.resolve(reference).await?;
        let url = self.store.public_url(&resolution.file.name).await?;

        Ok(OpenedAttachment {
            key: Some(resolution.file.name),
            url,
            matched_by: Some(resolution.tier),
        })
    }

    /// Open the attachment of `request`.
    pub async fn open_request(
        &self,
        request: &LeaveRequest,
    ) -> Result<OpenedAttachment, AttachmentError> {
        match request.ref_pdf.as_deref() {
            Some(reference) if request.has_attachment() => self.open(reference).await,
            _ => Err(AttachmentError::NoAttachment),
        }
    }
}
