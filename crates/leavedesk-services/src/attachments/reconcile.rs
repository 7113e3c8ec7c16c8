use std::collections::HashMap;
use std::sync::Arc;

use leavedesk_core::models::{LeaveRequest, LeaveRequestUpdate, StoredFile};
use leavedesk_db::LeaveRequestStore;
use leavedesk_storage::{parse_attachment_key, AttachmentStore};
use serde::Serialize;

use super::error::AttachmentError;

/// A stored object, named by the attachment key convention, that its leave
/// request does not reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrphanedAttachment {
    pub key: String,
    pub request_id: i64,
    pub employee_external_id: String,
    pub uploaded_at_millis: i64,
    /// False when no leave request has the id embedded in the key.
    pub request_exists: bool,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    /// Objects in the store, including ones not following the key convention.
    pub scanned: usize,
    pub orphans: Vec<OrphanedAttachment>,
    /// Requests whose missing reference was restored from an orphan.
    pub relinked: Vec<LeaveRequest>,
    /// Relinks the record store refused. Other requests are still attempted.
    pub failed: Vec<RelinkFailure>,
}

/// A relink that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelinkFailure {
    pub request_id: i64,
    pub key: String,
    pub error: String,
}

fn references(request: &LeaveRequest, key: &str) -> bool {
    match request.ref_pdf.as_deref().map(str::trim) {
        Some(reference) => {
            reference == key
                || reference
                    .rsplit_once('/')
                    .map(|(_, tail)| tail == key)
                    .unwrap_or(false)
        }
        None => false,
    }
}

/// Keys following the attachment key convention that no request references.
///
/// Names outside the convention are ignored. Orphans are ordered by request id,
/// newest upload first.
pub fn find_orphans(listing: &[StoredFile], requests: &[LeaveRequest]) -> Vec<OrphanedAttachment> {
    let by_id: HashMap<i64, &LeaveRequest> = requests.iter().map(|r| (r.request_id, r)).collect();

    let mut orphans: Vec<OrphanedAttachment> = listing
        .iter()
        .filter_map(|file| {
            let parsed = parse_attachment_key(&file.name)?;
            let request = by_id.get(&parsed.request_id);
            if request.map(|r| references(r, &file.name)).unwrap_or(false) {
                return None;
            }
            Some(OrphanedAttachment {
                key: file.name.clone(),
                request_id: parsed.request_id,
                employee_external_id: parsed.employee_external_id,
                uploaded_at_millis: parsed.uploaded_at_millis,
                request_exists: request.is_some(),
            })
        })
        .collect();

    orphans.sort_by(|a, b| {
        a.request_id
            .cmp(&b.request_id)
            .then(b.uploaded_at_millis.cmp(&a.uploaded_at_millis))
    });
    orphans
}

/// Compares the attachment store with the leave request records.
///
/// Never deletes anything. With relinking enabled, a request without a
/// reference is pointed at its newest orphaned upload.
pub struct AttachmentReconciler {
    store: Arc<dyn AttachmentStore>,
    records: Arc<dyn LeaveRequestStore>,
    upload_status: String,
}

impl AttachmentReconciler {
    pub fn new(
        store: Arc<dyn AttachmentStore>,
        records: Arc<dyn LeaveRequestStore>,
        upload_status: impl Into<String>,
    ) -> Self {
        Self {
            store,
            records,
            upload_status: upload_status.into(),
        }
    }

    pub async fn run(&self, relink: bool) -> Result<ReconcileReport, AttachmentError> {
        let listing = self.store.list("").await?;
        let requests = self.records.list_all().await?;
        let orphans = find_orphans(&listing, &requests);

        let mut report = ReconcileReport {
            scanned: listing.len(),
            orphans,
            relinked: Vec::new(),
            failed: Vec::new(),
        };

        if relink {
            let unlinked: HashMap<i64, &LeaveRequest> = requests
                .iter()
                .filter(|r| !r.has_attachment())
                .map(|r| (r.request_id, r))
                .collect();

            let mut seen = Vec::new();
            for orphan in &report.orphans {
                // Orphans are sorted newest first within a request.
                if seen.contains(&orphan.request_id) || !unlinked.contains_key(&orphan.request_id)
                {
                    continue;
                }
                seen.push(orphan.request_id);

                let update =
                    LeaveRequestUpdate::attachment(orphan.key.clone(), self.upload_status.clone());
                match self.records.update_by_id(orphan.request_id, &update).await {
                    Ok(rows) => {
                        if let Some(request) = rows.into_iter().next() {
                            tracing::info!(
                                request_id = orphan.request_id,
                                key = %orphan.key,
                                "Relinked orphaned attachment"
                            );
                            report.relinked.push(request);
                        }
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            request_id = orphan.request_id,
                            key = %orphan.key,
                            "Failed to relink orphaned attachment"
                        );
                        report.failed.push(RelinkFailure {
                            request_id: orphan.request_id,
                            key: orphan.key.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        tracing::info!(
            scanned = report.scanned,
            orphans = report.orphans.len(),
            relinked = report.relinked.len(),
            failed = report.failed.len(),
            "Attachment reconciliation finished"
        );

        Ok(report)
    }
}
