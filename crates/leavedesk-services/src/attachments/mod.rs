//! Leave request attachments
//!
//! Upload (validate, store, record), open (resolve a reference to a URL), and
//! reconcile (find stored objects no request points at).

mod error;
mod open;
mod reconcile;
mod upload;

pub use error::AttachmentError;
pub use open::AttachmentOpener;
pub use reconcile::{
    find_orphans, AttachmentReconciler, OrphanedAttachment, ReconcileReport, RelinkFailure,
};
pub use upload::AttachmentUploadService;
