//! Domain models

pub mod attachment;
pub mod employee;
pub mod leave_request;

pub use attachment::{AttachmentCandidate, AttachmentUpload, OpenedAttachment, StoredFile};
pub use employee::Employee;
pub use leave_request::{BadgeTone, LeaveRequest, LeaveRequestUpdate, LeaveStatus, StatusBadge};
