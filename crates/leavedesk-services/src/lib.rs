//! Leavedesk Services
//!
//! The workflows behind the dashboard actions: attaching a justification PDF to
//! a leave request, opening an existing attachment, reconciling stored objects
//! with their requests, e-mail notifications, and the chat agent bootstrap.

pub mod agent;
pub mod attachments;
pub mod email;

pub use agent::{
    AgentBootstrap, AgentConfiguration, AgentError, AgentHandle, AgentLoader, HttpAgentLoader,
};
pub use attachments::{
    find_orphans, AttachmentError, AttachmentOpener, AttachmentReconciler,
    AttachmentUploadService, OrphanedAttachment, ReconcileReport, RelinkFailure,
};
pub use email::{render_status_update, EmailError, EmailService, StatusEmail};
