//! Constants shared across crates.

/// Content type accepted for leave request attachments.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Extension used when the uploaded file name carries none.
pub const DEFAULT_ATTACHMENT_EXTENSION: &str = "pdf";

/// Maximum attachment size (10 MiB).
pub const MAX_ATTACHMENT_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Status written to a leave request when an attachment is recorded.
pub const STATUS_ON_PROCESS: &str = "On process";
pub const STATUS_COMPLETE: &str = "Complete";
pub const STATUS_DENIED: &str = "Denied";

/// Default similarity score a fuzzy candidate must exceed.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.7;

/// Default number of leading characters compared by the prefix rule.
pub const DEFAULT_MATCH_PREFIX_LENGTH: usize = 10;
