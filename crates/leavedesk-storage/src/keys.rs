//! Attachment key convention.
//!
//! Key format: `{employee_external_id}_{request_id}_{epoch_millis}.{extension}`.
//! The timestamp makes repeated uploads for the same request distinct, and the
//! embedded request id lets orphaned objects be matched back to their request.

use crate::traits::{validate_key, StorageError, StorageResult};

/// Components of a key written by the upload workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentKey {
    pub employee_external_id: String,
    pub request_id: i64,
    pub uploaded_at_millis: i64,
    pub extension: String,
}

/// Generate the storage key for one attachment upload.
pub fn generate_attachment_key(
    employee_external_id: &str,
    request_id: i64,
    epoch_millis: i64,
    extension: &str,
) -> StorageResult<String> {
    if employee_external_id.trim().is_empty() {
        return Err(StorageError::InvalidKey(
            "Employee identifier is empty".to_string(),
        ));
    }
    let key = format!(
        "{}_{}_{}.{}",
        employee_external_id, request_id, epoch_millis, extension
    );
    validate_key(&key)?;
    Ok(key)
}

/// Parse a key produced by [`generate_attachment_key`].
///
/// The employee identifier may itself contain underscores; the request id and
/// timestamp are always the last two `_`-separated fields before the extension.
pub fn parse_attachment_key(key: &str) -> Option<AttachmentKey> {
    let (stem, extension) = key.rsplit_once('.')?;
    let mut fields = stem.rsplitn(3, '_');
    let millis = fields.next()?;
    let request = fields.next()?;
    let employee = fields.next()?;

    if employee.is_empty() || extension.is_empty() {
        return None;
    }
    if !millis.chars().all(|c| c.is_ascii_digit()) || !request.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    Some(AttachmentKey {
        employee_external_id: employee.to_string(),
        request_id: request.parse().ok()?,
        uploaded_at_millis: millis.parse().ok()?,
        extension: extension.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_documented_layout() {
        let key = generate_attachment_key("emp001", 42, 1_700_000_000_123, "pdf").unwrap();
        assert_eq!(key, "emp001_42_1700000000123.pdf");
    }

    #[test]
    fn rejects_unsafe_employee_ids() {
        assert!(generate_attachment_key("", 1, 1, "pdf").is_err());
        assert!(generate_attachment_key("../root", 1, 1, "pdf").is_err());
        assert!(generate_attachment_key("a/b", 1, 1, "pdf").is_err());
    }

    #[test]
    fn parses_generated_keys() {
        let key = generate_attachment_key("hr_emp_7", 42, 1_699_999_999_999, "PDF").unwrap();
        let parsed = parse_attachment_key(&key).unwrap();
        assert_eq!(parsed.employee_external_id, "hr_emp_7");
        assert_eq!(parsed.request_id, 42);
        assert_eq!(parsed.uploaded_at_millis, 1_699_999_999_999);
        assert_eq!(parsed.extension, "PDF");
    }

    #[test]
    fn ignores_foreign_names() {
        assert!(parse_attachment_key("434704698-abc.pdf").is_none());
        assert!(parse_attachment_key("emp001_42_1699999999999").is_none());
        assert!(parse_attachment_key("emp001_x_1699999999999.pdf").is_none());
        assert!(parse_attachment_key("_42_1699999999999.pdf").is_none());
        assert!(parse_attachment_key("42_1699999999999.pdf").is_none());
    }
}
