use chrono::NaiveDate;
use leavedesk_core::models::{AttachmentUpload, Employee, LeaveRequest};

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

pub fn employee() -> Employee {
    Employee {
        id: 1,
        external_id: "emp001".to_string(),
        name: "Ana Lopez".to_string(),
        email: "ana.lopez@example.com".to_string(),
        department: Some("Finance".to_string()),
        position: Some("Analyst".to_string()),
    }
}

pub fn leave_request(request_id: i64) -> LeaveRequest {
    LeaveRequest {
        request_id,
        employee_id: 1,
        leave_type: "Sick leave".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 2, 9),
        end_date: NaiveDate::from_ymd_opt(2026, 2, 11),
        days_requested: 3,
        approved_days: 0,
        status: "Pending".to_string(),
        reason: Some("Flu".to_string()),
        ref_pdf: None,
    }
}

pub fn pdf_upload(file_name: &str) -> AttachmentUpload {
    AttachmentUpload::new(file_name, "application/pdf", PDF_BYTES.to_vec())
}
