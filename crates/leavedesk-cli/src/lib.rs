use std::sync::Arc;

use anyhow::Context;
use leavedesk_core::models::LeaveRequest;
use leavedesk_core::Config;
use leavedesk_db::{
    connect, EmployeeRepository, EmployeeStore, LeaveRequestRepository, LeaveRequestStore,
    MemoryRecordStore,
};

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Content type for a local file, from its extension.
pub fn content_type_for(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Header line matching [`format_request_row`].
pub fn request_table_header() -> String {
    format!(
        "{:<6} {:<16} {:<10} {:>4} {:<12} {:<8} {}",
        "ID", "TYPE", "START", "DAYS", "STATUS", "BADGE", "ATTACHMENT"
    )
}

/// One table row per leave request.
pub fn format_request_row(request: &LeaveRequest) -> String {
    let status = request.leave_status();
    let badge = status.badge();
    let start = request
        .start_date
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".to_string());
    let attachment = if request.has_attachment() {
        truncate_string(request.ref_pdf.as_deref().unwrap_or_default(), 40)
    } else {
        "-".to_string()
    };

    format!(
        "{:<6} {:<16} {:<10} {:>4} {:<12} {:<8} {}",
        request.request_id,
        truncate_string(&request.leave_type, 16),
        start,
        request.days_requested,
        truncate_string(&badge.label, 12),
        serde_json::to_value(badge.tone)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default(),
        attachment
    )
}

/// Record store handles used by the commands.
pub struct Records {
    pub requests: Arc<dyn LeaveRequestStore>,
    pub employees: Arc<dyn EmployeeStore>,
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise an empty in-memory store.
pub async fn connect_records(config: &Config) -> anyhow::Result<Records> {
    match config.database_url.as_deref() {
        Some(url) => {
            let pool = connect(url, config.db_max_connections)
                .await
                .context("Failed to connect to DATABASE_URL")?;
            Ok(Records {
                requests: Arc::new(LeaveRequestRepository::new(pool.clone())),
                employees: Arc::new(EmployeeRepository::new(pool)),
            })
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using an empty in-memory record store");
            let store = MemoryRecordStore::new();
            Ok(Records {
                requests: Arc::new(store.clone()),
                employees: Arc::new(store),
            })
        }
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn request() -> LeaveRequest {
        LeaveRequest {
            request_id: 42,
            employee_id: 1,
            leave_type: "Vacation".to_string(),
            start_date: None,
            end_date: None,
            days_requested: 5,
            approved_days: 0,
            status: "On process".to_string(),
            reason: None,
            ref_pdf: Some("emp001_42_1700000000000.pdf".to_string()),
        }
    }

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_characters() {
        assert_eq!(truncate_string("vacación anual", 9), "vacaci...");
    }

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(content_type_for(Path::new("note.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("photo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("scan")), "application/octet-stream");
    }

    #[test]
    fn row_shows_badge_and_attachment() {
        let row = format_request_row(&request());
        assert!(row.starts_with("42"));
        assert!(row.contains("On process"));
        assert!(row.contains("pending"));
        assert!(row.contains("emp001_42_1700000000000.pdf"));
    }

    #[test]
    fn row_without_attachment_shows_dash() {
        let mut req = request();
        req.ref_pdf = None;
        req.status = "Denied".to_string();
        let row = format_request_row(&req);
        assert!(row.contains("danger"));
        assert!(row.trim_end().ends_with('-'));
    }
}
