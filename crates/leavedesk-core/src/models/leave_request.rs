use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{STATUS_COMPLETE, STATUS_DENIED, STATUS_ON_PROCESS};

/// A leave request row. Owned by the record store; this crate only reads it and
/// writes `ref_pdf`/`status` through `LeaveRequestUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct LeaveRequest {
    pub request_id: i64,
    pub employee_id: i64,
    pub leave_type: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub days_requested: i32,
    pub approved_days: i32,
    pub status: String,
    pub reason: Option<String>,
    /// Either a retrieval URL or a bare stored filename.
    pub ref_pdf: Option<String>,
}

impl LeaveRequest {
    pub fn leave_status(&self) -> LeaveStatus {
        LeaveStatus::parse(&self.status)
    }

    pub fn has_attachment(&self) -> bool {
        self.ref_pdf
            .as_deref()
            .map(|r| !r.trim().is_empty())
            .unwrap_or(false)
    }

    /// Apply a partial update in place, mirroring what the record store persisted.
    pub fn apply(&mut self, update: &LeaveRequestUpdate) {
        if let Some(ref key) = update.ref_pdf {
            self.ref_pdf = Some(key.clone());
        }
        if let Some(ref status) = update.status {
            self.status = status.clone();
        }
    }
}

/// Fields the attachment workflow is allowed to change. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaveRequestUpdate {
    pub ref_pdf: Option<String>,
    pub status: Option<String>,
}

impl LeaveRequestUpdate {
    pub fn attachment(key: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            ref_pdf: Some(key.into()),
            status: Some(status.into()),
        }
    }
}

/// Typed view over the open status string set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveStatus {
    OnProcess,
    Complete,
    Denied,
    Other(String),
}

impl LeaveStatus {
    /// Total parse; unknown values are preserved verbatim.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case(STATUS_ON_PROCESS) {
            LeaveStatus::OnProcess
        } else if trimmed.eq_ignore_ascii_case(STATUS_COMPLETE) {
            LeaveStatus::Complete
        } else if trimmed.eq_ignore_ascii_case(STATUS_DENIED) {
            LeaveStatus::Denied
        } else {
            LeaveStatus::Other(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LeaveStatus::OnProcess => STATUS_ON_PROCESS,
            LeaveStatus::Complete => STATUS_COMPLETE,
            LeaveStatus::Denied => STATUS_DENIED,
            LeaveStatus::Other(raw) => raw,
        }
    }

    pub fn badge(&self) -> StatusBadge {
        let tone = match self {
            LeaveStatus::Complete => BadgeTone::Success,
            LeaveStatus::OnProcess => BadgeTone::Pending,
            LeaveStatus::Denied => BadgeTone::Danger,
            LeaveStatus::Other(_) => BadgeTone::Neutral,
        };
        StatusBadge {
            label: self.as_str().to_string(),
            tone,
        }
    }
}

impl fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Pending,
    Danger,
    Neutral,
}

/// Display badge for a request status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub label: String,
    pub tone: BadgeTone,
}
