//! Record store traits
//!
//! These traits define the minimal interface the attachment workflows need from
//! the record store, so workflows can run against PostgreSQL or in memory.

use async_trait::async_trait;
use leavedesk_core::models::{Employee, LeaveRequest, LeaveRequestUpdate};
use leavedesk_core::AppError;

/// Leave request rows
#[async_trait]
pub trait LeaveRequestStore: Send + Sync {
    /// Apply `update` to the row with `request_id` and return the updated rows.
    /// An empty result means no row had that id.
    async fn update_by_id(
        &self,
        request_id: i64,
        update: &LeaveRequestUpdate,
    ) -> Result<Vec<LeaveRequest>, AppError>;

    /// Get a leave request by ID
    async fn get(&self, request_id: i64) -> Result<Option<LeaveRequest>, AppError>;

    /// Requests of one employee, ordered by id
    async fn list_for_employee(&self, employee_id: i64) -> Result<Vec<LeaveRequest>, AppError>;

    /// All requests, ordered by id
    async fn list_all(&self) -> Result<Vec<LeaveRequest>, AppError>;
}

/// Employee lookups
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Employee>, AppError>;
}
