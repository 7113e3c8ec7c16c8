//! In-memory record store, for tests and database-less local runs.

use async_trait::async_trait;
use leavedesk_core::models::{Employee, LeaveRequest, LeaveRequestUpdate};
use leavedesk_core::AppError;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{EmployeeStore, LeaveRequestStore};

#[derive(Default)]
struct Records {
    requests: BTreeMap<i64, LeaveRequest>,
    employees: BTreeMap<i64, Employee>,
}

/// Leave requests and employees held in process memory.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<Mutex<Records>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, Records>, AppError> {
        self.records
            .lock()
            .map_err(|_| AppError::Internal("record store lock poisoned".to_string()))
    }

    /// Insert or replace a leave request.
    pub fn add_request(&self, request: LeaveRequest) -> Result<(), AppError> {
        self.records()?.requests.insert(request.request_id, request);
        Ok(())
    }

    /// Insert or replace an employee.
    pub fn add_employee(&self, employee: Employee) -> Result<(), AppError> {
        self.records()?.employees.insert(employee.id, employee);
        Ok(())
    }
}

#[async_trait]
impl LeaveRequestStore for MemoryRecordStore {
    async fn update_by_id(
        &self,
        request_id: i64,
        update: &LeaveRequestUpdate,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let mut records = self.records()?;
        match records.requests.get_mut(&request_id) {
            Some(request) => {
                request.apply(update);
                Ok(vec![request.clone()])
            }
            None => Ok(Vec::new()),
        }
    }

    async fn get(&self, request_id: i64) -> Result<Option<LeaveRequest>, AppError> {
        Ok(self.records()?.requests.get(&request_id).cloned())
    }

    async fn list_for_employee(&self, employee_id: i64) -> Result<Vec<LeaveRequest>, AppError> {
        Ok(self
            .records()?
            .requests
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, AppError> {
        Ok(self.records()?.requests.values().cloned().collect())
    }
}

#[async_trait]
impl EmployeeStore for MemoryRecordStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, AppError> {
        let wanted = email.trim();
        Ok(self
            .records()?
            .employees
            .values()
            .find(|e| e.email.eq_ignore_ascii_case(wanted))
            .cloned())
    }

    async fn get(&self, id: i64) -> Result<Option<Employee>, AppError> {
        Ok(self.records()?.employees.get(&id).cloned())
    }
}
