use async_trait::async_trait;
use leavedesk_core::models::Employee;
use leavedesk_core::AppError;
use sqlx::{PgPool, Postgres};

use super::traits::EmployeeStore;

/// Repository for the employees table (read-only)
#[derive(Clone)]
pub struct EmployeeRepository {
    pool: PgPool,
}

impl EmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeStore for EmployeeRepository {
    #[tracing::instrument(skip(self), fields(db.table = "employees", db.operation = "select"))]
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<Postgres, Employee>(
            "SELECT id, external_id, name, email, department, position FROM employees WHERE lower(email) = lower($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    #[tracing::instrument(skip(self), fields(db.table = "employees", db.operation = "select", db.record_id = id))]
    async fn get(&self, id: i64) -> Result<Option<Employee>, AppError> {
        let employee = sqlx::query_as::<Postgres, Employee>(
            "SELECT id, external_id, name, email, department, position FROM employees WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }
}
