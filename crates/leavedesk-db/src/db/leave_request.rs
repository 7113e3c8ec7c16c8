use async_trait::async_trait;
use leavedesk_core::models::{LeaveRequest, LeaveRequestUpdate};
use leavedesk_core::AppError;
use sqlx::{PgPool, Postgres};

use super::traits::LeaveRequestStore;

const LEAVE_REQUEST_COLUMNS: &str = "id AS request_id, employee_id, leave_type, start_date, \
     end_date, days_requested, approved_days, status, reason, ref_pdf";

/// Repository for the leave_requests table
#[derive(Clone)]
pub struct LeaveRequestRepository {
    pool: PgPool,
}

impl LeaveRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaveRequestStore for LeaveRequestRepository {
    #[tracing::instrument(skip(self), fields(db.table = "leave_requests", db.operation = "update", db.record_id = request_id))]
    async fn update_by_id(
        &self,
        request_id: i64,
        update: &LeaveRequestUpdate,
    ) -> Result<Vec<LeaveRequest>, AppError> {
        let sql = format!(
            r#"
            UPDATE leave_requests
            SET ref_pdf = COALESCE($2, ref_pdf),
                status = COALESCE($3, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            LEAVE_REQUEST_COLUMNS
        );

        let rows = sqlx::query_as::<Postgres, LeaveRequest>(&sql)
            .bind(request_id)
            .bind(update.ref_pdf.as_deref())
            .bind(update.status.as_deref())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "leave_requests", db.operation = "select", db.record_id = request_id))]
    async fn get(&self, request_id: i64) -> Result<Option<LeaveRequest>, AppError> {
        let sql = format!(
            "SELECT {} FROM leave_requests WHERE id = $1",
            LEAVE_REQUEST_COLUMNS
        );
        let row = sqlx::query_as::<Postgres, LeaveRequest>(&sql)
            .bind(request_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "leave_requests", db.operation = "select"))]
    async fn list_for_employee(&self, employee_id: i64) -> Result<Vec<LeaveRequest>, AppError> {
        let sql = format!(
            "SELECT {} FROM leave_requests WHERE employee_id = $1 ORDER BY id ASC",
            LEAVE_REQUEST_COLUMNS
        );
        let rows = sqlx::query_as::<Postgres, LeaveRequest>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    #[tracing::instrument(skip(self), fields(db.table = "leave_requests", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<LeaveRequest>, AppError> {
        let sql = format!(
            "SELECT {} FROM leave_requests ORDER BY id ASC",
            LEAVE_REQUEST_COLUMNS
        );
        let rows = sqlx::query_as::<Postgres, LeaveRequest>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
