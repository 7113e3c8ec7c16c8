//! Database repositories for the data access layer
//
// Store traits consumed by the services crate
pub mod traits;
//
// PostgreSQL repositories
pub mod employee;
pub mod leave_request;
//
// In-memory record store
pub mod memory;

pub use employee::EmployeeRepository;
pub use leave_request::LeaveRequestRepository;
pub use memory::MemoryRecordStore;
pub use traits::{EmployeeStore, LeaveRequestStore};

use leavedesk_core::AppError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

const CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Open a PostgreSQL connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
        .connect(database_url)
        .await?;

    tracing::info!(max_connections, "Database pool ready");
    Ok(pool)
}

/// Apply the bundled migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
    Ok(())
}
