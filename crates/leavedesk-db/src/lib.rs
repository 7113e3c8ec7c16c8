//! Leavedesk Database Library
//!
//! Record store access for leave requests and employees: the store traits the
//! attachment workflows depend on, PostgreSQL repositories, and an in-memory
//! implementation for tests and local runs.

pub mod db;

pub use db::{
    connect, run_migrations, EmployeeRepository, EmployeeStore, LeaveRequestRepository,
    LeaveRequestStore, MemoryRecordStore,
};
