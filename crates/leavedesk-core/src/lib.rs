//! Leavedesk Core Library
//!
//! This crate provides the domain models, error types, configuration, and the
//! attachment matching logic (name normalization, similarity scoring, and the
//! file resolution cascade) shared by every Leavedesk component.

pub mod config;
pub mod constants;
pub mod error;
pub mod matching;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{AgentConfig, AttachmentConfig, Config, EmailConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use matching::{normalize, resolve, similarity, MatchTier, MatchingConfig, Resolution};
pub use storage_types::StorageBackend;
