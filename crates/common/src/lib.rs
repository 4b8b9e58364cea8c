//! WFSync Common Library
//!
//! Shared code for the WFSync loader including:
//! - Configuration management
//! - Error types and handling
//! - Remote API client abstraction
//! - Raw and validated record types
//! - Database models, schema bootstrap and the persistence gateway
//! - Metrics

pub mod client;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod records;

// Re-export commonly used types
pub use client::{HttpSource, RemotePath, RemoteSource};
pub use config::AppConfig;
pub use db::{DbPool, Repository, StoredRow, UpsertOutcome};
pub use errors::{AppError, ErrorCode, Result};
pub use records::{EntityCategory, KnownKeys, RawRecord, RecordKind, ValidatedRecord};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
