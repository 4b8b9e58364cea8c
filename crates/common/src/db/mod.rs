//! Database layer for WFSync
//!
//! Provides:
//! - SeaORM entity models
//! - Schema bootstrap
//! - Persistence gateway (`Repository`)
//! - Connection pool management

pub mod models;
mod repository;
mod schema;

pub use repository::{Repository, StoredRow, UpsertOutcome};
pub use schema::ensure_schema;

use crate::config::DatabaseConfig;
use crate::errors::{AppError, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
}

impl DbPool {
    /// Create a new database pool from configuration
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        info!(url = %config.redacted_url(), "Connecting to database...");

        let mut opts = ConnectOptions::new(config.url());
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .sqlx_logging(false);

        let conn = Database::connect(opts).await.map_err(|e| {
            AppError::configuration(format!(
                "failed to connect to {}: {}",
                config.redacted_url(),
                e
            ))
        })?;

        info!("Database connection established");

        Ok(Self { conn })
    }

    /// Connect to an explicit URL with a single pooled connection
    ///
    /// Used for `sqlite::memory:` where every connection is its own database.
    pub async fn connect_url(url: &str) -> Result<Self> {
        let mut opts = ConnectOptions::new(url.to_owned());
        opts.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let conn = Database::connect(opts).await?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }
}
