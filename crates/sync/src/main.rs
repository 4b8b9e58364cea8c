//! WFSync Loader
//!
//! Mirrors upstream game data into the relational store:
//! 1. Resolves the names of each category
//! 2. Fetches every entity's detail record
//! 3. Validates and maps it onto the schema
//! 4. Upserts it, then its dependent records

mod cli;
mod errors;
mod fetcher;
mod mapper;
mod pipeline;
mod resolver;
mod retry;

use crate::cli::{Cli, Commands};
use crate::errors::CliError;
use crate::pipeline::{Pipeline, RunState, SyncSummary};
use crate::resolver::NameResolver;
use crate::retry::RetryPolicy;
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use wfsync_common::config::ObservabilityConfig;
use wfsync_common::db::ensure_schema;
use wfsync_common::{
    metrics, AppConfig, DbPool, EntityCategory, HttpSource, RawRecord, RemoteSource, Repository,
    VERSION,
};

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Builds from an import file: a JSON array, or an object with a `builds` array
fn load_builds(path: &Path) -> Result<Vec<RawRecord>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::BuildFile {
        path: path.display().to_string(),
        source,
    })?;
    let invalid = |message: String| CliError::InvalidBuildFile {
        path: path.display().to_string(),
        message,
    };

    let payload: Value = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(mut object) => match object.remove("builds") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(invalid("expected a `builds` array".to_string())),
        },
        _ => return Err(invalid("expected a JSON array of builds".to_string())),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            RawRecord::from_value(entry).ok_or_else(|| invalid(format!("build[{}] is not an object", i)))
        })
        .collect()
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let command = Cli::parse().into_command();

    // Configuration comes first so the log level can follow it
    let config = match AppConfig::load() {
        Ok(config) => {
            init_tracing(&config.observability);
            config
        }
        Err(e) => {
            init_tracing(&ObservabilityConfig::default());
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    info!(service = %config.observability.service_name, "Starting WFSync v{}", VERSION);
    metrics::register_metrics();

    let source: Arc<dyn RemoteSource> = Arc::new(HttpSource::new(&config.remote)?);
    info!(source = %source.describe(), "Remote source configured");

    if let Commands::Names { category } = &command {
        let category = EntityCategory::from_str(category)?;
        let resolver = NameResolver::new(
            source,
            &config.remote,
            RetryPolicy::from_config(&config.sync),
        );
        let names = resolver.resolve_names(category).await?;
        return print_json(&names);
    }

    let db = DbPool::new(&config.database).await?;
    if config.database.auto_migrate || command == Commands::Schema {
        ensure_schema(db.conn()).await?;
        info!("Schema ready");
    }
    if command == Commands::Schema {
        return Ok(());
    }

    let mut pipeline = Pipeline::new(&config, source, Repository::new(db));
    pipeline.seed_known_keys().await?;

    let summary = match command {
        Commands::ImportBuilds { file } => {
            let builds = load_builds(&file)?;
            SyncSummary {
                run_id: pipeline.run_id(),
                reports: vec![pipeline.import_builds(builds).await],
            }
        }
        Commands::Sync { categories } if categories.is_empty() => pipeline.run_all().await,
        Commands::Sync { categories } => {
            let mut reports = Vec::with_capacity(categories.len());
            for label in &categories {
                reports.push(pipeline.run_label(label).await);
            }
            SyncSummary {
                run_id: pipeline.run_id(),
                reports,
            }
        }
        Commands::Names { .. } | Commands::Schema => return Ok(()),
    };

    print_json(&summary)?;
    info!(
        run_id = %summary.run_id,
        succeeded = summary.succeeded(),
        failed = summary.failed(),
        "Run finished"
    );

    if summary.has_failed_categories() {
        let failed: Vec<&str> = summary
            .reports
            .iter()
            .filter(|r| r.state == RunState::Failed)
            .map(|r| r.category.as_str())
            .collect();
        warn!(categories = ?failed, "Categories failed");
        anyhow::bail!("{} categories failed: {}", failed.len(), failed.join(", "));
    }
    Ok(())
}
