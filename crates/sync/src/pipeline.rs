//! Pipeline orchestrator
//!
//! Drives one category through resolve → fetch → validate → persist.
//! Entity-level failures are recorded in the report and the run moves on;
//! only a category-level failure stops a category.

use crate::fetcher::DetailFetcher;
use crate::mapper::{self, derive_dependents, Dependent};
use crate::resolver::NameResolver;
use crate::retry::RetryPolicy;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use wfsync_common::config::AppConfig;
use wfsync_common::metrics;
use wfsync_common::records::{ParentKind, VocabularyFlag};
use wfsync_common::{
    AppError, EntityCategory, ErrorCode, KnownKeys, RawRecord, RecordKind, RemoteSource,
    Repository, Result, UpsertOutcome,
};

/// Where a category run currently is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "entity", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    ResolvingNames,
    FetchingDetail(String),
    Validating(String),
    Persisting(String),
    Done,
    Failed,
}

impl RunState {
    fn label(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::ResolvingNames => "resolving_names",
            RunState::FetchingDetail(_) => "fetching_detail",
            RunState::Validating(_) => "validating",
            RunState::Persisting(_) => "persisting",
            RunState::Done => "done",
            RunState::Failed => "failed",
        }
    }
}

/// One entity the run could not persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFailure {
    pub entity: String,
    pub code: ErrorCode,
    pub reason: String,
}

/// A vocabulary flag raised for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityFlag {
    pub entity: String,
    pub flag: VocabularyFlag,
}

/// Outcome of one category run
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub run_id: Uuid,
    pub category: String,
    pub state: RunState,
    /// Names returned by the resolver
    pub resolved: usize,
    /// Rows written, dependents included
    pub succeeded: usize,
    pub inserted: usize,
    pub updated: usize,
    pub failed: Vec<EntityFailure>,
    pub flags: Vec<EntityFlag>,
    /// Category-level error, when the run failed
    pub error: Option<EntityFailure>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CategoryReport {
    fn new(run_id: Uuid, category: impl Into<String>) -> Self {
        Self {
            run_id,
            category: category.into(),
            state: RunState::Idle,
            resolved: 0,
            succeeded: 0,
            inserted: 0,
            updated: 0,
            failed: Vec::new(),
            flags: Vec::new(),
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    fn enter(&mut self, state: RunState) {
        debug!(category = %self.category, from = self.state.label(), to = state.label(), "State change");
        self.state = state;
    }

    fn record_failure(&mut self, entity: &str, err: &AppError) {
        warn!(
            category = %self.category,
            entity,
            code = err.code().as_code(),
            error = %err,
            "Entity failed"
        );
        metrics::record_entity(&self.category, "failed");
        self.failed.push(EntityFailure {
            entity: entity.to_string(),
            code: err.code(),
            reason: err.to_string(),
        });
    }

    fn record_success(&mut self, outcome: UpsertOutcome) {
        metrics::record_entity(&self.category, "persisted");
        self.succeeded += 1;
        match outcome {
            UpsertOutcome::Inserted => self.inserted += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    fn record_flags(&mut self, entity: &str, flags: Vec<VocabularyFlag>) {
        for flag in flags {
            debug!(category = %self.category, entity, %flag, "Vocabulary flag");
            self.flags.push(EntityFlag {
                entity: entity.to_string(),
                flag,
            });
        }
    }

    fn finish(mut self, state: RunState) -> Self {
        self.enter(state);
        self.finished_at = Some(Utc::now());
        metrics::record_category_run(&self.category, self.state.label());
        self
    }

    fn abort(mut self, err: &AppError) -> Self {
        error!(category = %self.category, code = err.code().as_code(), error = %err, "Category failed");
        self.error = Some(EntityFailure {
            entity: self.category.clone(),
            code: err.code(),
            reason: err.to_string(),
        });
        self.finish(RunState::Failed)
    }
}

/// Reports of every category in one run
#[derive(Debug, Clone, Serialize)]
pub struct SyncSummary {
    pub run_id: Uuid,
    pub reports: Vec<CategoryReport>,
}

impl SyncSummary {
    pub fn succeeded(&self) -> usize {
        self.reports.iter().map(|r| r.succeeded).sum()
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().map(|r| r.failed.len()).sum()
    }

    /// Any category that did not reach `Done`
    pub fn has_failed_categories(&self) -> bool {
        self.reports.iter().any(|r| r.state == RunState::Failed)
    }
}

/// Sync pipeline over one remote source and one store
pub struct Pipeline {
    run_id: Uuid,
    resolver: NameResolver,
    fetcher: DetailFetcher,
    repository: Repository,
    known: KnownKeys,
    fetch_concurrency: usize,
}

impl Pipeline {
    pub fn new(config: &AppConfig, source: Arc<dyn RemoteSource>, repository: Repository) -> Self {
        let retry = RetryPolicy::from_config(&config.sync);
        Self {
            run_id: Uuid::new_v4(),
            resolver: NameResolver::new(source.clone(), &config.remote, retry),
            fetcher: DetailFetcher::new(source, &config.remote, retry),
            repository,
            known: KnownKeys::new(),
            fetch_concurrency: config.sync.fetch_concurrency.max(1),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Register parents persisted by earlier runs
    pub async fn seed_known_keys(&mut self) -> Result<()> {
        let persisted = self.repository.load_known_keys().await?;
        self.known.merge(persisted);
        Ok(())
    }

    /// Sync every category, parents first
    pub async fn run_all(&mut self) -> SyncSummary {
        let mut reports = Vec::with_capacity(EntityCategory::ALL.len());
        for category in EntityCategory::ALL {
            reports.push(self.run_category(category).await);
        }
        SyncSummary {
            run_id: self.run_id,
            reports,
        }
    }

    /// Sync the category named by a CLI label
    pub async fn run_label(&mut self, label: &str) -> CategoryReport {
        match EntityCategory::from_str(label) {
            Ok(category) => self.run_category(category).await,
            Err(err) => CategoryReport::new(self.run_id, label).abort(&err),
        }
    }

    #[instrument(skip(self), fields(run_id = %self.run_id))]
    pub async fn run_category(&mut self, category: EntityCategory) -> CategoryReport {
        let mut report = CategoryReport::new(self.run_id, category.as_str());
        info!(category = %category, "Category sync started");

        report.enter(RunState::ResolvingNames);
        let names = match self.resolver.resolve_names(category).await {
            Ok(names) => names,
            Err(err) => return report.abort(&err),
        };
        report.resolved = names.len();

        let Pipeline {
            fetcher,
            repository,
            known,
            fetch_concurrency,
            ..
        } = self;
        let fetcher = &*fetcher;

        // Fetches may run ahead; everything after stays in resolver order
        let mut details = stream::iter(names)
            .map(|name| async move {
                let fetched = fetcher.fetch_detail(category, &name).await;
                (name, fetched)
            })
            .buffered(*fetch_concurrency);

        while let Some((name, fetched)) = details.next().await {
            report.enter(RunState::FetchingDetail(name.clone()));
            let raw = match fetched {
                Ok(raw) => raw,
                Err(err) if !err.is_entity_level() => return report.abort(&err),
                Err(err) => {
                    report.record_failure(&name, &err);
                    continue;
                }
            };

            report.enter(RunState::Validating(name.clone()));
            let mapped = match mapper::map(category.record_kind(), &raw, known) {
                Ok(mapped) => mapped,
                Err(err) => {
                    report.record_failure(&name, &err);
                    continue;
                }
            };
            report.record_flags(&name, mapped.flags);

            report.enter(RunState::Persisting(name.clone()));
            match repository.upsert(&mapped.record).await {
                Ok(row) => {
                    known.insert(category.parent_kind(), row.natural_key.clone());
                    report.record_success(row.outcome);
                }
                Err(err) => {
                    report.record_failure(&name, &err);
                    continue;
                }
            }

            for dependent in derive_dependents(&mapped.record, &raw) {
                persist_dependent(repository, known, &mut report, dependent).await;
            }
        }

        let report = report.finish(RunState::Done);
        info!(
            category = %category,
            resolved = report.resolved,
            succeeded = report.succeeded,
            failed = report.failed.len(),
            "Category sync finished"
        );
        report
    }

    /// Validate and persist builds read from an import file
    #[instrument(skip(self, builds), fields(run_id = %self.run_id, count = builds.len()))]
    pub async fn import_builds(&mut self, builds: Vec<RawRecord>) -> CategoryReport {
        let mut report = CategoryReport::new(self.run_id, RecordKind::Build.table());
        report.resolved = builds.len();

        for (i, raw) in builds.into_iter().enumerate() {
            let identity = raw
                .get("name")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("build[{}]", i));

            let dependent = Dependent {
                identity,
                kind: RecordKind::Build,
                raw,
            };
            persist_dependent(&self.repository, &mut self.known, &mut report, dependent).await;
        }

        report.finish(RunState::Done)
    }
}

/// Validate → persist for a record derived from a parent or an import
async fn persist_dependent(
    repository: &Repository,
    known: &mut KnownKeys,
    report: &mut CategoryReport,
    dependent: Dependent,
) {
    let Dependent {
        identity,
        kind,
        raw,
    } = dependent;

    report.enter(RunState::Validating(identity.clone()));
    let mapped = match mapper::map(kind, &raw, known) {
        Ok(mapped) => mapped,
        Err(err) => return report.record_failure(&identity, &err),
    };
    report.record_flags(&identity, mapped.flags);

    report.enter(RunState::Persisting(identity.clone()));
    match repository.upsert(&mapped.record).await {
        Ok(row) => {
            if kind == RecordKind::Build {
                known.insert(ParentKind::Build, row.natural_key.clone());
            }
            report.record_success(row.outcome);
        }
        Err(err) => report.record_failure(&identity, &err),
    }
}
