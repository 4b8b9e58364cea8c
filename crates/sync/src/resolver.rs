//! Name resolver
//!
//! Turns an entity category into the ordered, distinct names to fetch.
//! Upstream labels are listed through one of three endpoints.

use crate::retry::RetryPolicy;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};
use wfsync_common::config::RemoteConfig;
use wfsync_common::metrics::FetchTimer;
use wfsync_common::{AppError, EntityCategory, RemotePath, RemoteSource, Result};

/// Labels listed through the weapons endpoint
const WEAPON_LABELS: &[&str] = &["Primary", "Secondary", "Melee", "Arch-Gun", "Arch-Melee"];

/// Labels listed through the mods endpoint, unfiltered
const MOD_LABEL: &str = "Mods";

/// Which listing endpoint serves an upstream label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStrategy {
    Weapons,
    Mods,
    Items,
}

impl ListingStrategy {
    pub fn classify(label: &str) -> Self {
        if WEAPON_LABELS.contains(&label) {
            ListingStrategy::Weapons
        } else if label == MOD_LABEL {
            ListingStrategy::Mods
        } else {
            ListingStrategy::Items
        }
    }

    /// Whether listed items must carry `category == label`
    pub fn filters_by_label(&self) -> bool {
        !matches!(self, ListingStrategy::Mods)
    }
}

pub struct NameResolver {
    source: Arc<dyn RemoteSource>,
    retry: RetryPolicy,
    weapons_path: RemotePath,
    mods_path: RemotePath,
    items_path: RemotePath,
}

impl NameResolver {
    pub fn new(source: Arc<dyn RemoteSource>, config: &RemoteConfig, retry: RetryPolicy) -> Self {
        Self {
            source,
            retry,
            weapons_path: RemotePath::parse(&config.weapons_path),
            mods_path: RemotePath::parse(&config.mods_path),
            items_path: RemotePath::parse(&config.items_path),
        }
    }

    fn listing_path(&self, strategy: ListingStrategy) -> &RemotePath {
        match strategy {
            ListingStrategy::Weapons => &self.weapons_path,
            ListingStrategy::Mods => &self.mods_path,
            ListingStrategy::Items => &self.items_path,
        }
    }

    /// Names listed under one upstream label, first-seen order, no duplicates
    #[instrument(skip(self))]
    pub async fn resolve_label(&self, label: &str) -> Result<Vec<String>> {
        let strategy = ListingStrategy::classify(label);
        let path = self.listing_path(strategy);

        let payload = self
            .retry
            .run("listing", || async {
                let timer = FetchTimer::start("listing");
                let result = self.source.get(path).await;
                timer.finish(result.is_ok());
                result
            })
            .await?;

        let Value::Array(items) = payload else {
            return Err(AppError::InvalidPayload {
                url: path.to_string(),
                message: "listing is not a JSON array".to_string(),
            });
        };

        let mut seen = HashSet::new();
        let names: Vec<String> = items
            .iter()
            .filter(|item| {
                !strategy.filters_by_label()
                    || item.get("category").and_then(Value::as_str) == Some(label)
            })
            .filter_map(|item| item.get("name").and_then(Value::as_str))
            .filter(|name| seen.insert(name.to_string()))
            .map(str::to_string)
            .collect();

        debug!(label, ?strategy, count = names.len(), "Listing resolved");
        Ok(names)
    }

    /// Names of every label of `category`, deduplicated across labels
    pub async fn resolve_names(&self, category: EntityCategory) -> Result<Vec<String>> {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for label in category.labels() {
            for name in self.resolve_label(label).await? {
                if seen.insert(name.clone()) {
                    names.push(name);
                }
            }
        }
        Ok(names)
    }
}
