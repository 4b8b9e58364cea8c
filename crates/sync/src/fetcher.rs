//! Detail fetcher: one remote call per resolved name

use crate::retry::RetryPolicy;
use serde_json::Value;
use std::sync::Arc;
use wfsync_common::config::RemoteConfig;
use wfsync_common::metrics::FetchTimer;
use wfsync_common::{AppError, EntityCategory, RawRecord, RemotePath, RemoteSource, Result};

pub struct DetailFetcher {
    source: Arc<dyn RemoteSource>,
    retry: RetryPolicy,
    template: String,
}

impl DetailFetcher {
    pub fn new(source: Arc<dyn RemoteSource>, config: &RemoteConfig, retry: RetryPolicy) -> Self {
        Self {
            source,
            retry,
            template: config.detail_path.clone(),
        }
    }

    pub fn path_for(&self, category: EntityCategory, name: &str) -> RemotePath {
        RemotePath::from_template(
            &self.template,
            &[("category", category.path_segment()), ("name", name)],
        )
    }

    /// Full upstream record for `name`
    pub async fn fetch_detail(&self, category: EntityCategory, name: &str) -> Result<RawRecord> {
        let path = self.path_for(category, name);

        let payload = self
            .retry
            .run("detail", || async {
                let timer = FetchTimer::start("detail");
                let result = self.source.get(&path).await;
                timer.finish(result.is_ok());
                result
            })
            .await?;

        select_record(payload, name).ok_or_else(|| AppError::InvalidPayload {
            url: path.to_string(),
            message: "detail payload holds no JSON object".to_string(),
        })
    }
}

/// An object is the record; from an array take the matching `name`, else the first object
fn select_record(payload: Value, name: &str) -> Option<RawRecord> {
    match payload {
        Value::Object(fields) => Some(RawRecord::new(fields)),
        Value::Array(items) => {
            let position = items
                .iter()
                .position(|item| item.get("name").and_then(Value::as_str) == Some(name))
                .or_else(|| items.iter().position(Value::is_object))?;
            items.into_iter().nth(position).and_then(RawRecord::from_value)
        }
        _ => None,
    }
}
