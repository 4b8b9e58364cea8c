//! Remote game-data API client
//!
//! Provides a unified interface for reaching the upstream API:
//! - `HttpSource`: reqwest-backed client with a bounded per-call timeout
//! - `MockSource`: in-memory source with canned responses, for tests and dry runs
//!
//! Neither implementation retries; retry policy belongs to the pipeline.

use crate::config::RemoteConfig;
use crate::errors::{AppError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::Duration;

/// Path below the base URL, kept as raw segments until the request is built
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    segments: Vec<String>,
    trailing_slash: bool,
}

impl RemotePath {
    /// Parse a configured path such as `weapons/`
    pub fn parse(path: &str) -> Self {
        Self::from_template(path, &[])
    }

    /// Expand `{key}` placeholders segment by segment.
    ///
    /// Substituted values are kept whole, so a name containing `/` stays
    /// one segment and is percent-encoded when the URL is built.
    pub fn from_template(template: &str, vars: &[(&str, &str)]) -> Self {
        let trimmed = template.trim_start_matches('/');
        let trailing_slash = trimmed.ends_with('/');
        let segments = trimmed
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|segment| {
                vars.iter()
                    .fold(segment.to_string(), |acc, (key, value)| {
                        acc.replace(&format!("{{{}}}", key), value)
                    })
            })
            .collect();
        Self {
            segments,
            trailing_slash,
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve against a base URL, percent-encoding each segment
    pub fn to_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut parts = url.path_segments_mut().map_err(|_| {
                AppError::configuration(format!("base URL cannot carry a path: {}", base))
            })?;
            parts.pop_if_empty();
            parts.extend(self.segments.iter());
            if self.trailing_slash {
                parts.push("");
            }
        }
        Ok(url)
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))?;
        if self.trailing_slash {
            write!(f, "/")?;
        }
        Ok(())
    }
}

/// Trait for reaching the upstream API
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// GET a path below the base URL and decode the JSON body
    async fn get(&self, path: &RemotePath) -> Result<Value>;

    /// Human-readable location of the source
    fn describe(&self) -> String;
}

/// reqwest-backed remote source
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a new HTTP source; fails on an empty or relative base URL
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let raw = config.base_url.trim();
        if raw.is_empty() {
            return Err(AppError::configuration("remote.base_url is required"));
        }

        let base_url = Url::parse(raw).map_err(|e| {
            AppError::configuration(format!("remote.base_url `{}` is invalid: {}", raw, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::configuration(format!(
                "remote.base_url `{}` cannot be used as a base",
                raw
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    /// Full URL for a path
    pub fn url_for(&self, path: &RemotePath) -> Result<Url> {
        path.to_url(&self.base_url)
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn get(&self, path: &RemotePath) -> Result<Value> {
        let url = self.url_for(path)?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_decode() {
                AppError::InvalidPayload {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            } else {
                AppError::Transport {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Canned response served by `MockSource`
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(Value),
    Status(u16),
    TransportFailure,
    /// Fail on transport `failures` times, then serve the payload
    Flaky { failures: u32, then: Value },
}

/// In-memory remote source for testing
///
/// Paths are matched on their display form (`mods/`, `warframes/Excalibur`).
/// Unknown paths answer 404.
#[derive(Default)]
pub struct MockSource {
    responses: HashMap<String, MockResponse>,
    attempts: Mutex<HashMap<String, u32>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a JSON payload at `path`
    pub fn with_json(mut self, path: &str, payload: Value) -> Self {
        self.responses.insert(path.to_string(), MockResponse::Json(payload));
        self
    }

    /// Answer `path` with a non-success status
    pub fn with_status(mut self, path: &str, status: u16) -> Self {
        self.responses.insert(path.to_string(), MockResponse::Status(status));
        self
    }

    pub fn with_response(mut self, path: &str, response: MockResponse) -> Self {
        self.responses.insert(path.to_string(), response);
        self
    }

    /// Paths requested so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn transport_failure(path: &str) -> AppError {
        AppError::Transport {
            url: format!("mock://{}", path),
            message: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl RemoteSource for MockSource {
    async fn get(&self, path: &RemotePath) -> Result<Value> {
        let key = path.to_string();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        match self.responses.get(&key) {
            Some(MockResponse::Json(value)) => Ok(value.clone()),
            Some(MockResponse::Status(status)) => Err(AppError::HttpStatus {
                status: *status,
                url: format!("mock://{}", key),
            }),
            Some(MockResponse::TransportFailure) => Err(Self::transport_failure(&key)),
            Some(MockResponse::Flaky { failures, then }) => {
                let attempt = {
                    let mut attempts = self
                        .attempts
                        .lock()
                        .map_err(|_| AppError::Other(anyhow::anyhow!("mock state poisoned")))?;
                    let counter = attempts.entry(key.clone()).or_insert(0);
                    *counter += 1;
                    *counter
                };
                if attempt <= *failures {
                    Err(Self::transport_failure(&key))
                } else {
                    Ok(then.clone())
                }
            }
            None => Err(AppError::HttpStatus {
                status: 404,
                url: format!("mock://{}", key),
            }),
        }
    }

    fn describe(&self) -> String {
        "mock://".to_string()
    }
}
