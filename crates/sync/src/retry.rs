//! Retry policy for remote calls
//!
//! Transport failures are retried with exponential backoff; every other
//! error is permanent on the first attempt.

use backoff::ExponentialBackoffBuilder;
use std::future::Future;
use std::time::Duration;
use tracing::warn;
use wfsync_common::config::SyncConfig;
use wfsync_common::Result;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Attempts after the first
    pub max_retries: u32,
    pub initial_interval: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &SyncConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_interval: Duration::from_millis(config.retry_initial_interval_ms),
        }
    }

    /// Single attempt
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            initial_interval: Duration::from_millis(1),
        }
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out
    pub async fn run<T, F, Fut>(&self, what: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let schedule = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_interval)
            .with_max_elapsed_time(None)
            .build();

        let max_retries = self.max_retries;
        let mut attempts = 0u32;

        backoff::future::retry(schedule, || {
            attempts += 1;
            let attempt = attempts;
            let call = op();
            async move {
                match call.await {
                    Ok(value) => Ok(value),
                    Err(err) if err.is_retryable() && attempt <= max_retries => {
                        warn!(target: "wfsync::retry", what, attempt, error = %err, "Retrying");
                        Err(backoff::Error::transient(err))
                    }
                    Err(err) => Err(backoff::Error::permanent(err)),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use wfsync_common::AppError;

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_interval: Duration::from_millis(1),
        }
    }

    fn transport() -> AppError {
        AppError::Transport {
            url: "mock://mods/".into(),
            message: "reset".into(),
        }
    }

    #[tokio::test]
    async fn test_transport_retried_until_success() {
        let calls = AtomicU32::new(0);
        let value = policy(2)
            .run("mods listing", || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(transport())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(value, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = policy(1)
            .run("detail", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transport()) }
            })
            .await;
        assert!(matches!(result, Err(AppError::Transport { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_status_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = policy(5)
            .run("detail", || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(AppError::HttpStatus {
                        status: 404,
                        url: "mock://mods/Gone".into(),
                    })
                }
            })
            .await;
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
