use std::time::Duration;

use scout_logging::scout_debug;

use crate::{FailureKind, FetchError, FetchOutput, Fetcher};

/// How often and how patiently a transport failure is retried.
///
/// HTTP statuses are answers, not failures, and are never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    pub async fn fetch(&self, fetcher: &dyn Fetcher, url: &str) -> Result<FetchOutput, FetchError> {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match fetcher.fetch(url).await {
                Ok(output) => return Ok(output),
                Err(err) if err.kind == FailureKind::InvalidUrl || attempt >= attempts => {
                    return Err(err)
                }
                Err(err) => {
                    scout_debug!("Attempt {attempt}/{attempts} for {url} failed: {err}");
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}
