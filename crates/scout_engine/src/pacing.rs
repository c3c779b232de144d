use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{FetchError, FetchOutput, Fetcher};

/// Which requests share a spacing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacingScope {
    /// Every request waits for the previous one, whatever the host.
    #[default]
    Global,
    /// Requests are spaced per host only.
    PerHost,
}

/// When the last request of one pacing key finished.
type Slot = Arc<Mutex<Option<Instant>>>;

/// One request in flight per pacing key, and a fixed quiet period after each
/// one completes.
///
/// Keys are independent: waiting on one host never holds up another.
#[derive(Debug)]
pub struct RequestPacer {
    min_spacing: Duration,
    scope: PacingScope,
    slots: Mutex<HashMap<String, Slot>>,
}

impl RequestPacer {
    pub fn new(min_spacing: Duration, scope: PacingScope) -> Self {
        Self {
            min_spacing,
            scope,
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Run `request` once the key of `url` has been quiet for the spacing.
    pub async fn paced<T>(&self, url: &str, request: impl Future<Output = T>) -> T {
        if self.min_spacing.is_zero() {
            return request.await;
        }
        let slot = self.slot(url).await;
        let mut last_done = slot.lock().await;
        if let Some(done) = *last_done {
            tokio::time::sleep_until(done + self.min_spacing).await;
        }
        let result = request.await;
        *last_done = Some(Instant::now());
        result
    }

    async fn slot(&self, url: &str) -> Slot {
        let key = match self.scope {
            PacingScope::Global => String::new(),
            PacingScope::PerHost => host_key(url),
        };
        self.slots.lock().await.entry(key).or_default().clone()
    }
}

fn host_key(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_default()
}

/// A fetcher whose requests go through a [`RequestPacer`].
pub struct PacedFetcher {
    inner: Arc<dyn Fetcher>,
    pacer: RequestPacer,
}

impl PacedFetcher {
    pub fn new(inner: Arc<dyn Fetcher>, min_spacing: Duration, scope: PacingScope) -> Self {
        Self {
            inner,
            pacer: RequestPacer::new(min_spacing, scope),
        }
    }
}

#[async_trait::async_trait]
impl Fetcher for PacedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.pacer.paced(url, self.inner.fetch(url)).await
    }
}
