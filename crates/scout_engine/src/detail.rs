use scout_core::ExtractionStatus;
use scout_logging::scout_debug;

use crate::{ExtractedFields, Extractor, Fetcher, RetryPolicy};

/// Result of visiting one job detail page. Never an `Err`: failures are statuses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailOutcome {
    pub status: ExtractionStatus,
    pub fields: ExtractedFields,
    pub error: Option<String>,
}

/// Fetch a detail page under `retry` and extract its fields.
///
/// A non-success status is final and reported as `http_<code>`; transport
/// failures are retried and, once exhausted, reported as `error` tagged with
/// the failure kind.
pub async fn fetch_details(
    fetcher: &dyn Fetcher,
    extractor: &dyn Extractor,
    url: &str,
    retry: &RetryPolicy,
) -> DetailOutcome {
    match retry.fetch(fetcher, url).await {
        Ok(output) if output.is_success() => DetailOutcome {
            status: ExtractionStatus::Success,
            fields: extractor.extract(&output.body, url),
            error: None,
        },
        Ok(output) => DetailOutcome {
            status: ExtractionStatus::Http(output.status),
            fields: ExtractedFields::empty(url),
            error: Some(format!("HTTP {}", output.status)),
        },
        Err(err) => {
            scout_debug!("Giving up on {}: {}", url, err);
            DetailOutcome {
                status: ExtractionStatus::Error,
                fields: ExtractedFields::empty(url),
                error: Some(err.kind.to_string()),
            }
        }
    }
}
