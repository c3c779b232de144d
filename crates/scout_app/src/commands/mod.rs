pub mod discover;
pub mod extract;

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use scout_core::parse_seed_tokens;
use scout_engine::{EngineEvent, FetchSettings, ProgressSink, ReqwestFetcher};
use scout_logging::{scout_debug, scout_info, scout_warn};
use tokio_util::sync::CancellationToken;

/// Progress sink for the terminal: one log line per event.
pub struct LogSink;

impl ProgressSink for LogSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::EndpointProbed {
                base_url,
                live,
                estimated_jobs,
            } => {
                if live {
                    scout_info!("LIVE {} (~{} jobs)", base_url, estimated_jobs);
                } else {
                    scout_debug!("dead {}", base_url);
                }
            }
            EngineEvent::PageHarvested {
                base_url,
                offset,
                new_postings,
            } => scout_debug!("{} offset {}: {} new", base_url, offset, new_postings),
            EngineEvent::EndpointHarvested { base_url, postings } => {
                scout_info!("Harvested {} jobs from {}", postings, base_url)
            }
            EngineEvent::JobExtracted {
                index,
                total,
                title,
                status,
                description_chars,
                error,
                ..
            } => match error {
                Some(error) => scout_warn!("[{}/{}] {} -> {} ({})", index, total, title, status, error),
                None => scout_info!(
                    "[{}/{}] {} -> {}, {} description chars",
                    index,
                    total,
                    title,
                    status,
                    description_chars
                ),
            },
            EngineEvent::LedgerSaved { records } => scout_info!("Progress saved: {} records", records),
        }
    }
}

/// A token cancelled by the first Ctrl-C.
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            scout_warn!("Interrupt received; finishing the current request");
            trigger.cancel();
        }
    });
    cancel
}

pub fn build_fetcher(timeout_secs: u64) -> Result<ReqwestFetcher> {
    let settings = FetchSettings {
        request_timeout: Duration::from_secs(timeout_secs.max(1)),
        ..FetchSettings::default()
    };
    ReqwestFetcher::new(settings).context("failed to build HTTP client")
}

/// Seed URLs from a free-form text file. A missing file or one without any
/// URL is an error.
pub fn load_seed_urls(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seeds = parse_seed_tokens(&raw);
    if seeds.is_empty() {
        bail!("seed file {} contains no URLs", path.display());
    }
    Ok(seeds)
}
