use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use scout_core::{dedupe, dedupe_site_roots, partition, Endpoint, Partition, PlatformProfile, Posting};
use scout_logging::scout_info;
use tokio_util::sync::CancellationToken;

use crate::pacing::{PacedFetcher, PacingScope};
use crate::{EndpointProber, EngineEvent, Fetcher, HarvestSettings, Harvester, ProgressSink};

#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub profile: PlatformProfile,
    pub harvest: HarvestSettings,
    /// Spacing between probe requests.
    pub probe_spacing: Duration,
    /// Spacing between listing page requests.
    pub request_spacing: Duration,
    pub pacing_scope: PacingScope,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            profile: PlatformProfile::default(),
            harvest: HarvestSettings::default(),
            probe_spacing: Duration::from_millis(100),
            request_spacing: Duration::from_millis(300),
            pacing_scope: PacingScope::Global,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub seed_urls: usize,
    pub site_roots: usize,
    /// Live endpoints only, in probe order.
    pub endpoints: Vec<Endpoint>,
    pub raw_postings: usize,
    pub unique_postings: usize,
    pub partition: Partition,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl DiscoveryReport {
    pub fn new_postings(&self) -> &[Posting] {
        &self.partition.new
    }
}

impl fmt::Display for DiscoveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(70);
        writeln!(f, "{rule}")?;
        writeln!(f, "DISCOVERY {}", if self.cancelled { "INTERRUPTED" } else { "COMPLETE" })?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Time elapsed:           {:.1} minutes", self.elapsed.as_secs_f64() / 60.0)?;
        writeln!(f, "Seed URLs processed:    {}", self.seed_urls)?;
        writeln!(f, "Site paths found:       {}", self.site_roots)?;
        writeln!(f, "Live endpoints:         {}", self.endpoints.len())?;
        writeln!(f, "Raw jobs harvested:     {}", self.raw_postings)?;
        writeln!(f, "Clean unique jobs:      {}", self.unique_postings)?;
        writeln!(f, "Already in seed:        {}", self.partition.existing.len())?;
        writeln!(f, "NEW DISCOVERIES:        {}", self.partition.new.len())?;
        write!(f, "{rule}")
    }
}

/// Seed URLs in, newly discovered postings out.
///
/// Canonicalize seeds into site roots, probe each root, harvest the live
/// ones, drop false positives and duplicates, and split off what the seed
/// already knew. Per-root failures only shrink the result.
pub async fn discover<S: AsRef<str>>(
    fetcher: Arc<dyn Fetcher>,
    seed_urls: &[S],
    settings: &DiscoverySettings,
    sink: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> DiscoveryReport {
    let started = Instant::now();
    let profile = &settings.profile;

    let roots = dedupe_site_roots(
        seed_urls
            .iter()
            .filter_map(|url| profile.derive_site_root(url.as_ref())),
    );
    scout_info!(
        "Extracted {} unique domain/path combinations from {} seed URLs",
        roots.len(),
        seed_urls.len()
    );

    let prober = EndpointProber::new(
        Arc::new(PacedFetcher::new(
            fetcher.clone(),
            settings.probe_spacing,
            settings.pacing_scope,
        )),
        profile.clone(),
    );
    let mut endpoints = Vec::new();
    for root in &roots {
        if cancel.is_cancelled() {
            break;
        }
        let endpoint = prober.probe(root).await;
        sink.emit(EngineEvent::EndpointProbed {
            base_url: root.base_url(),
            live: endpoint.is_live,
            estimated_jobs: endpoint.estimated_job_count,
        });
        if endpoint.is_live {
            endpoints.push(endpoint);
        }
    }
    scout_info!("Found {} live endpoints with job listings", endpoints.len());

    let harvester = Harvester::new(
        Arc::new(PacedFetcher::new(
            fetcher,
            settings.request_spacing,
            settings.pacing_scope,
        )),
        profile.clone(),
        settings.harvest,
    );
    let mut raw = Vec::new();
    for endpoint in &endpoints {
        if cancel.is_cancelled() {
            break;
        }
        raw.extend(harvester.harvest(endpoint, sink, cancel).await);
    }
    let raw_postings = raw.len();
    scout_info!("Harvested {} total job listings", raw_postings);

    let unique = dedupe(raw, profile);
    let unique_postings = unique.len();
    scout_info!("After filtering and deduplication: {} unique jobs", unique_postings);

    let partition = partition(unique, seed_urls, profile);
    scout_info!(
        "Already in seed: {}, new discoveries: {}",
        partition.existing.len(),
        partition.new.len()
    );

    DiscoveryReport {
        seed_urls: seed_urls.len(),
        site_roots: roots.len(),
        endpoints,
        raw_postings,
        unique_postings,
        partition,
        elapsed: started.elapsed(),
        cancelled: cancel.is_cancelled(),
    }
}
