use std::collections::HashSet;
use std::sync::Arc;

use scout_core::{Endpoint, PlatformProfile, Posting};
use scout_logging::{scout_debug, scout_info};
use tokio_util::sync::CancellationToken;

use crate::listing::parse_listing;
use crate::{EngineEvent, Fetcher, ProgressSink};

/// Consecutive pages without a new posting before a board counts as exhausted.
const EMPTY_PAGES_TO_STOP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestSettings {
    pub page_size: usize,
    /// Hard ceiling: offsets stop below `max_pages * page_size`.
    pub max_pages: usize,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            page_size: 20,
            max_pages: 50,
        }
    }
}

/// Walks the paginated listing of one endpoint.
pub struct Harvester {
    fetcher: Arc<dyn Fetcher>,
    profile: PlatformProfile,
    settings: HarvestSettings,
}

impl Harvester {
    pub fn new(fetcher: Arc<dyn Fetcher>, profile: PlatformProfile, settings: HarvestSettings) -> Self {
        Self {
            fetcher,
            profile,
            settings,
        }
    }

    /// Postings of every listing page until the board is exhausted.
    ///
    /// Stops after two consecutive pages with nothing new, on any fetch
    /// failure, non-success status or error-page redirect, at the page
    /// ceiling, or when `cancel` fires. Duplicates are filtered by URL only.
    pub async fn harvest(
        &self,
        endpoint: &Endpoint,
        sink: &dyn ProgressSink,
        cancel: &CancellationToken,
    ) -> Vec<Posting> {
        let root = &endpoint.root;
        let base_url = root.base_url();
        let page_size = self.settings.page_size.max(1);
        let ceiling = self.settings.max_pages.saturating_mul(page_size);

        let mut postings = Vec::new();
        let mut seen_urls = HashSet::new();
        let mut consecutive_empty = 0;
        let mut offset = 0;

        while offset < ceiling {
            if cancel.is_cancelled() {
                scout_info!("Harvest of {} cancelled at offset {}", base_url, offset);
                break;
            }

            let page_url = self.profile.listing_page_url(root, offset);
            let output = match self.fetcher.fetch(&page_url).await {
                Ok(output) => output,
                Err(err) => {
                    scout_debug!("Listing page {} failed: {}", page_url, err);
                    break;
                }
            };
            if !output.is_success() || output.landed_on_error_page() {
                scout_debug!(
                    "Listing page {} ended the harvest (HTTP {}, final url {})",
                    page_url,
                    output.status,
                    output.metadata.final_url
                );
                break;
            }

            let fresh: Vec<Posting> = parse_listing(&output.body, &page_url, root, &self.profile)
                .into_iter()
                .filter(|posting| seen_urls.insert(posting.url.clone()))
                .collect();
            sink.emit(EngineEvent::PageHarvested {
                base_url: base_url.clone(),
                offset,
                new_postings: fresh.len(),
            });

            if fresh.is_empty() {
                consecutive_empty += 1;
                if consecutive_empty >= EMPTY_PAGES_TO_STOP {
                    break;
                }
            } else {
                consecutive_empty = 0;
                postings.extend(fresh);
            }

            offset += page_size;
        }

        sink.emit(EngineEvent::EndpointHarvested {
            base_url,
            postings: postings.len(),
        });
        postings
    }
}
