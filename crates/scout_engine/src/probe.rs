use std::sync::Arc;

use scout_core::{Endpoint, PlatformProfile, SiteRoot};
use scout_logging::scout_debug;

use crate::listing::posting_links;
use crate::Fetcher;

/// Decides whether a site root hosts a live job search surface.
pub struct EndpointProber {
    fetcher: Arc<dyn Fetcher>,
    profile: PlatformProfile,
}

impl EndpointProber {
    /// Pass a paced fetcher; the prober issues one request per root and does no waiting itself.
    pub fn new(fetcher: Arc<dyn Fetcher>, profile: PlatformProfile) -> Self {
        Self { fetcher, profile }
    }

    /// One fetch of the listing surface. Live iff it answered with success,
    /// did not land on an error page and links to at least one posting.
    /// Every failure means "not live"; nothing is raised.
    pub async fn probe(&self, root: &SiteRoot) -> Endpoint {
        let search_url = self.profile.search_url(root);
        let output = match self.fetcher.fetch(&search_url).await {
            Ok(output) => output,
            Err(err) => {
                scout_debug!("Probe of {} failed: {}", search_url, err);
                return Endpoint::dead(root.clone());
            }
        };

        if !output.is_success() {
            scout_debug!("Probe of {} returned HTTP {}", search_url, output.status);
            return Endpoint::dead(root.clone());
        }
        if output.landed_on_error_page() {
            scout_debug!(
                "Probe of {} redirected to error page {}",
                search_url,
                output.metadata.final_url
            );
            return Endpoint::dead(root.clone());
        }

        let estimated_job_count =
            posting_links(&output.body, &output.metadata.final_url, &self.profile).len();
        Endpoint {
            root: root.clone(),
            is_live: estimated_job_count > 0,
            estimated_job_count,
        }
    }
}
