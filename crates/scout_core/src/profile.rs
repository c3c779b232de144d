use crate::{Fingerprint, SiteRoot};

const ACTION_KEYWORDS: &[&str] = &[
    "jobdetail",
    "searchjobs",
    "applicationmethods",
    "apply",
    "job",
    "position",
    "requisition",
];

const EXCLUDED_PATHS: &[&str] = &[
    "error",
    "resetpassword",
    "login",
    "register",
    "applicationmethods",
    "recommendationmethods",
    "profile",
    "account",
    "settings",
    "infographics",
    "images",
    "assets",
    "static",
    "css",
    "js",
    "fonts",
    "api",
    "webhook",
];

/// Platform-specific constants for one hosted career-site platform.
///
/// Everything that names a URL shape lives here so canonicalization,
/// probing and harvesting stay platform agnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Hosts must equal this or end with `.{domain_suffix}`.
    pub domain_suffix: String,
    /// Path segment that precedes a posting id on detail pages.
    pub detail_marker: String,
    /// Path segment of the listing/search surface under a site root.
    pub search_segment: String,
    /// Query parameter carrying the listing offset.
    pub offset_param: String,
    /// Identifier query parameters, most reliable first. Matched case-sensitively.
    pub id_params: Vec<String>,
    /// Lower-cased segments that end a site path (detail, search, apply markers).
    pub action_keywords: Vec<String>,
    /// Lower-cased segments that never belong to a job board path.
    pub excluded_paths: Vec<String>,
}

impl PlatformProfile {
    /// Profile for Avature-hosted career sites.
    pub fn avature() -> Self {
        Self {
            domain_suffix: "avature.net".to_string(),
            detail_marker: "JobDetail".to_string(),
            search_segment: "SearchJobs".to_string(),
            offset_param: "jobOffset".to_string(),
            id_params: vec!["jobId".to_string(), "id".to_string(), "jobid".to_string()],
            action_keywords: ACTION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            excluded_paths: EXCLUDED_PATHS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether `host` belongs to the platform.
    pub fn owns_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let suffix = self.domain_suffix.to_ascii_lowercase();
        host == suffix
            || host
                .strip_suffix(suffix.as_str())
                .is_some_and(|prefix| prefix.ends_with('.'))
    }

    /// Whether a lower-cased path segment terminates a site path.
    pub(crate) fn is_terminal_segment(&self, segment: &str) -> bool {
        let lower = segment.to_ascii_lowercase();
        (!segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
            || segment.contains('=')
            || self.action_keywords.iter().any(|k| *k == lower)
            || self.excluded_paths.iter().any(|k| *k == lower)
    }

    /// Derive the canonical site root of `url`, if it is a platform URL with a board path.
    pub fn derive_site_root(&self, url: &str) -> Option<SiteRoot> {
        SiteRoot::derive(url, self)
    }

    /// Identity of the posting behind `url`.
    pub fn fingerprint(&self, url: &str) -> Fingerprint {
        Fingerprint::of(url, self)
    }

    /// The listing surface of a site root, used for probing.
    pub fn search_url(&self, root: &SiteRoot) -> String {
        format!("{}/{}/", root.base_url(), self.search_segment)
    }

    /// One listing page of a site root.
    pub fn listing_page_url(&self, root: &SiteRoot, offset: usize) -> String {
        format!(
            "{}/{}/?{}={}",
            root.base_url(),
            self.search_segment,
            self.offset_param,
            offset
        )
    }
}

impl Default for PlatformProfile {
    fn default() -> Self {
        Self::avature()
    }
}
