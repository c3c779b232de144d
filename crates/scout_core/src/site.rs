use std::collections::BTreeSet;

use url::Url;

use crate::PlatformProfile;

/// Canonical base of one job board: a platform host plus its board path.
///
/// Path segments keep their original case; only classification is
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SiteRoot {
    domain: String,
    path: Vec<String>,
}

impl SiteRoot {
    pub(crate) fn derive(url: &str, profile: &PlatformProfile) -> Option<Self> {
        let parsed = Url::parse(url.trim()).ok()?;
        let host = parsed.host_str()?;
        if !profile.owns_host(host) {
            return None;
        }

        let path: Vec<String> = parsed
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .take_while(|segment| !profile.is_terminal_segment(segment))
            .map(ToOwned::to_owned)
            .collect();
        if path.is_empty() {
            return None;
        }

        Some(Self {
            domain: host.to_ascii_lowercase(),
            path,
        })
    }

    /// Build a root from already-canonical parts, e.g. when reading an endpoint table.
    pub fn from_parts(domain: &str, site_path: &str) -> Option<Self> {
        let path: Vec<String> = site_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if domain.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self {
            domain: domain.to_ascii_lowercase(),
            path,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn segments(&self) -> &[String] {
        &self.path
    }

    /// Board path joined with `/`, without leading or trailing slash.
    pub fn site_path(&self) -> String {
        self.path.join("/")
    }

    /// `https://{domain}/{site_path}`.
    pub fn base_url(&self) -> String {
        format!("https://{}/{}", self.domain, self.site_path())
    }
}

/// Collapse roots sharing (domain, path); result is sorted.
pub fn dedupe_site_roots(roots: impl IntoIterator<Item = SiteRoot>) -> Vec<SiteRoot> {
    roots
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
