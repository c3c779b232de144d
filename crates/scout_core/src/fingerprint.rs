use url::Url;

use crate::PlatformProfile;

/// Identity of a posting across differently shaped URLs.
///
/// Two fingerprints with equal non-null `id` and equal `domain` name the same
/// real-world job.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint {
    pub id: Option<String>,
    pub domain: String,
}

impl Fingerprint {
    pub(crate) fn of(url: &str, profile: &PlatformProfile) -> Self {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return Self {
                id: None,
                domain: String::new(),
            };
        };
        let domain = parsed.host_str().unwrap_or_default().to_ascii_lowercase();

        // Query identifiers win over path ids: some templates reuse
        // detail-like paths for pages that are not postings.
        let id = id_from_query(&parsed, profile).or_else(|| id_from_path(&parsed, profile));
        Self { id, domain }
    }

    /// The identified part, if any.
    pub fn key(&self) -> Option<(&str, &str)> {
        self.id.as_deref().map(|id| (id, self.domain.as_str()))
    }
}

fn id_from_query(url: &Url, profile: &PlatformProfile) -> Option<String> {
    profile.id_params.iter().find_map(|param| {
        url.query_pairs()
            .find(|(key, value)| key == param.as_str() && !value.is_empty())
            .map(|(_, value)| value.into_owned())
    })
}

/// `/{marker}/{id}` or `/{marker}/{slug}/{id}`; the slug form is tried first.
fn id_from_path(url: &Url, profile: &PlatformProfile) -> Option<String> {
    let segments: Vec<&str> = url.path_segments()?.collect();
    segments.iter().enumerate().find_map(|(idx, segment)| {
        if !segment.eq_ignore_ascii_case(&profile.detail_marker) {
            return None;
        }
        let after_slug = segments
            .get(idx + 1)
            .filter(|slug| !slug.is_empty())
            .and_then(|_| segments.get(idx + 2))
            .and_then(|candidate| leading_digits(candidate));
        after_slug.or_else(|| segments.get(idx + 1).and_then(|s| leading_digits(s)))
    })
}

fn leading_digits(segment: &str) -> Option<String> {
    let digits: String = segment.chars().take_while(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

/// Lower-cased, trimmed, whitespace-collapsed title used as a dedup key.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Scheme-stripped, lower-cased, trailing-slash-stripped form of a URL.
pub fn normalize_url_for_seed(url: &str) -> String {
    let lower = url.trim().to_lowercase();
    let without_scheme = lower
        .strip_prefix("https://")
        .or_else(|| lower.strip_prefix("http://"))
        .unwrap_or(&lower);
    without_scheme.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::{leading_digits, normalize_title, normalize_url_for_seed};

    #[test]
    fn title_normalization_collapses_and_lowercases() {
        assert_eq!(normalize_title("  Senior\t Backend\nEngineer "), "senior backend engineer");
    }

    #[test]
    fn seed_url_normalization() {
        assert_eq!(
            normalize_url_for_seed(" HTTPS://X.avature.net/x/JobDetail/55/ "),
            "x.avature.net/x/jobdetail/55"
        );
        assert_eq!(normalize_url_for_seed("ftp://a/b"), "ftp://a/b");
    }

    #[test]
    fn leading_digits_stops_at_first_non_digit() {
        assert_eq!(leading_digits("123abc").as_deref(), Some("123"));
        assert_eq!(leading_digits("abc"), None);
        assert_eq!(leading_digits(""), None);
    }
}
