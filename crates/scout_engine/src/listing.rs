use std::collections::HashSet;

use scout_core::{PlatformProfile, Posting, SiteRoot};
use scraper::{Html, Selector};
use url::Url;

use crate::text::collapse_whitespace;

const MIN_TITLE_CHARS: usize = 3;
const SLUG_MIN_CHARS: usize = 10;

/// An anchor on a listing page that points at a posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingLink {
    pub url: String,
    /// Visible anchor text, whitespace-collapsed; may be empty.
    pub text: String,
}

/// Posting anchors on a page, resolved against `page_url`, first occurrence per URL.
pub fn posting_links(html: &str, page_url: &str, profile: &PlatformProfile) -> Vec<ListingLink> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let base = Url::parse(page_url).ok();
    let marker = profile.detail_marker.to_ascii_lowercase();

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&anchor) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_url(href, base.as_ref()) else {
            continue;
        };
        let is_posting = href.to_ascii_lowercase().contains(&marker) || has_listing_id(&url, profile);
        if !is_posting {
            continue;
        }
        let url = String::from(url);
        if !seen.insert(url.clone()) {
            continue;
        }
        let text = collapse_whitespace(&element.text().collect::<String>());
        links.push(ListingLink { url, text });
    }
    links
}

/// Postings on one listing page of `root`, with titles cleaned or recovered.
pub fn parse_listing(
    html: &str,
    page_url: &str,
    root: &SiteRoot,
    profile: &PlatformProfile,
) -> Vec<Posting> {
    posting_links(html, page_url, profile)
        .into_iter()
        .filter_map(|link| {
            let title = if link.text.chars().count() < MIN_TITLE_CHARS {
                title_from_slug(&link.url).unwrap_or(link.text)
            } else {
                link.text
            };
            (title.chars().count() >= MIN_TITLE_CHARS).then(|| Posting::new(title, link.url, root))
        })
        .collect()
}

fn has_listing_id(url: &Url, profile: &PlatformProfile) -> bool {
    let Some(param) = profile.id_params.first() else {
        return false;
    };
    url.query_pairs().any(|(key, value)| {
        key.eq_ignore_ascii_case(param) && value.bytes().next().is_some_and(|b| b.is_ascii_digit())
    })
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") || lower.starts_with("mailto:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return matches!(url.scheme(), "http" | "https").then_some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}

/// Anchors whose text is an icon still carry a readable slug in the URL.
/// Best effort: the last long hyphenated segment, title-cased.
fn title_from_slug(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed
        .path_segments()?
        .rev()
        .find(|segment| segment.chars().count() > SLUG_MIN_CHARS && segment.contains('-'))
        .map(|segment| title_case(&segment.replace('-', " ")))
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use scout_core::PlatformProfile;

    use super::{posting_links, title_case, title_from_slug};

    #[test]
    fn job_id_only_needs_a_leading_digit() {
        let html = r#"<a href="/careers/Position?jobId=123abc">Welder</a>
            <a href="/careers/Position?jobId=abc123">Fitter</a>
            <a href="/careers/Position?jobId=">Rigger</a>"#;
        let links = posting_links(html, "https://a.avature.net/careers", &PlatformProfile::avature());
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://a.avature.net/careers/Position?jobId=123abc");
        assert_eq!(links[0].text, "Welder");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("senior data engineer"), "Senior Data Engineer");
        assert_eq!(title_case("SQL developer II"), "Sql Developer Ii");
    }

    #[test]
    fn slug_recovery_uses_last_long_hyphenated_segment() {
        assert_eq!(
            title_from_slug("https://a.avature.net/long-board-name/JobDetail/senior-data-engineer/12")
                .as_deref(),
            Some("Senior Data Engineer")
        );
        assert_eq!(title_from_slug("https://a.avature.net/careers/JobDetail/12"), None);
    }
}
