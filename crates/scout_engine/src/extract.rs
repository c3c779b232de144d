use scraper::Selector;
use url::Url;

use crate::rules::{FieldRules, Page, RuleError};
use crate::text::strip_html;

const MIN_DESCRIPTION_CHARS: usize = 50;
const MIN_PARAGRAPH_CHARS: usize = 100;
const MAX_FALLBACK_PARAGRAPHS: usize = 5;

/// Structured fields of one job detail page. Empty strings mean "not found".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub description_html: String,
    pub description_text: String,
    pub location: String,
    pub date_posted: String,
    pub department: String,
    pub employment_type: String,
    pub apply_url: String,
}

impl ExtractedFields {
    /// Nothing extracted; the apply link defaults to the posting itself.
    pub fn empty(request_url: &str) -> Self {
        Self {
            apply_url: request_url.to_string(),
            ..Self::default()
        }
    }
}

pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, request_url: &str) -> ExtractedFields;
}

/// Rule-driven extractor: every field is the first accepted match of its chain.
///
/// The description additionally falls back to the first long paragraphs of
/// the page when no container qualifies. That fallback is a heuristic and can
/// pick up boilerplate on unfamiliar templates.
#[derive(Debug)]
pub struct PatternExtractor {
    rules: FieldRules,
}

impl PatternExtractor {
    pub fn new(rules: FieldRules) -> Self {
        Self { rules }
    }

    pub fn standard() -> Result<Self, RuleError> {
        FieldRules::standard().map(Self::new)
    }
}

impl Extractor for PatternExtractor {
    fn extract(&self, html: &str, request_url: &str) -> ExtractedFields {
        let page = Page::parse(html);
        let rules = &self.rules;

        let (description_html, description_text) = rules
            .description
            .first_accepted(&page, |raw| {
                let text = strip_html(raw);
                (text.chars().count() > MIN_DESCRIPTION_CHARS).then(|| (raw.trim().to_string(), text))
            })
            .or_else(|| paragraph_fallback(&page))
            .unwrap_or_default();

        let location = rules
            .location
            .first_accepted(&page, |raw| {
                let text = strip_html(raw);
                let len = text.chars().count();
                (len > 2 && len < 100).then_some(text)
            })
            .unwrap_or_default();

        let date_posted = rules
            .date_posted
            .first_accepted(&page, |raw| non_empty(raw.trim().to_string()))
            .unwrap_or_default();

        let department = rules
            .department
            .first_accepted(&page, |raw| {
                let text = strip_html(raw);
                (text.chars().count() > 2).then_some(text)
            })
            .unwrap_or_default();

        let employment_type = rules
            .employment_type
            .first_accepted(&page, |raw| non_empty(strip_html(raw)))
            .unwrap_or_default();

        let apply_url = rules
            .apply_url
            .first_accepted(&page, |raw| resolve_apply_url(raw, request_url))
            .unwrap_or_else(|| request_url.to_string());

        ExtractedFields {
            description_html,
            description_text,
            location,
            date_posted,
            department,
            employment_type,
            apply_url,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

fn paragraph_fallback(page: &Page<'_>) -> Option<(String, String)> {
    let selector = Selector::parse("p").ok()?;
    let paragraphs: Vec<String> = page
        .document()
        .select(&selector)
        .map(|p| p.inner_html())
        .filter(|inner| strip_html(inner).chars().count() > MIN_PARAGRAPH_CHARS)
        .take(MAX_FALLBACK_PARAGRAPHS)
        .collect();
    if paragraphs.is_empty() {
        return None;
    }
    let html = format!("<p>{}</p>", paragraphs.join("</p><p>"));
    let text = strip_html(&html);
    Some((html, text))
}

/// Absolute apply link for a captured href; relative ones resolve against the request URL.
fn resolve_apply_url(raw: &str, request_url: &str) -> Option<String> {
    let href = html_escape::decode_html_entities(raw.trim()).into_owned();
    if href.is_empty() {
        return None;
    }
    if Url::parse(&href).is_ok() {
        return Some(href);
    }
    match Url::parse(request_url).and_then(|base| base.join(&href)) {
        Ok(resolved) => Some(resolved.into()),
        Err(_) => Some(href),
    }
}
