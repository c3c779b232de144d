use std::fmt;

use serde::{Deserialize, Serialize};

use crate::SiteRoot;

/// A job posting as found on a listing page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Posting {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub source_path: String,
}

impl Posting {
    pub fn new(title: impl Into<String>, url: impl Into<String>, root: &SiteRoot) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            location: String::new(),
            source_domain: root.domain().to_string(),
            source_path: root.site_path(),
        }
    }
}

/// Result of probing a site root's listing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub root: SiteRoot,
    pub is_live: bool,
    /// Distinct posting links on the first listing page; a rough signal only.
    pub estimated_job_count: usize,
}

impl Endpoint {
    pub fn dead(root: SiteRoot) -> Self {
        Self {
            root,
            is_live: false,
            estimated_job_count: 0,
        }
    }
}

/// Outcome of extracting one posting. Serialized as `success`, `http_<code>` or `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ExtractionStatus {
    Success,
    Http(u16),
    Error,
}

impl ExtractionStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionStatus::Success)
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionStatus::Success => write!(f, "success"),
            ExtractionStatus::Http(code) => write!(f, "http_{code}"),
            ExtractionStatus::Error => write!(f, "error"),
        }
    }
}

impl From<ExtractionStatus> for String {
    fn from(status: ExtractionStatus) -> Self {
        status.to_string()
    }
}

impl From<String> for ExtractionStatus {
    fn from(raw: String) -> Self {
        if raw == "success" {
            return ExtractionStatus::Success;
        }
        raw.strip_prefix("http_")
            .and_then(|code| code.parse().ok())
            .map(ExtractionStatus::Http)
            .unwrap_or(ExtractionStatus::Error)
    }
}

/// Fully extracted posting, as stored in the ledger and written to outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub apply_url: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub date_posted: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub description_text: String,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub source_path: String,
    pub extraction_status: ExtractionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub extracted_at: String,
}
