use std::fmt;

use scout_core::ExtractionStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    EndpointProbed {
        base_url: String,
        live: bool,
        estimated_jobs: usize,
    },
    PageHarvested {
        base_url: String,
        offset: usize,
        new_postings: usize,
    },
    EndpointHarvested {
        base_url: String,
        postings: usize,
    },
    JobExtracted {
        index: usize,
        total: usize,
        url: String,
        title: String,
        status: ExtractionStatus,
        description_chars: usize,
        error: Option<String>,
    },
    LedgerSaved {
        records: usize,
    },
}

/// A completed HTTP exchange. Non-success statuses are still `Ok`; callers decide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub status: u16,
    pub body: String,
    pub metadata: FetchMetadata,
}

impl FetchOutput {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The platform redirects dead boards and bad offsets to an error page.
    pub fn landed_on_error_page(&self) -> bool {
        self.metadata.final_url.to_ascii_lowercase().contains("error")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    pub final_url: String,
    pub content_type: Option<String>,
    pub encoding: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

/// Transport-level failure classes. HTTP statuses are not failures at this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
