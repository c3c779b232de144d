use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::JobRecord;

/// Progress of an extraction run: which URLs are done and what they produced.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ledger {
    #[serde(default)]
    pub completed_urls: BTreeSet<String>,
    #[serde(default)]
    pub results: Vec<JobRecord>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, url: &str) -> bool {
        self.completed_urls.contains(url)
    }

    /// Append a record unless its URL is already completed. Returns whether it was added.
    pub fn record(&mut self, record: JobRecord) -> bool {
        if !self.completed_urls.insert(record.url.clone()) {
            return false;
        }
        self.results.push(record);
        true
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
