#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use scout_engine::{EngineEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, ProgressSink};

/// In-memory fetcher answering from a URL table and logging every request.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, Result<FetchOutput, FetchError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.respond(url, 200, url, body)
    }

    pub fn respond(self, url: &str, status: u16, final_url: &str, body: &str) -> Self {
        let output = FetchOutput {
            status,
            body: body.to_string(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: final_url.to_string(),
                content_type: Some("text/html".to_string()),
                encoding: "UTF-8".to_string(),
                byte_len: body.len() as u64,
            },
        };
        self.responses.lock().unwrap().insert(url.to_string(), Ok(output));
        self
    }

    pub fn fail(self, url: &str, kind: FailureKind) -> Self {
        let err = FetchError {
            kind,
            message: "scripted failure".to_string(),
        };
        self.responses.lock().unwrap().insert(url.to_string(), Err(err));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.responses
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_else(|| {
                Err(FetchError {
                    kind: FailureKind::Network,
                    message: format!("no script for {url}"),
                })
            })
    }
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// A listing page with one anchor per (href, text).
pub fn listing_html(links: &[(&str, &str)]) -> String {
    let anchors: String = links
        .iter()
        .map(|(href, text)| format!(r#"<li><a href="{href}">{text}</a></li>"#))
        .collect();
    format!("<html><body><nav><a href=\"/careers/Login\">Sign in</a></nav><ul>{anchors}</ul></body></html>")
}
