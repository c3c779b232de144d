mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use common::TestSink;
use pretty_assertions::assert_eq;
use scout_core::{ExtractionStatus, JobRecord, Ledger, Posting};
use scout_engine::{
    EngineEvent, FetchSettings, JsonFileLedger, MemoryLedger, PatternExtractor, ReqwestFetcher,
    RetryPolicy, RunController, RunError, RunSettings,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL: &str = r#"<html><body>
<div class="job-description"><p>Operate the fleet of build machines and keep the release train on schedule for every team.</p></div>
</body></html>"#;

fn posting(url: &str, title: &str) -> Posting {
    Posting {
        title: title.to_string(),
        url: url.to_string(),
        location: "Remote".to_string(),
        source_domain: "acme.avature.net".to_string(),
        source_path: "careers".to_string(),
    }
}

fn done(url: &str) -> JobRecord {
    JobRecord {
        title: "Already done".to_string(),
        url: url.to_string(),
        apply_url: url.to_string(),
        location: "Paris".to_string(),
        date_posted: String::new(),
        department: String::new(),
        employment_type: String::new(),
        description_text: "old".to_string(),
        description_html: "old".to_string(),
        source_domain: "acme.avature.net".to_string(),
        source_path: "careers".to_string(),
        extraction_status: ExtractionStatus::Success,
        error: None,
        extracted_at: "2024-01-01T00:00:00+00:00".to_string(),
    }
}

fn settings(batch_size: usize) -> RunSettings {
    RunSettings {
        batch_size,
        retry: RetryPolicy::none(),
        request_spacing: Duration::ZERO,
    }
}

fn controller(store: Arc<MemoryLedger>, batch_size: usize) -> RunController {
    RunController::new(
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
        Arc::new(PatternExtractor::standard().unwrap()),
        store,
        settings(batch_size),
    )
    .with_clock(Arc::new(|| "2025-06-01T12:00:00+00:00".to_string()))
}

async fn detail_server(paths: &[(&str, u16, u64)]) -> MockServer {
    let server = MockServer::start().await;
    for (p, status, expected) in paths {
        Mock::given(method("GET"))
            .and(path(*p))
            .respond_with(ResponseTemplate::new(*status).set_body_raw(DETAIL, "text/html"))
            .expect(*expected)
            .mount(&server)
            .await;
    }
    server
}

#[tokio::test]
async fn resumed_run_only_processes_new_urls() {
    scout_logging::initialize_for_tests();
    let server = detail_server(&[("/careers/JobDetail/1", 200, 0), ("/careers/JobDetail/2", 200, 1)]).await;
    let url_a = format!("{}/careers/JobDetail/1", server.uri());
    let url_b = format!("{}/careers/JobDetail/2", server.uri());

    let mut ledger = Ledger::new();
    ledger.record(done(&url_a));
    let store = Arc::new(MemoryLedger::new(ledger));

    let jobs = vec![posting(&url_a, "Build Engineer"), posting(&url_b, "Release Manager")];
    let summary = controller(store.clone(), 100)
        .run(jobs, &TestSink::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.total_records, 2);
    assert!(!summary.stopped_early);

    let saved = store.snapshot();
    assert_eq!(saved, summary.ledger);
    assert_eq!(saved.results.len(), 2);
    assert_eq!(saved.results[0], done(&url_a));
    let b = &saved.results[1];
    assert_eq!(b.url, url_b);
    assert_eq!(b.title, "Release Manager");
    assert_eq!(b.extraction_status, ExtractionStatus::Success);
    assert_eq!(b.location, "Remote");
    assert_eq!(b.extracted_at, "2025-06-01T12:00:00+00:00");
    assert!(b.description_text.starts_with("Operate the fleet"));
    assert_eq!(saved.completed_urls.len(), 2);
}

#[tokio::test]
async fn ledger_is_saved_every_batch_and_at_the_end() {
    let server = detail_server(&[
        ("/careers/JobDetail/1", 200, 1),
        ("/careers/JobDetail/2", 404, 1),
        ("/careers/JobDetail/3", 200, 1),
    ])
    .await;
    let jobs: Vec<Posting> = (1..=3)
        .map(|n| posting(&format!("{}/careers/JobDetail/{n}", server.uri()), "Engineer"))
        .collect();
    let store = Arc::new(MemoryLedger::default());
    let sink = TestSink::new();

    let summary = controller(store.clone(), 2)
        .run(jobs, &sink, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.with_description, 2);
    assert_eq!(store.saves(), 2);

    let events = sink.take();
    let saves: Vec<usize> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::LedgerSaved { records } => Some(*records),
            _ => None,
        })
        .collect();
    assert_eq!(saves, vec![2, 3]);
    let statuses: Vec<String> = events
        .iter()
        .filter_map(|event| match event {
            EngineEvent::JobExtracted { index, total, status, .. } => {
                Some(format!("{index}/{total} {status}"))
            }
            _ => None,
        })
        .collect();
    assert_eq!(statuses, vec!["1/3 success", "2/3 http_404", "3/3 success"]);

    let failed = &store.snapshot().results[1];
    assert_eq!(failed.error.as_deref(), Some("HTTP 404"));
    assert_eq!(failed.location, "Remote");
}

#[tokio::test]
async fn duplicate_and_blank_jobs_are_processed_once() {
    let server = detail_server(&[("/careers/JobDetail/1", 200, 1)]).await;
    let url = format!("{}/careers/JobDetail/1", server.uri());
    let jobs = vec![
        posting(&url, "Engineer"),
        posting(&format!("  {url} "), "Engineer"),
        posting("   ", "Blank"),
    ];
    let store = Arc::new(MemoryLedger::default());

    let summary = controller(store.clone(), 100)
        .run(jobs, &TestSink::new(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(store.snapshot().results.len(), 1);
}

#[tokio::test]
async fn cancelled_run_still_saves_progress() {
    let server = detail_server(&[("/careers/JobDetail/1", 200, 0)]).await;
    let jobs = vec![posting(&format!("{}/careers/JobDetail/1", server.uri()), "Engineer")];
    let mut ledger = Ledger::new();
    ledger.record(done("https://acme.avature.net/careers/JobDetail/0"));
    let store = Arc::new(MemoryLedger::new(ledger.clone()));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let summary = controller(store.clone(), 100)
        .run(jobs, &TestSink::new(), &cancel)
        .await
        .unwrap();

    assert!(summary.stopped_early);
    assert_eq!(summary.processed, 0);
    assert_eq!(store.saves(), 1);
    assert_eq!(store.snapshot(), ledger);
    assert!(summary.to_string().contains("EXTRACTION INTERRUPTED"));
}

#[tokio::test]
async fn corrupt_ledger_refuses_to_start() {
    let temp = TempDir::new().unwrap();
    let ledger_path = temp.path().join("progress.json");
    fs::write(&ledger_path, "{ not json").unwrap();

    let controller = RunController::new(
        Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap()),
        Arc::new(PatternExtractor::standard().unwrap()),
        Arc::new(JsonFileLedger::new(&ledger_path)),
        settings(100),
    );
    let result = controller
        .run(Vec::new(), &TestSink::new(), &CancellationToken::new())
        .await;

    assert!(matches!(result, Err(RunError::Restore(_))));
    assert_eq!(fs::read_to_string(&ledger_path).unwrap(), "{ not json");
}
