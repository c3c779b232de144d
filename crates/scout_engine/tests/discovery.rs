mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{listing_html, ScriptedFetcher, TestSink};
use pretty_assertions::assert_eq;
use scout_engine::{discover, DiscoverySettings, EngineEvent};
use tokio_util::sync::CancellationToken;

fn settings() -> DiscoverySettings {
    DiscoverySettings {
        probe_spacing: Duration::ZERO,
        request_spacing: Duration::ZERO,
        ..DiscoverySettings::default()
    }
}

fn acme_page(offset: usize) -> String {
    format!("https://acme.avature.net/careers/SearchJobs/?jobOffset={offset}")
}

fn scripted_boards() -> ScriptedFetcher {
    let first = listing_html(&[
        ("/careers/JobDetail/Senior-Engineer/101", "Senior Engineer"),
        ("/careers/JobDetail/Data-Analyst/102", "Data Analyst"),
        ("/careers/JobDetail/Share/9", "Share"),
    ]);
    let second = listing_html(&[
        ("/careers/JobDetail/Data-Analyst/102", "Data Analyst"),
        ("http://acme.avature.net/careers/JobDetail/Site-Reliability-Engineer/103", "Site Reliability Engineer"),
        ("/careers/JobDetail/Site-Reliability-Engineer/103", "Site Reliability Engineer"),
    ]);
    ScriptedFetcher::new()
        .page("https://acme.avature.net/careers/SearchJobs/", &first)
        .page(&acme_page(0), &first)
        .page(&acme_page(20), &second)
        .page(&acme_page(40), &listing_html(&[]))
        .page(&acme_page(60), &listing_html(&[]))
        .respond(
            "https://dead.avature.net/en_US/SearchJobs/",
            404,
            "https://dead.avature.net/en_US/SearchJobs/",
            "",
        )
}

#[tokio::test]
async fn discovers_only_postings_missing_from_the_seed() {
    let fetcher = Arc::new(scripted_boards());
    let seeds = vec![
        "https://acme.avature.net/careers/JobDetail/Senior-Engineer/101".to_string(),
        "https://ACME.avature.net/careers/SearchJobs/?jobOffset=40".to_string(),
        "https://dead.avature.net/en_US/JobDetail/5".to_string(),
        "https://example.com/jobs/JobDetail/1".to_string(),
    ];
    let sink = TestSink::new();

    let report = discover(fetcher.clone(), &seeds, &settings(), &sink, &CancellationToken::new()).await;

    assert_eq!(report.seed_urls, 4);
    assert_eq!(report.site_roots, 2);
    assert_eq!(report.endpoints.len(), 1);
    assert_eq!(report.endpoints[0].estimated_job_count, 3);
    assert_eq!(report.raw_postings, 5);
    assert_eq!(report.unique_postings, 3);
    assert!(!report.cancelled);

    let existing: Vec<&str> = report.partition.existing.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(existing, vec!["https://acme.avature.net/careers/JobDetail/Senior-Engineer/101"]);
    let new: Vec<(&str, &str)> = report
        .new_postings()
        .iter()
        .map(|p| (p.title.as_str(), p.url.as_str()))
        .collect();
    assert_eq!(
        new,
        vec![
            ("Data Analyst", "https://acme.avature.net/careers/JobDetail/Data-Analyst/102"),
            (
                "Site Reliability Engineer",
                "https://acme.avature.net/careers/JobDetail/Site-Reliability-Engineer/103"
            ),
        ]
    );

    let probed: Vec<(String, bool)> = sink
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::EndpointProbed { base_url, live, .. } => Some((base_url, live)),
            _ => None,
        })
        .collect();
    assert_eq!(
        probed,
        vec![
            ("https://acme.avature.net/careers".to_string(), true),
            ("https://dead.avature.net/en_US".to_string(), false),
        ]
    );
    assert!(!fetcher.requests().iter().any(|url| url.contains("example.com")));
}

#[tokio::test]
async fn cancelled_discovery_reports_partial_results() {
    let fetcher = Arc::new(scripted_boards());
    let cancel = CancellationToken::new();
    cancel.cancel();
    let seeds = ["https://acme.avature.net/careers/JobDetail/Senior-Engineer/101"];

    let report = discover(fetcher.clone(), &seeds, &settings(), &TestSink::new(), &cancel).await;

    assert!(report.cancelled);
    assert!(report.endpoints.is_empty());
    assert!(fetcher.requests().is_empty());
    assert!(report.to_string().contains("DISCOVERY INTERRUPTED"));
}
