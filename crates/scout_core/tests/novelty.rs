use scout_core::{partition, PlatformProfile, Posting};

fn posting(url: &str) -> Posting {
    Posting {
        title: "Warehouse Associate".to_string(),
        url: url.to_string(),
        location: String::new(),
        source_domain: "x.avature.net".to_string(),
        source_path: "x".to_string(),
    }
}

#[test]
fn same_id_under_other_scheme_and_case_is_existing() {
    let seeds = ["https://x.avature.net/x/JobDetail/55"];
    let postings = vec![
        posting("HTTP://X.AVATURE.NET/x/JobDetail/55"),
        posting("http://x.avature.net/x/JobDetail/Warehouse-Associate/55"),
        posting("https://x.avature.net/x/JobDetail/56"),
    ];

    let result = partition(postings, &seeds, &PlatformProfile::avature());
    assert_eq!(result.existing.len(), 2);
    assert_eq!(result.new.len(), 1);
    assert_eq!(result.new[0].url, "https://x.avature.net/x/JobDetail/56");
}

#[test]
fn normalized_url_match_without_id() {
    let seeds = ["https://x.avature.net/x/JobDetail/Warehouse-Associate/"];
    let postings = vec![posting("http://X.avature.net/x/JobDetail/Warehouse-Associate")];
    let result = partition(postings, &seeds, &PlatformProfile::avature());
    assert_eq!(result.existing.len(), 1);
    assert!(result.new.is_empty());
}

#[test]
fn malformed_seeds_are_skipped() {
    let seeds = ["", "::::", "https://", "https://x.avature.net/x/JobDetail/55"];
    let postings = vec![
        posting("https://x.avature.net/x/JobDetail/55"),
        posting("https://x.avature.net/x/JobDetail/57"),
    ];
    let result = partition(postings, &seeds, &PlatformProfile::avature());
    assert_eq!(result.existing.len(), 1);
    assert_eq!(result.new.len(), 1);
}
