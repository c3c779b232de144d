use pretty_assertions::assert_eq;
use scout_engine::{ExtractedFields, Extractor, PatternExtractor};

const REQUEST_URL: &str = "https://acme.avature.net/careers/JobDetail/Senior-Engineer/101";

fn extract(html: &str) -> ExtractedFields {
    PatternExtractor::standard().unwrap().extract(html, REQUEST_URL)
}

fn long_text(word: &str) -> String {
    vec![word; 30].join(" ")
}

#[test]
fn earlier_container_rule_wins_over_document_order() {
    let html = format!(
        r#"<div class="description">{}</div><div class="job-description">{}</div>"#,
        long_text("generic"),
        long_text("specific")
    );
    let fields = extract(&html);
    assert!(fields.description_text.starts_with("specific specific"));
    assert_eq!(fields.description_html, long_text("specific"));
}

#[test]
fn short_containers_fall_through_to_later_rules() {
    let html = format!(
        r#"<div class="job-description">See below</div><div class="jobDetails"><p>{}</p></div>"#,
        long_text("details")
    );
    let fields = extract(&html);
    assert_eq!(fields.description_text, long_text("details"));
}

#[test]
fn container_classes_match_regardless_of_case() {
    let html = r#"<div class="JobDescription"><ul><li>Design, build and operate the payment platform used by our merchants worldwide.</li><li>Mentor engineers.</li></ul></div>"#;
    let fields = extract(html);
    assert_eq!(
        fields.description_text,
        "Design, build and operate the payment platform used by our merchants worldwide. Mentor engineers."
    );

    let html = format!(r#"<div id="Job-Description">{}</div>"#, long_text("upper"));
    assert_eq!(extract(&html).description_text, long_text("upper"));
}

#[test]
fn long_paragraphs_are_the_last_resort() {
    let paragraph = "x".repeat(150);
    let html = format!("<html><body><p>Short intro.</p><p>{paragraph}</p></body></html>");
    let fields = extract(&html);
    assert_eq!(fields.description_html, format!("<p>{paragraph}</p>"));
    assert_eq!(fields.description_text, paragraph);
}

#[test]
fn at_most_five_paragraphs_are_joined() {
    let body: String = (0..7).map(|i| format!("<p>{}</p>", long_text(&format!("para{i}")))).collect();
    let fields = extract(&format!("<html><body>{body}</body></html>"));
    assert_eq!(fields.description_html.matches("<p>").count(), 5);
    assert!(fields.description_text.contains("para4"));
    assert!(!fields.description_text.contains("para5"));
}

#[test]
fn scripts_inside_the_description_never_reach_the_text() {
    let html = format!(
        r#"<div class="job-description"><script>var token = "secret";</script><p>{}</p></div>"#,
        long_text("role")
    );
    let fields = extract(&html);
    assert!(!fields.description_text.contains("secret"));
    assert_eq!(fields.description_text, long_text("role"));
}

#[test]
fn metadata_fields_come_from_markup_and_json_ld() {
    let html = r#"<html><head>
<script type="application/ld+json">{"@type":"JobPosting","employmentType":"FULL_TIME","datePosted":"2024-02-02"}</script>
</head><body>
<span class="job-location">Berlin, Germany</span>
<div class="department">Engineering</div>
<a class="btn apply-button" href="/careers/ApplicationMethods?jobId=101&amp;source=web">Apply now</a>
</body></html>"#;
    let fields = extract(html);
    assert_eq!(fields.location, "Berlin, Germany");
    assert_eq!(fields.department, "Engineering");
    assert_eq!(fields.employment_type, "FULL_TIME");
    assert_eq!(fields.date_posted, "2024-02-02");
    assert_eq!(
        fields.apply_url,
        "https://acme.avature.net/careers/ApplicationMethods?jobId=101&source=web"
    );
}

#[test]
fn date_posted_prefers_microdata() {
    let html = r#"<meta itemprop="datePosted" content="2024-03-01"><p>Posted: March 5, 2024</p>"#;
    assert_eq!(extract(html).date_posted, "2024-03-01");
}

#[test]
fn out_of_range_locations_are_rejected() {
    let html = format!(
        r#"<span class="location">NY</span><span class="job-location">{}</span><span class="location-name">Lisbon</span>"#,
        "z".repeat(120)
    );
    assert_eq!(extract(&html).location, "Lisbon");
}

#[test]
fn empty_page_defaults_apply_url_to_request() {
    let fields = extract("<html><body></body></html>");
    assert_eq!(fields, ExtractedFields::empty(REQUEST_URL));
}
