use crate::support::{full_detail_page, listing_page, mount_html, short_detail_page};
use oto_harvest::config::{parse_config, Config, RendererKind};
use oto_harvest::crawler::{run_harvest, Coordinator, StopReason};
use oto_harvest::output::{CsvSink, DatasetSink};
use oto_harvest::render::HttpRenderer;
use oto_harvest::ListingRecord;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn hrefs(range: std::ops::Range<usize>) -> Vec<String> {
    range.map(|i| format!("/xe/{}", i)).collect()
}

/// Creates a test configuration pointing at the mock site
fn create_test_config(base_url: &str, output: &Path, skip_known_urls: bool) -> Config {
    let toml = format!(
        r#"
[site]
base-url = "{}"
regions = ["ha-noi"]
filters = ["", "/f1"]

[crawler]
workers = 15
fetch-timeout-secs = 5

[renderer]
kind = "http"
first-page-settle-ms = 0
page-settle-ms = 0
expand-settle-ms = 0

[output]
path = "{}"
skip-known-urls = {}
"#,
        base_url,
        output.display(),
        skip_known_urls
    );
    parse_config(&toml).expect("valid test config")
}

/// Mounts a small site:
/// - unfiltered listing: pages 1 and 2 with ten ads each, page 3 repeats page 2
/// - filtered listing: page 1 only, half of it overlapping the unfiltered ads
/// - detail pages for ads 0..25, ad 3 has no price
async fn mount_site(server: &MockServer) {
    mount_html(server, "/mua-ban-xe-ha-noi", listing_page(&hrefs(0..10))).await;
    mount_html(server, "/mua-ban-xe-ha-noi/p2", listing_page(&hrefs(10..20))).await;
    mount_html(server, "/mua-ban-xe-ha-noi/p3", listing_page(&hrefs(10..20))).await;
    mount_html(server, "/mua-ban-xe-ha-noi/f1", listing_page(&hrefs(15..25))).await;

    for i in 0..25 {
        let body = if i == 3 {
            full_detail_page("No price").replace("class=\"price\"", "class=\"contact\"")
        } else if i % 3 == 0 {
            short_detail_page(&format!("Car {}", i))
        } else {
            full_detail_page(&format!("Car {}", i))
        };
        mount_html(server, &format!("/xe/{}", i), body).await;
    }
}

fn read_records(path: &Path) -> Vec<ListingRecord> {
    let mut reader = csv::Reader::from_path(path).expect("open csv");
    reader
        .deserialize()
        .collect::<Result<Vec<ListingRecord>, _>>()
        .expect("parse csv")
}

#[tokio::test]
async fn test_full_harvest_over_http() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("data").join("raw.csv");
    let config = create_test_config(&server.uri(), &output, false);
    assert_eq!(config.renderer.kind, RendererKind::Http);

    let stats = run_harvest(&config).await.expect("harvest");

    assert_eq!(stats.targets.len(), 2);

    let unfiltered = &stats.targets[0];
    assert_eq!(unfiltered.target, "/mua-ban-xe-ha-noi");
    assert_eq!(unfiltered.links, 20);
    assert_eq!(unfiltered.pages, 3);
    assert_eq!(unfiltered.succeeded, 19);
    assert_eq!(unfiltered.extraction_failures, 1);

    let filtered = &stats.targets[1];
    assert_eq!(filtered.target, "/mua-ban-xe-ha-noi/f1");
    assert_eq!(filtered.links, 10);
    // Pages 2 and 3 of the filtered listing do not exist
    assert_eq!(filtered.failed_pages, 2);
    assert_eq!(filtered.succeeded, 10);

    // Ads 15..20 appear in both listings and are stored twice
    let records = read_records(&output);
    assert_eq!(records.len(), 29);
    assert_eq!(stats.written, 29);
    assert!(records.iter().all(|r| !r.url.ends_with("/xe/3")));

    let short = records
        .iter()
        .find(|r| r.url == format!("{}/xe/6", server.uri()))
        .expect("ad 6 harvested");
    assert_eq!(short.mileage, "0km");
    assert_eq!(short.transmission, "Automatic");

    let full = records
        .iter()
        .find(|r| r.url == format!("{}/xe/7", server.uri()))
        .expect("ad 7 harvested");
    assert_eq!(full.mileage, "50000 km");
    assert_eq!(full.title, "Car 7");
}

#[tokio::test]
async fn test_repeated_harvest_accumulates_rows() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("raw.csv");
    let config = create_test_config(&server.uri(), &output, false);

    run_harvest(&config).await.unwrap();
    run_harvest(&config).await.unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.matches("ten_san_pham").count(), 1);
    assert_eq!(read_records(&output).len(), 58);
}

#[tokio::test]
async fn test_skip_known_urls_deduplicates_across_runs() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("raw.csv");
    let config = create_test_config(&server.uri(), &output, true);

    let first = run_harvest(&config).await.unwrap();
    let second = run_harvest(&config).await.unwrap();

    assert_eq!(first.written, 24);
    assert_eq!(second.written, 0);

    let records = read_records(&output);
    let unique: HashSet<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(records.len(), 24);
    assert_eq!(unique.len(), 24);
}

#[tokio::test]
async fn test_discovery_stops_at_link_target() {
    let server = MockServer::start().await;
    mount_site(&server).await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("raw.csv");
    let mut config = create_test_config(&server.uri(), &output, false);
    config.site.filters = vec![String::new()];
    config.crawler.max_links = 15;

    let renderer = HttpRenderer::new("Mozilla/5.0", Duration::from_secs(5)).unwrap();
    let mut coordinator = Coordinator::new(&config, renderer).unwrap();
    let sink = CsvSink::new(&output, false);

    let stats = coordinator.run(&sink as &dyn DatasetSink).await.unwrap();

    assert_eq!(stats.targets[0].links, 15);
    assert_eq!(stats.targets[0].pages, 2);
    assert_eq!(stats.targets[0].stop_reason, StopReason::LinkTarget.to_string());
}

#[tokio::test]
async fn test_listing_server_down_yields_empty_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mua-ban-xe-ha-noi"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = dir.path().join("raw.csv");
    let mut config = create_test_config(&server.uri(), &output, false);
    config.site.filters = vec![String::new()];

    let stats = run_harvest(&config).await.unwrap();

    assert_eq!(stats.total_links(), 0);
    assert_eq!(stats.targets[0].failed_pages, 3);
    assert!(read_records(&output).is_empty());
}
