use crate::support::{detail_page, full_detail_page, mount_html, short_detail_page};
use oto_harvest::crawler::{build_http_client, fan_out, fetch_detail};
use oto_harvest::output::Dataset;
use oto_harvest::DetailError;
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

fn client() -> reqwest::Client {
    build_http_client(USER_AGENT, Duration::from_secs(10)).expect("client")
}

#[tokio::test]
async fn test_fetch_eight_entry_detail() {
    let server = MockServer::start().await;
    mount_html(&server, "/xe/1", full_detail_page("Toyota Vios")).await;

    let url = format!("{}/xe/1", server.uri());
    let record = fetch_detail(&client(), &url).await.unwrap();

    assert_eq!(record.url, url);
    assert_eq!(record.title, "Toyota Vios");
    assert_eq!(record.posted_on, "2024-01-01");
    assert_eq!(record.model_year, 2019);
    assert_eq!(record.mileage, "50000 km");
    assert_eq!(record.transmission, "Automatic");
    assert_eq!(record.origin, "Vietnam");
    assert_eq!(record.location, "Hanoi");
    assert_eq!(record.price, "500,000,000 VND");
}

#[tokio::test]
async fn test_fetch_seven_entry_detail() {
    let server = MockServer::start().await;
    mount_html(&server, "/xe/2", short_detail_page("Toyota Vios")).await;

    let record = fetch_detail(&client(), &format!("{}/xe/2", server.uri()))
        .await
        .unwrap();

    assert_eq!(record.mileage, "0km");
    assert_eq!(record.transmission, "Automatic");
}

#[tokio::test]
async fn test_fetch_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xe/ua"))
        .and(wiremock::matchers::header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw(full_detail_page("Kia"), "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let result = fetch_detail(&client(), &format!("{}/xe/ua", server.uri())).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_fetch_not_found_is_status_error() {
    let server = MockServer::start().await;

    let result = fetch_detail(&client(), &format!("{}/xe/missing", server.uri())).await;

    assert!(matches!(result, Err(DetailError::Status { status: 404, .. })));
}

#[tokio::test]
async fn test_fetch_invalid_markup_is_extraction_error() {
    let server = MockServer::start().await;
    mount_html(&server, "/xe/bad", detail_page("Kia", &["2019", "Xăng"])).await;

    let result = fetch_detail(&client(), &format!("{}/xe/bad", server.uri())).await;

    assert!(result.as_ref().is_err_and(DetailError::is_extraction));
}

#[tokio::test]
async fn test_fetch_timeout_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/xe/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(full_detail_page("Slow"), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let client = build_http_client(USER_AGENT, Duration::from_millis(200)).unwrap();
    let result = fetch_detail(&client, &format!("{}/xe/slow", server.uri())).await;

    assert!(matches!(result, Err(DetailError::Fetch { .. })));
}

#[tokio::test]
async fn test_concurrent_fan_out_collects_every_valid_record_once() {
    let server = MockServer::start().await;
    let valid = 60;

    for i in 0..valid {
        let body = if i % 2 == 0 {
            full_detail_page(&format!("Car {}", i))
        } else {
            short_detail_page(&format!("Car {}", i))
        };
        Mock::given(method("GET"))
            .and(path(format!("/xe/{}", i)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body, "text/html")
                    .set_delay(Duration::from_millis(20 + (i % 7) * 15)),
            )
            .expect(1)
            .mount(&server)
            .await;
    }
    for i in 0..5 {
        mount_html(
            &server,
            &format!("/xe/broken-{}", i),
            detail_page("Broken", &["đời mới", "a", "b", "c", "d", "e", "f"]),
        )
        .await;
    }

    let mut urls: Vec<String> = (0..valid).map(|i| format!("{}/xe/{}", server.uri(), i)).collect();
    urls.extend((0..5).map(|i| format!("{}/xe/broken-{}", server.uri(), i)));
    urls.extend((0..3).map(|i| format!("{}/xe/gone-{}", server.uri(), i)));

    let dataset = Dataset::new();
    let tally = fan_out(&client(), urls, 15, &dataset).await;

    assert_eq!(tally.attempted, 68);
    assert_eq!(tally.succeeded, 60);
    assert_eq!(tally.extraction_failures, 5);
    assert_eq!(tally.fetch_failures, 3);

    let records = dataset.into_records();
    assert_eq!(records.len(), 60);
    let unique: HashSet<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(unique.len(), 60);
    for i in 0..valid {
        assert!(unique.contains(format!("{}/xe/{}", server.uri(), i).as_str()));
    }
}

#[tokio::test]
async fn test_http_renderer_uses_fetch_client_settings() {
    use oto_harvest::render::{HttpRenderer, PageRenderer};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mua-ban-xe-ha-noi"))
        .and(wiremock::matchers::header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>listing</html>", "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let mut renderer = HttpRenderer::new(USER_AGENT, Duration::from_secs(5)).unwrap();
    renderer
        .navigate(&format!("{}/mua-ban-xe-ha-noi", server.uri()))
        .await
        .unwrap();

    assert!(renderer.content().await.unwrap().contains("listing"));
}
