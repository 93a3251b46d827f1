//! Upstream Fetch Tests
//!
//! Runs the describer with the real HTTP fetcher against a mock MediaWiki API.

use std::sync::Arc;
use std::time::Duration;

use short_description::{Describer, DescriberConfig, ErrorKind, ReqwestFetcher};
use wiremock::matchers::{header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONTACT: &str = "test@example.org";

const REVISION_BODY: &str = r#"{"batchcomplete":true,"query":{"pages":[{"pageid":1,"title":"Yoshua Bengio","revisions":[{"slots":{"main":{"content":"{{Short description|Canadian computer scientist}}\n'''Yoshua Bengio''' is..."}}}]}]}}"#;

// == Helper Functions ==

fn describer_for(server: &MockServer, timeout: Duration) -> Describer {
    let mut config = DescriberConfig::new(CONTACT);
    config.upstream_url = format!("{}/w/api.php", server.uri());
    let fetcher = ReqwestFetcher::new(timeout).unwrap();
    Describer::new(config, Arc::new(fetcher)).unwrap()
}

// == Success ==

#[tokio::test]
async fn test_fetches_and_extracts_description() {
    let server = MockServer::start().await;
    let describer = describer_for(&server, Duration::from_secs(5));

    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "query"))
        .and(query_param("prop", "revisions"))
        .and(query_param("rvprop", "content"))
        .and(query_param("rvslots", "main"))
        .and(query_param("titles", "Yoshua Bengio"))
        .and(header("user-agent", "integration-test"))
        .and(header("Api-User-Agent", describer.api_user_agent()))
        .respond_with(ResponseTemplate::new(200).set_body_string(REVISION_BODY))
        .expect(1)
        .mount(&server)
        .await;

    let first = describer
        .short_description("yoshua_Bengio", "integration-test")
        .await
        .unwrap();
    assert_eq!(first.person, "Yoshua Bengio");
    assert_eq!(first.description, "Canadian computer scientist");

    // Served from cache; the mock verifies a single upstream call on drop
    let second = describer
        .short_description("Yoshua+Bengio", "integration-test")
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_service_tag_carries_contact_info() {
    let server = MockServer::start().await;
    let describer = describer_for(&server, Duration::from_secs(5));

    assert!(describer.api_user_agent().starts_with("ShortDescriptionAPI/v"));
    assert!(describer.api_user_agent().contains(&format!("({})", CONTACT)));

    Mock::given(method("GET"))
        .and(header_exists("Api-User-Agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(REVISION_BODY))
        .expect(1)
        .mount(&server)
        .await;

    describer
        .short_description("Yoshua Bengio", "integration-test")
        .await
        .unwrap();
}

// == Failures ==

#[tokio::test]
async fn test_page_without_short_description_is_not_found() {
    let server = MockServer::start().await;
    let describer = describer_for(&server, Duration::from_secs(5));

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"query":{"pages":[{"title":"Yoshua Bengio","missing":true}]}}"#,
        ))
        .mount(&server)
        .await;

    let err = describer
        .short_description("Yoshua Bengio", "integration-test")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_upstream_status_classification() {
    let cases = [
        (404, ErrorKind::NotFound),
        (400, ErrorKind::Internal),
        (500, ErrorKind::Upstream),
        (503, ErrorKind::Upstream),
    ];

    for (status, expected) in cases {
        let server = MockServer::start().await;
        let describer = describer_for(&server, Duration::from_secs(5));

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .expect(1)
            .mount(&server)
            .await;

        let err = describer
            .short_description("Yoshua Bengio", "integration-test")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), expected, "status {}", status);
        assert!(
            err.to_string().contains(&format!("request failed with status {}", status)),
            "unexpected message: {}",
            err
        );
    }
}

#[tokio::test]
async fn test_failed_lookups_are_not_cached() {
    let server = MockServer::start().await;
    let describer = describer_for(&server, Duration::from_secs(5));

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let err = describer
            .short_description("Yoshua Bengio", "integration-test")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
    assert!(describer.cache().read().await.is_empty());
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    let describer = describer_for(&server, Duration::from_millis(100));

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(REVISION_BODY)
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let err = describer
        .short_description("Yoshua Bengio", "integration-test")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
}

#[tokio::test]
async fn test_unreachable_upstream_is_upstream_error() {
    let mut config = DescriberConfig::new(CONTACT);
    // Port 9 (discard) is closed on test hosts
    config.upstream_url = "http://127.0.0.1:9/w/api.php".to_string();
    let fetcher = ReqwestFetcher::new(Duration::from_secs(2)).unwrap();
    let describer = Describer::new(config, Arc::new(fetcher)).unwrap();

    let err = describer
        .short_description("Yoshua Bengio", "integration-test")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Upstream);
}
