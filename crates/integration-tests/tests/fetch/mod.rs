//! The upstream client against the mock CourtListener.

mod failures;

use std::time::Duration;

use integration_tests::{API_KEY, MockCourtListener, scotus, upstream_client};
use serde_json::{Map, Value, json};

fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("arguments must be an object, got {other}"),
    }
}

#[tokio::test]
async fn anonymous_court_detail_is_returned_unmodified() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    let body = client.fetch("/courts/scotus/", &Map::new(), None).await.unwrap();
    assert_eq!(body, scotus());

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/courts/scotus/");
    assert_eq!(requests[0].query, None);
    assert_eq!(requests[0].authorization, None);
    assert_eq!(requests[0].accept.as_deref(), Some("application/json"));
    assert!(requests[0].user_agent.as_deref().unwrap_or_default().starts_with("lexbridge/"));
}

#[tokio::test]
async fn credential_is_sent_as_token() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    client.fetch("/courts/scotus/", &Map::new(), Some(API_KEY)).await.unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.authorization, Some(format!("Token {API_KEY}")));
    assert_eq!(request.accept.as_deref(), Some("application/json"));
}

#[tokio::test]
async fn empty_credential_is_anonymous() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    client.fetch("/courts/scotus/", &Map::new(), Some("")).await.unwrap();

    assert_eq!(mock.requests()[0].authorization, None);
}

#[tokio::test]
async fn query_is_sanitized_and_encoded() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    let params = args(json!({
        "q": "<b>miranda</b> rights",
        "type": "o",
        "court": null,
        "filed_after": "",
        "page": 2,
        "highlight": true,
        "fields": ["a", "b"],
    }));

    client.fetch("/search/", &params, None).await.unwrap();

    let request = &mock.requests()[0];
    assert_eq!(request.path, "/search/");

    insta::assert_snapshot!(
        request.query.as_deref().unwrap_or_default(),
        @"highlight=true&page=2&q=bmiranda%2Fb+rights&type=o"
    );
}

#[tokio::test]
async fn list_envelope_is_normalized() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    let body = client.fetch("/courts/", &Map::new(), None).await.unwrap();

    assert_eq!(body["count"], 2);
    assert_eq!(body["next"], Value::Null);
    assert_eq!(body["previous"], Value::Null);
    assert_eq!(body["results"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn typed_page() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    let page: upstream::Page<Value> = client.fetch_as("/search/", &Map::new(), None).await.unwrap();

    assert_eq!(page.count, 1);
    assert!(!page.has_more());
    assert_eq!(page.results[0]["caseName"], "Miranda v. Arizona");
}

#[tokio::test]
async fn typed_shape_mismatch_is_unavailable() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    // A court detail object is not a page.
    let result = client
        .fetch_as::<upstream::Page<Value>>("/courts/scotus/", &Map::new(), None)
        .await;

    assert_eq!(result, Err(upstream::Unavailable));
}
