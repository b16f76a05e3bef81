//! Every failure cause surfaces as the same `Unavailable`.

use std::time::{Duration, Instant};

use integration_tests::{API_KEY, MockCourtListener, upstream_client};
use serde_json::Map;
use upstream::Unavailable;

#[tokio::test]
async fn malformed_credential_makes_no_request() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    for credential in ["abc", "ABCDEF0123456789ABCDEF0123456789ABCDEF01", "' OR 1=1 --"] {
        let result = client.fetch("/courts/scotus/", &Map::new(), Some(credential)).await;
        assert_eq!(result, Err(Unavailable), "{credential}");
    }

    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn throttled_caller_makes_no_request() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 2, Duration::from_secs(30));

    for _ in 0..2 {
        client.fetch("/courts/scotus/", &Map::new(), Some(API_KEY)).await.unwrap();
    }

    let result = client.fetch("/courts/scotus/", &Map::new(), Some(API_KEY)).await;
    assert_eq!(result, Err(Unavailable));
    assert_eq!(mock.requests().len(), 2);

    // Other callers keep their own window.
    client.fetch("/courts/scotus/", &Map::new(), None).await.unwrap();
    assert_eq!(mock.requests().len(), 3);
}

#[tokio::test]
async fn rejected_calls_do_not_use_up_the_window() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 1, Duration::from_secs(30));

    // Same identity prefix as API_KEY, but malformed: rejected before the limiter is consulted.
    let malformed = format!("{}-not-hex", &API_KEY[..8]);
    let result = client.fetch("/courts/scotus/", &Map::new(), Some(&malformed)).await;
    assert_eq!(result, Err(Unavailable));

    client.fetch("/courts/scotus/", &Map::new(), Some(API_KEY)).await.unwrap();
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn refused_connection() {
    // Bind and release a port so nothing listens on it.
    let address = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();

    let client = upstream_client(&format!("http://{address}/api/rest/v4"), 100, Duration::from_secs(30));
    let result = client.fetch("/courts/scotus/", &Map::new(), None).await;

    assert_eq!(result, Err(Unavailable));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_millis(200));

    let start = Instant::now();
    let result = client.fetch("/slow/", &Map::new(), None).await;

    assert_eq!(result, Err(Unavailable));
    assert!(start.elapsed() < Duration::from_secs(5), "took {:?}", start.elapsed());
}

#[tokio::test]
async fn error_statuses() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    for path in ["/broken/", "/unauthorized/", "/no-such-endpoint/"] {
        let result = client.fetch(path, &Map::new(), None).await;
        assert_eq!(result, Err(Unavailable), "{path}");
    }

    assert_eq!(mock.requests().len(), 3);
}

#[tokio::test]
async fn malformed_bodies() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    for path in ["/garbage/", "/array/"] {
        let result = client.fetch(path, &Map::new(), None).await;
        assert_eq!(result, Err(Unavailable), "{path}");
    }
}

#[tokio::test]
async fn hostile_paths_make_no_request() {
    let mock = MockCourtListener::start().await;
    let client = upstream_client(&mock.base_url(), 100, Duration::from_secs(30));

    for path in ["/../../admin/", "courts/", "/courts/?q=x"] {
        let result = client.fetch(path, &Map::new(), None).await;
        assert_eq!(result, Err(Unavailable), "{path}");
    }

    assert!(mock.requests().is_empty());
}
