//! A stand-in for the CourtListener REST API.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const PREFIX: &str = "/api/rest/v4";

/// One request as seen by the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// Path below `/api/rest/v4`.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    /// The `Authorization` header, if any.
    pub authorization: Option<String>,
    /// The `User-Agent` header, if any.
    pub user_agent: Option<String>,
    /// The `Accept` header, if any.
    pub accept: Option<String>,
}

/// Mock CourtListener listening on an ephemeral port.
///
/// Fixed routes:
/// - `/courts/scotus/`: a court detail object
/// - `/courts/`: a court list whose `count` is not a number
/// - `/search/`: one opinion search result
/// - `/courts/broken/`, `/broken/`: HTTP 500
/// - `/unauthorized/`: HTTP 401
/// - `/garbage/`: a body that is not JSON
/// - `/array/`: a JSON array
/// - `/slow/`: answers after ten seconds
pub struct MockCourtListener {
    address: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockCourtListener {
    /// Binds the mock and serves it in the background.
    pub async fn start() -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new().fallback(respond).with_state(requests.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, requests }
    }

    /// The value for `upstream.base_url`.
    pub fn base_url(&self) -> String {
        format!("http://{}{PREFIX}", self.address)
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Body served for `/courts/scotus/`.
pub fn scotus() -> Value {
    json!({
        "resource_uri": "https://www.courtlistener.com/api/rest/v4/courts/scotus/",
        "id": "scotus",
        "pacer_court_id": null,
        "full_name": "Supreme Court of the United States",
        "short_name": "Supreme Court",
        "jurisdiction": "F",
        "citation_string": "SCOTUS",
        "in_use": true,
        "start_date": "1789-09-24",
        "end_date": null,
        "url": "http://supremecourt.gov/",
    })
}

fn ninth_circuit() -> Value {
    json!({
        "id": "ca9",
        "full_name": "Court of Appeals for the Ninth Circuit",
        "jurisdiction": "F",
        "in_use": true,
    })
}

fn search_results() -> Value {
    json!({
        "count": 1,
        "next": null,
        "previous": null,
        "results": [{
            "caseName": "Miranda v. Arizona",
            "court": "Supreme Court of the United States",
            "dateFiled": "1966-06-13",
            "citation": ["384 U.S. 436"],
            "absolute_url": "/opinion/107252/miranda-v-arizona/",
        }],
    })
}

async fn respond(
    State(requests): State<Arc<Mutex<Vec<RecordedRequest>>>>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let path = uri.path().strip_prefix(PREFIX).unwrap_or(uri.path()).to_string();

    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    requests.lock().unwrap().push(RecordedRequest {
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        user_agent: header_value(header::USER_AGENT),
        accept: header_value(header::ACCEPT),
    });

    match path.as_str() {
        "/courts/scotus/" => Json(scotus()).into_response(),
        "/courts/" => Json(json!({
            "count": "lots",
            "next": 42,
            "previous": null,
            "results": [scotus(), ninth_circuit()],
        }))
        .into_response(),
        "/search/" => Json(search_results()).into_response(),
        "/courts/broken/" | "/broken/" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "/unauthorized/" => (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid token." }))).into_response(),
        "/garbage/" => ([(header::CONTENT_TYPE, "application/json")], "{\"count\": ").into_response(),
        "/array/" => Json(json!([1, 2, 3])).into_response(),
        "/slow/" => {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(scotus()).into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response(),
    }
}
