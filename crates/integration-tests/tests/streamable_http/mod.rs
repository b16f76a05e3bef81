//! Tool calls over streamable HTTP, through the server, to the mock CourtListener.

use indoc::formatdoc;
use integration_tests::{API_KEY, MockCourtListener, TestServer, result_text};
use rmcp::ServiceError;
use serde_json::json;

const UNAVAILABLE: &str = "Could not retrieve data from CourtListener. Please try again later.";

fn config(mock: &MockCourtListener, extra: &str) -> String {
    formatdoc! {r#"
        [upstream]
        base_url = "{}"

        {extra}
    "#, mock.base_url()}
}

#[tokio::test]
async fn lists_courtlistener_tools() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client("/mcp").await;

    let tools = client.list_tools().await;
    let names = tools.tools.iter().map(|tool| tool.name.as_ref()).collect::<Vec<&str>>();

    insta::assert_debug_snapshot!(names, @r#"
    [
        "search_opinions",
        "search_oral_arguments",
        "search_dockets",
        "get_opinion",
        "get_cluster",
        "get_docket",
        "list_courts",
        "get_court",
        "search_judges",
        "get_judge",
    ]
    "#);

    client.disconnect().await;
}

#[tokio::test]
async fn get_court() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client("/mcp").await;

    let result = client.call_tool("get_court", json!({ "id": "scotus" })).await;

    assert_ne!(result.is_error, Some(true));
    insta::assert_snapshot!(result_text(&result), @r"
    Supreme Court of the United States
    ID: scotus
    Short name: Supreme Court
    Jurisdiction: F
    Citation: SCOTUS
    In use: yes
    Founded: 1789-09-24
    Website: http://supremecourt.gov/
    ");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/courts/scotus/");
    assert_eq!(requests[0].authorization, None);

    client.disconnect().await;
}

#[tokio::test]
async fn search_opinions() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client("/mcp").await;

    let result = client
        .call_tool("search_opinions", json!({ "q": "miranda <script>", "court": "scotus" }))
        .await;

    insta::assert_snapshot!(result_text(&result), @r"
    Found 1 result.

    1. Miranda v. Arizona
       Court: Supreme Court of the United States
       Filed: 1966-06-13
       Citations: 384 U.S. 436
       Link: https://www.courtlistener.com/opinion/107252/miranda-v-arizona/
    ");

    let request = &mock.requests()[0];
    assert_eq!(request.path, "/search/");
    assert_eq!(request.query.as_deref(), Some("court=scotus&q=miranda+script&type=o"));

    client.disconnect().await;
}

#[tokio::test]
async fn upstream_failure_is_a_generic_error_result() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client("/mcp").await;

    let result = client.call_tool("get_court", json!({ "id": "broken" })).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result_text(&result), UNAVAILABLE);

    client.disconnect().await;
}

#[tokio::test]
async fn bearer_token_is_forwarded() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client_with_bearer("/mcp", API_KEY).await;

    client.call_tool("get_court", json!({ "id": "scotus" })).await;

    let authorization = mock.requests()[0].authorization.clone();
    assert_eq!(authorization, Some(format!("Token {API_KEY}")));

    client.disconnect().await;
}

#[tokio::test]
async fn malformed_bearer_token_is_unavailable() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client_with_bearer("/mcp", "not-a-courtlistener-key").await;

    let result = client.call_tool("get_court", json!({ "id": "scotus" })).await;

    assert_eq!(result.is_error, Some(true));
    assert_eq!(result_text(&result), UNAVAILABLE);
    assert!(mock.requests().is_empty());

    client.disconnect().await;
}

#[tokio::test]
async fn configured_api_key_is_used() {
    let mock = MockCourtListener::start().await;

    let config = formatdoc! {r#"
        [upstream]
        base_url = "{}"
        api_key = "{API_KEY}"
    "#, mock.base_url()};

    let server = TestServer::start(&config).await;
    let client = server.mcp_client("/mcp").await;

    client.call_tool("list_courts", json!({})).await;

    let request = &mock.requests()[0];
    assert_eq!(request.path, "/courts/");
    assert_eq!(request.authorization, Some(format!("Token {API_KEY}")));

    client.disconnect().await;
}

#[tokio::test]
async fn rate_limit_applies_per_caller() {
    let mock = MockCourtListener::start().await;

    let extra = formatdoc! {r#"
        [rate_limits]
        limit = 1
        interval = "60s"
    "#};

    let server = TestServer::start(&config(&mock, &extra)).await;
    let client = server.mcp_client("/mcp").await;

    let first = client.call_tool("get_court", json!({ "id": "scotus" })).await;
    assert_ne!(first.is_error, Some(true));

    let second = client.call_tool("get_court", json!({ "id": "scotus" })).await;
    assert_eq!(second.is_error, Some(true));
    assert_eq!(result_text(&second), UNAVAILABLE);

    // A different credential is a different caller.
    let other = server.mcp_client_with_bearer("/mcp", API_KEY).await;
    let third = other.call_tool("get_court", json!({ "id": "scotus" })).await;
    assert_ne!(third.is_error, Some(true));

    assert_eq!(mock.requests().len(), 2);

    client.disconnect().await;
    other.disconnect().await;
}

#[tokio::test]
async fn unknown_tool() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client("/mcp").await;

    let error = client.call_tool_expect_error("delete_everything", json!({})).await;

    match error {
        ServiceError::McpError(error) => {
            assert_eq!(error.code, rmcp::model::ErrorCode::INVALID_PARAMS);
            assert_eq!(error.message, "Unknown tool 'delete_everything'");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    client.disconnect().await;
}

#[tokio::test]
async fn invalid_arguments() {
    let mock = MockCourtListener::start().await;
    let server = TestServer::start(&config(&mock, "")).await;
    let client = server.mcp_client("/mcp").await;

    let error = client.call_tool_expect_error("get_opinion", json!({ "id": "../admin" })).await;

    match error {
        ServiceError::McpError(error) => assert_eq!(error.code, rmcp::model::ErrorCode::INVALID_PARAMS),
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(mock.requests().is_empty());

    client.disconnect().await;
}
