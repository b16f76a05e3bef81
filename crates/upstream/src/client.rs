use std::{collections::BTreeMap, sync::Arc, time::Duration};

use config::UpstreamConfig;
use guard::{Rejection, RequestGuard};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use url::Url;

use crate::{
    error::{FetchError, Unavailable},
    normalize::normalize,
};

const DEFAULT_USER_AGENT: &str = concat!("lexbridge/", env!("CARGO_PKG_VERSION"));

/// Client for the CourtListener REST API.
///
/// Holds one connection pool for the lifetime of the server.
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
    timeout: Duration,
    guard: Arc<RequestGuard>,
}

impl UpstreamClient {
    /// Creates a client that admits every call through `guard`.
    pub fn new(config: &UpstreamConfig, guard: Arc<RequestGuard>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;

        Ok(Self {
            http,
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            user_agent: config
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout: config.timeout,
            guard,
        })
    }

    /// Performs one `GET` against `path` with the raw tool arguments as query.
    ///
    /// The credential is checked and the caller's rate limit consumed before
    /// any network I/O. List responses are normalized, detail responses are
    /// returned as parsed.
    pub async fn fetch(
        &self,
        path: &str,
        params: &Map<String, Value>,
        credential: Option<&str>,
    ) -> Result<Value, Unavailable> {
        self.try_fetch(path, params, credential).await.map_err(|err| {
            log::warn!(kind = err.kind(), path = path; "Upstream call failed: {err}");
            Unavailable
        })
    }

    /// Like [`fetch`](Self::fetch), deserializing the normalized body.
    pub async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Map<String, Value>,
        credential: Option<&str>,
    ) -> Result<T, Unavailable> {
        let value = self.fetch(path, params, credential).await?;

        serde_json::from_value(value).map_err(|err| {
            let err = FetchError::Malformed(err);
            log::warn!(kind = err.kind(), path = path; "Upstream response has an unexpected shape: {err}");
            Unavailable
        })
    }

    async fn try_fetch(
        &self,
        path: &str,
        params: &Map<String, Value>,
        credential: Option<&str>,
    ) -> Result<Value, FetchError> {
        let admission = self.guard.admit(credential).map_err(|rejection| match rejection {
            Rejection::InvalidCredential => FetchError::InvalidCredential,
            Rejection::Throttled { identity, retry_after } => FetchError::Throttled { identity, retry_after },
        })?;

        let params = self.guard.sanitize_parameters(params);
        let url = build_url(&self.base_url, path, &params)?;

        log::debug!("Fetching '{path}' for {}", admission.identity);

        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.user_agent);

        if let Some(credential) = admission.credential {
            let mut value =
                HeaderValue::from_str(&format!("Token {credential}")).map_err(|_| FetchError::InvalidCredential)?;

            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();

            if !status.is_success() {
                return Err(FetchError::Rejected(status));
            }

            Ok::<_, FetchError>(response.bytes().await?)
        };

        // Dropping the exchange future aborts the in-flight request.
        let body = match tokio::time::timeout(self.timeout, exchange).await {
            Ok(body) => body?,
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        let value: Value = serde_json::from_slice(&body)?;

        if !value.is_object() {
            return Err(FetchError::NotAnObject);
        }

        Ok(normalize(value))
    }
}

/// Appends `path` to the base URL and every non-empty parameter as a query pair.
fn build_url(base_url: &str, path: &str, params: &BTreeMap<String, String>) -> Result<Url, FetchError> {
    if !path.starts_with('/') || path.split('/').any(|segment| segment == "..") {
        return Err(FetchError::InvalidPath);
    }

    let mut url = Url::parse(&format!("{base_url}{path}")).map_err(|_| FetchError::InvalidPath)?;

    if !url.as_str().starts_with(base_url) || url.query().is_some() || url.fragment().is_some() {
        return Err(FetchError::InvalidPath);
    }

    let mut present = params.iter().filter(|(_, value)| !value.is_empty()).peekable();

    if present.peek().is_some() {
        url.query_pairs_mut().extend_pairs(present);
    }

    Ok(url)
}
