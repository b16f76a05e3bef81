//! CourtListener API settings.

use std::time::Duration;

use duration_str::deserialize_duration;
use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// The public CourtListener REST API.
pub const DEFAULT_BASE_URL: &str = "https://www.courtlistener.com/api/rest/v4";

/// Settings for the outbound CourtListener client.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL every tool path is appended to.
    pub base_url: Url,
    /// API token sent as `Authorization: Token <key>` when a caller supplies none.
    pub api_key: Option<SecretString>,
    /// Upper bound on the wall-clock duration of one upstream exchange.
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
    /// Overrides the `User-Agent` header.
    pub user_agent: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            api_key: None,
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}
