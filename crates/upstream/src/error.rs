use std::time::Duration;

use guard::ClientIdentity;
use http::StatusCode;

/// The single failure signal of the upstream client.
///
/// Carries no detail on purpose: every failure cause looks the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("could not retrieve data")]
pub struct Unavailable;

/// Why an upstream call failed. Only ever logged.
#[derive(Debug, thiserror::Error)]
pub(crate) enum FetchError {
    #[error("invalid credential format")]
    InvalidCredential,
    #[error("rate limit exceeded for {identity}, retry after {retry_after:?}")]
    Throttled {
        identity: ClientIdentity,
        retry_after: Duration,
    },
    #[error("invalid upstream path")]
    InvalidPath,
    #[error("network error: {0}")]
    Unreachable(reqwest::Error),
    #[error("timeout after {0:?}")]
    Timeout(Duration),
    #[error("{}", describe_status(.0))]
    Rejected(StatusCode),
    #[error("response body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response body is not a JSON object")]
    NotAnObject,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            // reqwest only reports its own timeouts, which we do not configure,
            // but a connector may still surface one.
            return Self::Timeout(Duration::ZERO);
        }

        Self::Unreachable(err.without_url())
    }
}

impl FetchError {
    /// Local taxonomy bucket, used as a log field.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredential | Self::InvalidPath => "input_rejected",
            Self::Throttled { .. } => "throttled",
            Self::Unreachable(_) => "upstream_unreachable",
            Self::Timeout(_) => "upstream_timeout",
            Self::Rejected(_) => "upstream_rejected",
            Self::Malformed(_) | Self::NotAnObject => "upstream_malformed",
        }
    }
}

fn describe_status(status: &StatusCode) -> String {
    let code = status.as_u16();

    match *status {
        StatusCode::UNAUTHORIZED => format!("authentication failed ({code})"),
        StatusCode::TOO_MANY_REQUESTS => format!("rate limited by upstream ({code})"),
        status if status.is_server_error() => format!("upstream server error ({code})"),
        _ => format!("upstream returned status {code}"),
    }
}
