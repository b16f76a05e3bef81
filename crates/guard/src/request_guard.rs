use std::{collections::BTreeMap, sync::Arc, time::Duration};

use config::SanitizationConfig;
use rate_limit::{RateLimitError, RateLimitManager};
use serde_json::{Map, Value};

use crate::{
    credential::validate_credential, identity::ClientIdentity, parameters::sanitize_parameter_set_with_limit,
    sanitize::sanitize_with_limit,
};

/// A call that passed the credential and rate limit gates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission<'a> {
    /// The rate limiter key the call was counted against.
    pub identity: ClientIdentity,
    /// The validated credential, `None` for anonymous calls.
    pub credential: Option<&'a str>,
}

/// Why a call was not admitted.
#[derive(Debug, thiserror::Error)]
pub enum Rejection {
    /// The credential is not 40 lowercase hexadecimal characters.
    #[error("invalid credential format")]
    InvalidCredential,
    /// The identity used its quota for the current window.
    #[error("rate limit exceeded for {identity}")]
    Throttled {
        /// The throttled identity.
        identity: ClientIdentity,
        /// Time until the oldest call in the window expires.
        retry_after: Duration,
    },
}

/// Gates every upstream call behind credential validation, rate limiting and
/// parameter sanitization.
pub struct RequestGuard {
    rate_limits: Arc<RateLimitManager>,
    max_length: usize,
}

impl RequestGuard {
    /// Creates a guard around a shared rate limit manager.
    pub fn new(rate_limits: Arc<RateLimitManager>, sanitization: &SanitizationConfig) -> Self {
        Self {
            rate_limits,
            max_length: sanitization.max_length,
        }
    }

    /// Admits a call at the current wall-clock time.
    pub fn admit<'a>(&self, credential: Option<&'a str>) -> Result<Admission<'a>, Rejection> {
        self.admit_with(credential, |identity| self.rate_limits.check(identity))
    }

    /// Admits a call at `now_ms` milliseconds since the epoch.
    pub fn admit_at<'a>(&self, credential: Option<&'a str>, now_ms: i64) -> Result<Admission<'a>, Rejection> {
        self.admit_with(credential, |identity| self.rate_limits.check_at(identity, now_ms))
    }

    fn admit_with<'a>(
        &self,
        credential: Option<&'a str>,
        check: impl FnOnce(&str) -> Result<(), RateLimitError>,
    ) -> Result<Admission<'a>, Rejection> {
        if !validate_credential(credential) {
            return Err(Rejection::InvalidCredential);
        }

        let credential = credential.filter(|c| !c.is_empty());
        let identity = ClientIdentity::from_credential(credential);

        check(identity.as_str()).map_err(|err| Rejection::Throttled {
            retry_after: err.retry_after(),
            identity: identity.clone(),
        })?;

        Ok(Admission { identity, credential })
    }

    /// Sanitizes a single string with the configured ceiling.
    pub fn sanitize(&self, raw: &str) -> String {
        sanitize_with_limit(raw, self.max_length)
    }

    /// Sanitizes a tool argument map with the configured ceiling.
    pub fn sanitize_parameters(&self, raw: &Map<String, Value>) -> BTreeMap<String, String> {
        sanitize_parameter_set_with_limit(raw, self.max_length)
    }

    /// The shared rate limit manager.
    pub fn rate_limits(&self) -> &RateLimitManager {
        &self.rate_limits
    }
}
