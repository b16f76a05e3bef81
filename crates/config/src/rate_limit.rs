//! Rate limiting configuration structures.

use duration_str::deserialize_duration;
use serde::Deserialize;
use std::time::Duration;

/// Sliding-window rate limit applied per client identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Whether rate limiting is enabled.
    pub enabled: bool,
    /// Maximum number of admitted calls within the window.
    pub limit: u32,
    /// Length of the sliding window.
    #[serde(deserialize_with = "deserialize_duration")]
    pub interval: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 100,
            interval: Duration::from_secs(60),
        }
    }
}
