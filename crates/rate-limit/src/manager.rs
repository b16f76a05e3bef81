//! Rate limit manager implementation.

use config::RateLimitConfig;
use jiff::Timestamp;

use crate::error::RateLimitError;
use crate::storage::{InMemoryStorage, RateLimitStorage};

/// Manager for the per-identity sliding-window limit.
///
/// Built once at startup and shared by reference with every tool invocation.
pub struct RateLimitManager<S = InMemoryStorage> {
    /// Rate limit configuration.
    config: RateLimitConfig,
    /// Storage backend.
    storage: S,
}

impl RateLimitManager {
    /// Create a new rate limit manager backed by in-memory storage.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_storage(config, InMemoryStorage::new())
    }
}

impl<S: RateLimitStorage> RateLimitManager<S> {
    /// Create a new rate limit manager with the given storage backend.
    pub fn with_storage(config: RateLimitConfig, storage: S) -> Self {
        Self { config, storage }
    }

    /// Check if rate limiting is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Decides admission for `identity` at `now_ms` milliseconds since the epoch.
    ///
    /// An admitted call is recorded in the window; a rejected one is not.
    pub fn is_allowed(&self, identity: &str, now_ms: i64) -> bool {
        self.check_at(identity, now_ms).is_ok()
    }

    /// Check the limit for `identity` against the current wall clock.
    pub fn check(&self, identity: &str) -> Result<(), RateLimitError> {
        self.check_at(identity, Timestamp::now().as_millisecond())
    }

    /// Check the limit for `identity` at an explicit point in time.
    pub fn check_at(&self, identity: &str, now_ms: i64) -> Result<(), RateLimitError> {
        if !self.is_enabled() {
            return Ok(());
        }

        let result = self
            .storage
            .check_and_consume(identity, self.config.limit, self.config.interval, now_ms);

        if !result.allowed {
            return Err(RateLimitError::LimitExceeded {
                identity: identity.to_string(),
                retry_after: result.retry_after.unwrap_or_default(),
            });
        }

        Ok(())
    }

    /// Number of identities with a window in memory.
    pub fn tracked_identities(&self) -> usize {
        self.storage.tracked_keys()
    }
}
