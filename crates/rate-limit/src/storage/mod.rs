//! Storage backends for rate limiting.

use std::time::Duration;

pub mod memory;

pub use memory::InMemoryStorage;

/// Result type for rate limit checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitResult {
    /// Whether the request is allowed.
    pub allowed: bool,
    /// Time to wait before retrying if not allowed.
    pub retry_after: Option<Duration>,
}

/// Trait for rate limit storage backends.
///
/// Implementations must make the evict, count and record steps for one key
/// atomic with respect to concurrent checks of the same key.
pub trait RateLimitStorage: Send + Sync {
    /// Evicts expired entries for `key`, then admits and records the call at
    /// `now_ms` if fewer than `limit` calls remain inside the window.
    fn check_and_consume(&self, key: &str, limit: u32, window: Duration, now_ms: i64) -> RateLimitResult;

    /// Number of keys currently holding state.
    fn tracked_keys(&self) -> usize;
}
