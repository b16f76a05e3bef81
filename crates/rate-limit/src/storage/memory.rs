//! In-memory sliding-window log.

use std::collections::VecDeque;
use std::time::Duration;

use dashmap::DashMap;

use super::{RateLimitResult, RateLimitStorage};

/// In-memory rate limit storage implementation.
///
/// Each key owns a chronologically ordered list of admitted call times in
/// milliseconds. Expired entries are only pruned when the key is checked
/// again, so an idle key keeps its last window in memory.
#[derive(Default)]
pub struct InMemoryStorage {
    windows: DashMap<String, VecDeque<i64>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage instance.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateLimitStorage for InMemoryStorage {
    fn check_and_consume(&self, key: &str, limit: u32, window: Duration, now_ms: i64) -> RateLimitResult {
        let window_ms = i64::try_from(window.as_millis()).unwrap_or(i64::MAX);

        // The entry guard holds the shard lock for the whole evict, count and
        // record sequence.
        let mut timestamps = self.windows.entry(key.to_string()).or_default();

        // A wall clock stepping backwards must not break the ordering of the log.
        let now_ms = timestamps.back().map_or(now_ms, |&newest| now_ms.max(newest));

        while let Some(&oldest) = timestamps.front() {
            if now_ms.saturating_sub(oldest) < window_ms {
                break;
            }

            timestamps.pop_front();
        }

        if timestamps.len() >= limit as usize {
            let oldest = timestamps.front().copied().unwrap_or(now_ms);
            let wait_ms = oldest.saturating_add(window_ms).saturating_sub(now_ms).max(0);
            let retry_after = Duration::from_millis(u64::try_from(wait_ms).unwrap_or_default());

            log::debug!("Request blocked for key '{key}' - rate limit exceeded, retry after {retry_after:?}");

            return RateLimitResult {
                allowed: false,
                retry_after: Some(retry_after),
            };
        }

        timestamps.push_back(now_ms);

        log::debug!(
            "Request allowed for key '{key}' - {} of {limit} calls used in window",
            timestamps.len()
        );

        RateLimitResult {
            allowed: true,
            retry_after: None,
        }
    }

    fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
