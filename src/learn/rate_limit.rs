//! Fixed-window request limiter keyed by client address.
//!
//! Expired windows are swept at most once per window length, from inside
//! `check`, so the map only holds clients seen during the last window or two.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::config::LearnConfig;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Per-client fixed-window counter.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    last_sweep: Arc<Mutex<Instant>>,
    window: Duration,
    max: u32,
}

impl RateLimiter {
    pub fn new(window: Duration, max: u32) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
            window,
            max,
        }
    }

    pub fn from_config(config: &LearnConfig) -> Self {
        Self::new(
            Duration::from_secs(config.rate_limit_window_secs),
            config.rate_limit_max,
        )
    }

    /// Counts one request; `false` once the client is over the limit.
    pub fn check(&self, client: &str) -> bool {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> bool {
        // before taking the entry: the sweep locks every shard
        self.sweep_if_due(now);

        let mut entry = self.windows.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.saturating_duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        entry.count = entry.count.saturating_add(1);
        entry.count <= self.max
    }

    /// Drops windows that have already expired.
    pub fn purge_expired(&self) {
        self.purge_expired_at(Instant::now());
    }

    fn purge_expired_at(&self, now: Instant) {
        self.windows
            .retain(|_, w| now.saturating_duration_since(w.started) < self.window);
    }

    /// Purges once a full window has passed since the previous sweep.
    /// A sweep already running elsewhere is not waited for.
    fn sweep_if_due(&self, now: Instant) {
        let Ok(mut last) = self.last_sweep.try_lock() else {
            return;
        };
        if now.saturating_duration_since(*last) < self.window {
            return;
        }
        *last = now;
        drop(last);

        let before = self.windows.len();
        self.purge_expired_at(now);
        tracing::trace!(
            "Rate limiter sweep: {} -> {} clients",
            before,
            self.windows.len()
        );
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let now = Instant::now();
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(limiter.check_at("1.2.3.4", now));
        assert!(!limiter.check_at("1.2.3.4", now));
    }

    #[test]
    fn test_clients_are_independent() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();
        assert!(limiter.check_at("a", now));
        assert!(!limiter.check_at("a", now));
        assert!(limiter.check_at("b", now));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_window_resets() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        assert!(limiter.check_at("a", start));
        assert!(!limiter.check_at("a", start + Duration::from_secs(59)));
        assert!(limiter.check_at("a", start + Duration::from_secs(60)));
    }

    #[test]
    fn test_purge_expired() {
        let limiter = RateLimiter::new(Duration::from_millis(0), 5);
        limiter.check("a");
        limiter.purge_expired();
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_check_sweeps_expired_clients() {
        let limiter = RateLimiter::new(Duration::from_millis(1), 5);
        for i in 0..1000 {
            limiter.check(&format!("10.0.{}.{}", i / 256, i % 256));
        }

        std::thread::sleep(Duration::from_millis(5));
        assert!(limiter.check("192.168.0.1"));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_sweep_keeps_live_windows() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        assert!(limiter.check_at("old", start));
        assert!(limiter.check_at("recent", start + Duration::from_secs(50)));

        // the sweep at +70s drops "old" but keeps "recent" and its count
        assert!(!limiter.check_at("recent", start + Duration::from_secs(70)));
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_from_config() {
        let limiter = RateLimiter::from_config(&LearnConfig::default());
        for _ in 0..30 {
            assert!(limiter.check("c"));
        }
        assert!(!limiter.check("c"));
    }
}
