//! Fixed-window rate limiting for the relay endpoint.
//!
//! Counts requests per source IP in fixed time windows. A burst around a
//! window boundary can reach twice the nominal rate over a short span;
//! that approximation is part of the contract.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Configuration for rate limiting.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests allowed within one window.
    pub max_requests: u32,
    /// Window length.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Create a new rate limit configuration.
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(3600),
        }
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed.
    Allowed,
    /// Request is denied until the window resets.
    Denied {
        /// Time until the current window closes.
        retry_after: Duration,
    },
}

impl RateLimitResult {
    /// Check if the request is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

/// Request count within one fixed window.
#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window per-key rate limiter.
///
/// Increment-and-compare happens under a single write lock, so the
/// post-increment count each caller observes is linearizable per key.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    windows: RwLock<HashMap<String, Window>>,
}

impl FixedWindowLimiter {
    /// Create a new limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Record a request for a key and check it against the limit.
    ///
    /// Always counts the request; denial applies to the request itself
    /// when the post-increment count exceeds the maximum.
    pub fn check_and_record(&self, key: &str) -> RateLimitResult {
        let mut windows = self.windows.write().unwrap();
        let now = Instant::now();

        let window = windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            count: 0,
        });

        let elapsed = now.duration_since(window.started_at);
        if elapsed >= self.config.window {
            window.started_at = now;
            window.count = 0;
        }

        window.count += 1;
        if window.count > self.config.max_requests {
            let elapsed = now.duration_since(window.started_at);
            let retry_after = self.config.window.saturating_sub(elapsed);
            return RateLimitResult::Denied { retry_after };
        }

        RateLimitResult::Allowed
    }

    /// Remaining requests in the current window for a key.
    pub fn remaining(&self, key: &str) -> u32 {
        let windows = self.windows.read().unwrap();

        match windows.get(key) {
            Some(window) if window.started_at.elapsed() < self.config.window => {
                self.config.max_requests.saturating_sub(window.count)
            }
            _ => self.config.max_requests,
        }
    }

    /// Drop closed windows to free memory. Call periodically.
    pub fn cleanup(&self) {
        let mut windows = self.windows.write().unwrap();
        windows.retain(|_, w| w.started_at.elapsed() < self.config.window);
    }

    /// Start a background task that periodically evicts closed windows.
    pub fn start_cleanup_task(self: std::sync::Arc<Self>) {
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(300)).await;
                self.cleanup();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = FixedWindowLimiter::new(RateLimitConfig::new(3, 3600));

        assert!(limiter.check_and_record("1.2.3.4").is_allowed());
        assert!(limiter.check_and_record("1.2.3.4").is_allowed());
        assert!(limiter.check_and_record("1.2.3.4").is_allowed());
    }

    #[test]
    fn test_fourth_request_denied() {
        let limiter = FixedWindowLimiter::new(RateLimitConfig::new(3, 3600));

        for _ in 0..3 {
            assert!(limiter.check_and_record("1.2.3.4").is_allowed());
        }

        let result = limiter.check_and_record("1.2.3.4");
        match result {
            RateLimitResult::Denied { retry_after } => {
                assert!(retry_after <= Duration::from_secs(3600));
            }
            RateLimitResult::Allowed => panic!("expected Denied"),
        }
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = FixedWindowLimiter::new(RateLimitConfig::new(1, 3600));

        assert!(limiter.check_and_record("1.2.3.4").is_allowed());
        assert!(!limiter.check_and_record("1.2.3.4").is_allowed());
        assert!(limiter.check_and_record("5.6.7.8").is_allowed());
    }

    #[test]
    fn test_window_reset_allows_again() {
        let limiter = FixedWindowLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(40),
        });

        assert!(limiter.check_and_record("1.2.3.4").is_allowed());
        assert!(!limiter.check_and_record("1.2.3.4").is_allowed());

        std::thread::sleep(Duration::from_millis(50));

        // First request of the new window.
        assert!(limiter.check_and_record("1.2.3.4").is_allowed());
    }

    #[test]
    fn test_remaining() {
        let limiter = FixedWindowLimiter::new(RateLimitConfig::new(5, 3600));

        assert_eq!(limiter.remaining("1.2.3.4"), 5);
        limiter.check_and_record("1.2.3.4");
        limiter.check_and_record("1.2.3.4");
        assert_eq!(limiter.remaining("1.2.3.4"), 3);
    }

    #[test]
    fn test_cleanup_drops_closed_windows() {
        let limiter = FixedWindowLimiter::new(RateLimitConfig {
            max_requests: 1,
            window: Duration::from_millis(10),
        });

        limiter.check_and_record("1.2.3.4");
        std::thread::sleep(Duration::from_millis(20));
        limiter.cleanup();

        assert!(limiter.windows.read().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_increments_counted_once_each() {
        use std::sync::Arc;

        let limiter = Arc::new(FixedWindowLimiter::new(RateLimitConfig::new(100, 3600)));
        let mut handles = Vec::new();

        for _ in 0..8 {
            let limiter = limiter.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..10 {
                    limiter.check_and_record("1.2.3.4");
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(limiter.remaining("1.2.3.4"), 20);
    }
}
