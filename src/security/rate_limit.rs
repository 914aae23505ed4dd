//! Rate limiting.
//!
//! In-memory sliding-window limiter, constructed once per process and
//! injected as a stateful collaborator. Single-writer-per-key discipline is
//! enough here: clients are per-user and there is no cross-process state.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::config::SecurityConfig;

/// Rate limit decision
#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed,
    /// Request is rejected
    Limited {
        /// Seconds until a retry can succeed
        retry_after: u64,
    },
}

/// In-memory sliding window rate limiter
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// Maximum requests per window per client
    max_requests: u32,
    /// Window size
    window: Duration,
    /// Request history (client -> timestamps inside the window)
    request_history: Arc<RwLock<HashMap<String, Vec<DateTime<Utc>>>>>,
    /// Whether limiting is enabled
    enabled: bool,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(max_requests: u32, window_size_seconds: u64, enabled: bool) -> Self {
        Self {
            max_requests,
            window: Duration::seconds(window_size_seconds as i64),
            request_history: Arc::new(RwLock::new(HashMap::new())),
            enabled,
        }
    }

    /// Create a limiter from the security configuration
    pub fn from_config(config: &SecurityConfig) -> Self {
        Self::new(
            config.requests_per_minute,
            config.window_size_seconds,
            config.rate_limit_enabled,
        )
    }

    /// Create a disabled development limiter
    pub fn development() -> Self {
        Self::new(100, 60, false)
    }

    /// Record a request for a client and decide whether it is allowed
    pub async fn check(&self, client_id: &str) -> RateLimitResult {
        if !self.enabled {
            return RateLimitResult::Allowed;
        }

        let now = Utc::now();
        let window_start = now - self.window;

        let mut history = self.request_history.write().await;
        let timestamps = history.entry(client_id.to_string()).or_default();
        timestamps.retain(|t| *t > window_start);

        if timestamps.len() >= self.max_requests as usize {
            let retry_after = timestamps
                .first()
                .map(|oldest| {
                    let reopens = *oldest + self.window;
                    (reopens - now).num_seconds().max(0) as u64
                })
                .unwrap_or(0);

            tracing::warn!("rate limit hit for client {}", client_id);
            return RateLimitResult::Limited { retry_after };
        }

        timestamps.push(now);
        RateLimitResult::Allowed
    }

    /// Drop clients with no requests inside the current window
    pub async fn prune(&self) {
        let window_start = Utc::now() - self.window;
        let mut history = self.request_history.write().await;
        history.retain(|_, timestamps| timestamps.iter().any(|t| *t > window_start));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allows_burst_below_limit() {
        let limiter = RateLimiter::new(3, 60, true);
        for _ in 0..3 {
            assert_eq!(limiter.check("user_1").await, RateLimitResult::Allowed);
        }
    }

    #[tokio::test]
    async fn test_rejects_beyond_limit_with_retry_hint() {
        let limiter = RateLimiter::new(2, 60, true);
        limiter.check("user_1").await;
        limiter.check("user_1").await;

        match limiter.check("user_1").await {
            RateLimitResult::Limited { retry_after } => assert!(retry_after <= 60),
            RateLimitResult::Allowed => panic!("expected the third request to be limited"),
        }
    }

    #[tokio::test]
    async fn test_clients_are_isolated() {
        let limiter = RateLimiter::new(1, 60, true);
        assert_eq!(limiter.check("user_1").await, RateLimitResult::Allowed);
        assert_eq!(limiter.check("user_2").await, RateLimitResult::Allowed);
        assert!(matches!(
            limiter.check("user_1").await,
            RateLimitResult::Limited { .. }
        ));
    }

    #[tokio::test]
    async fn test_disabled_limiter_always_allows() {
        let limiter = RateLimiter::new(1, 60, false);
        for _ in 0..10 {
            assert_eq!(limiter.check("user_1").await, RateLimitResult::Allowed);
        }
    }

    #[tokio::test]
    async fn test_prune_drops_idle_clients() {
        let limiter = RateLimiter::new(5, 60, true);
        limiter.check("user_1").await;
        limiter.prune().await;
        assert_eq!(limiter.request_history.read().await.len(), 1);
    }
}
