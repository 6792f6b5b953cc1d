//! Client-side request throttling
//!
//! Basecamp allows 50 requests per 10 seconds per access token and answers
//! 429 beyond that. A governor token bucket keeps the CLI under the quota
//! so long `--all-pages` runs rarely see a 429 at all.

use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as Governor};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Request quota: `max_requests` per `period`, with up to `burst` at once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    pub max_requests: u32,
    pub period: Duration,
    pub burst: u32,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 50,
            period: Duration::from_secs(10),
            burst: 10,
        }
    }
}

impl RateLimiterConfig {
    /// `max_requests` per `period`, bursting up to `max_requests`
    pub fn new(max_requests: u32, period: Duration) -> Self {
        Self {
            max_requests,
            period,
            burst: max_requests,
        }
    }

    pub fn with_burst(mut self, burst: u32) -> Self {
        self.burst = burst;
        self
    }

    /// Time for one request slot to refill
    pub fn replenish_interval(&self) -> Duration {
        self.period / self.max_requests.max(1)
    }

    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.burst).unwrap_or(NonZeroU32::MIN);
        Quota::with_period(self.replenish_interval())
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
            .allow_burst(burst)
    }
}

/// Token bucket shared by every request of one client
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<Governor<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimiterConfig) -> Self {
        Self {
            limiter: Arc::new(Governor::direct(config.quota())),
        }
    }

    /// Wait until a request can be made
    pub async fn wait(&self) {
        self.limiter.until_ready().await;
    }

    /// Take a slot if one is free, without waiting
    pub fn try_acquire(&self) -> bool {
        self.limiter.check().is_ok()
    }

    /// Wait for a slot, giving up after `timeout`
    pub async fn wait_with_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.limiter.until_ready())
            .await
            .is_ok()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(&RateLimiterConfig::default())
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter").finish()
    }
}
