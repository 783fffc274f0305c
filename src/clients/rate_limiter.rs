//! Proactive pacing from observed call limits.
//!
//! Every response that carries `X-Shopify-Shop-Api-Call-Limit` is recorded in
//! a [`RateLimiter`] shared by all calls of one client. When a
//! [`PacingPolicy`] is configured, each attempt first checks the latest
//! observation and waits if the bucket is (nearly) full.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::clients::http_response::ApiCallLimit;

/// Default pause applied when the bucket is full.
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_millis(500);

/// When and how long to pause before dispatching.
///
/// A call is delayed when `used + headroom >= limit` for the most recent
/// observation.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_client::{ApiCallLimit, PacingPolicy};
///
/// let policy = PacingPolicy::new(2, Duration::from_millis(250));
/// assert!(policy.should_pause(ApiCallLimit { used: 38, limit: 40 }));
/// assert!(!policy.should_pause(ApiCallLimit { used: 37, limit: 40 }));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacingPolicy {
    headroom: u32,
    delay: Duration,
}

impl PacingPolicy {
    /// Creates a policy pausing `delay` once at most `headroom` calls remain.
    #[must_use]
    pub const fn new(headroom: u32, delay: Duration) -> Self {
        Self { headroom, delay }
    }

    /// A pause is triggered once remaining calls drop to this margin.
    #[must_use]
    pub const fn headroom(&self) -> u32 {
        self.headroom
    }

    /// Pause length.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` if a call observed at `limit` should be paced.
    #[must_use]
    pub const fn should_pause(&self, limit: ApiCallLimit) -> bool {
        limit.used.saturating_add(self.headroom) >= limit.limit
    }
}

impl Default for PacingPolicy {
    /// Pause 500 ms once the bucket is full (e.g. `40/40`).
    fn default() -> Self {
        Self::new(0, DEFAULT_PACING_DELAY)
    }
}

/// Latest call-limit observation shared across concurrent calls.
///
/// Cloning is cheap and clones share state.
#[derive(Clone, Debug, Default)]
pub struct RateLimiter {
    last: Arc<RwLock<Option<ApiCallLimit>>>,
}

impl RateLimiter {
    /// Creates a limiter with no observation.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an observation. `None` leaves the previous one in place.
    pub fn observe(&self, limit: Option<ApiCallLimit>) {
        let Some(limit) = limit else {
            return;
        };
        // Writes are a single Copy assignment, so a poisoned value is still whole
        let mut guard = self
            .last
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = Some(limit);
    }

    /// Returns the most recent observation.
    #[must_use]
    pub fn last(&self) -> Option<ApiCallLimit> {
        *self
            .last
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Returns the pause `policy` requires given the latest observation.
    #[must_use]
    pub fn required_delay(&self, policy: &PacingPolicy) -> Option<Duration> {
        self.last()
            .filter(|limit| policy.should_pause(*limit))
            .map(|_| policy.delay())
    }

    /// Waits if `policy` says the bucket is too full.
    pub async fn pace(&self, policy: &PacingPolicy) {
        if let Some(delay) = self.required_delay(policy) {
            tracing::debug!(
                "Call limit {:?} reached, pausing {:?} before dispatch",
                self.last(),
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}
