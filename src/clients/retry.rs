//! Bounded retry-on-throttle around the dispatcher.
//!
//! One `invoke` call moves through these states:
//!
//! ```text
//! Attempting --2xx--------------------------> Succeeded
//! Attempting --429, attempts < max---------> Retrying --delay--> Attempting
//! Attempting --429, attempts >= max--------> Failed(RetryExhausted)
//! Attempting --any other error-------------> Failed(error)
//! ```
//!
//! Only 429 is retried. Transport errors and every other status are
//! returned to the caller untouched.

use std::future::Future;
use std::time::Duration;

use serde_json::Value;

use crate::clients::dispatcher::RequestDispatcher;
use crate::clients::errors::{ApiError, RetryExhaustedError};
use crate::clients::http_request::{HttpMethod, RequestSpec};
use crate::clients::http_response::ApiResponse;
use crate::clients::rate_limiter::{PacingPolicy, RateLimiter};
use crate::error::ConfigError;

/// Status code signalling the caller exceeded its request budget.
pub const THROTTLED_STATUS: u16 = 429;

/// Default number of attempts per logical call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default fixed delay between a throttled attempt and the next one.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Fixed-delay retry policy for throttled responses.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use shopify_client::RetryPolicy;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.max_attempts(), 5);
/// assert_eq!(policy.delay(), Duration::from_millis(500));
///
/// assert!(RetryPolicy::new(0, Duration::from_millis(500)).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy allowing `max_attempts` attempts, `delay` apart.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRetryPolicy`] if `max_attempts` is zero.
    pub fn new(max_attempts: u32, delay: Duration) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidRetryPolicy {
                reason: "max_attempts must be at least 1".to_string(),
            });
        }
        Ok(Self {
            max_attempts,
            delay,
        })
    }

    /// Total attempts allowed, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay between a throttled attempt and the next.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `attempt` until it succeeds, fails with something other than a
    /// 429, or the attempt ceiling is reached.
    ///
    /// `attempt` receives the 1-based attempt number.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::RetryExhausted`] when every attempt was throttled,
    /// otherwise the first non-429 error unchanged.
    pub async fn run<F, Fut, T>(&self, mut attempt: F) -> Result<T, ApiError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;

            let error = match attempt(attempts).await {
                Err(ApiError::Http(error)) if error.code == THROTTLED_STATUS => error,
                other => return other,
            };

            if attempts >= self.max_attempts {
                tracing::warn!(
                    "Still throttled after {} attempts, giving up",
                    attempts
                );
                return Err(RetryExhaustedError {
                    attempts,
                    code: error.code,
                    body: error.body,
                    error_reference: error.error_reference,
                }
                .into());
            }

            tracing::warn!(
                "Throttled (attempt {}/{}), retrying in {:?}",
                attempts,
                self.max_attempts,
                self.delay
            );
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Wraps a [`RequestDispatcher`] with retry-on-429 and optional pacing.
///
/// Every attempt of one `invoke` sends the same [`RequestSpec`]; nothing is
/// mutated between retries.
#[derive(Debug)]
pub struct RetryingInvoker {
    dispatcher: RequestDispatcher,
    policy: RetryPolicy,
    pacing: Option<PacingPolicy>,
    limiter: RateLimiter,
}

impl RetryingInvoker {
    /// Creates an invoker.
    #[must_use]
    pub fn new(
        dispatcher: RequestDispatcher,
        policy: RetryPolicy,
        pacing: Option<PacingPolicy>,
    ) -> Self {
        Self {
            dispatcher,
            policy,
            pacing,
            limiter: RateLimiter::new(),
        }
    }

    /// Returns the wrapped dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &RequestDispatcher {
        &self.dispatcher
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns the shared call-limit state.
    #[must_use]
    pub const fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Builds a [`RequestSpec`] and invokes it.
    ///
    /// # Errors
    ///
    /// See [`invoke_spec`](Self::invoke_spec).
    pub async fn invoke(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Value,
    ) -> Result<ApiResponse, ApiError> {
        let spec = RequestSpec::new(method, path).payload(payload);
        self.invoke_spec(&spec).await
    }

    /// Sends the request, retrying while the API answers 429.
    ///
    /// # Errors
    ///
    /// - [`ApiError::RetryExhausted`] if every allowed attempt was throttled
    /// - [`ApiError::Http`] for any other non-2xx status, on first occurrence
    /// - [`ApiError::Transport`] and [`ApiError::InvalidRequest`] unchanged
    pub async fn invoke_spec(&self, spec: &RequestSpec) -> Result<ApiResponse, ApiError> {
        self.policy.run(|_| self.attempt(spec)).await
    }

    async fn attempt(&self, spec: &RequestSpec) -> Result<ApiResponse, ApiError> {
        if let Some(pacing) = &self.pacing {
            self.limiter.pace(pacing).await;
        }

        let result = self.dispatcher.send(spec).await;
        match &result {
            Ok(response) => self.limiter.observe(response.api_call_limit),
            Err(ApiError::Http(error)) => self.limiter.observe(error.api_call_limit),
            Err(_) => {}
        }
        result
    }
}
