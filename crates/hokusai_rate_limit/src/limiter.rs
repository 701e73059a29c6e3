//! Requests-per-minute pacing using governor.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::trace;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Optional pacing of outgoing generation requests.
///
/// Cloning shares the underlying quota. An unlimited limiter never waits.
///
/// # Examples
///
/// ```
/// use hokusai_rate_limit::RequestLimiter;
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = RequestLimiter::new(Some(60));
/// limiter.acquire().await;
/// assert!(limiter.is_limited());
///
/// assert!(!RequestLimiter::unlimited().is_limited());
/// # }
/// ```
#[derive(Clone, Default)]
pub struct RequestLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("limited", &self.is_limited())
            .finish()
    }
}

impl RequestLimiter {
    /// Create a limiter; `None` or zero means unlimited.
    pub fn new(requests_per_minute: Option<u32>) -> Self {
        let rpm_limiter = requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|rpm| Arc::new(RateLimiter::direct(Quota::per_minute(rpm))));
        Self { rpm_limiter }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Returns true if a quota is enforced.
    pub fn is_limited(&self) -> bool {
        self.rpm_limiter.is_some()
    }

    /// Wait until the quota allows another request.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
            trace!("Request slot acquired");
        }
    }
}
