//! Request limiting using governor and a Tokio semaphore.
//!
//! Requests-per-minute is enforced with governor's GCRA limiter; in-flight
//! requests are bounded by a semaphore. Either limit may be absent.

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use scrivener_error::{GenerationError, GenerationErrorKind};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client-side quota enforcement for outbound model calls.
///
/// # Example
///
/// ```
/// use scrivener_models::RequestLimiter;
///
/// let limiter = RequestLimiter::new(Some(60), Some(2));
/// assert!(limiter.is_limited());
/// assert!(!RequestLimiter::unlimited().is_limited());
/// ```
#[derive(Clone)]
pub struct RequestLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrency: Option<Arc<Semaphore>>,
}

impl RequestLimiter {
    /// Create a limiter; `None` or zero disables the corresponding limit.
    pub fn new(requests_per_minute: Option<u32>, max_concurrent: Option<u32>) -> Self {
        let rpm_limiter = requests_per_minute.and_then(NonZeroU32::new).map(|n| {
            let quota = Quota::per_minute(n);
            Arc::new(GovernorRateLimiter::direct(quota))
        });

        let concurrency = max_concurrent
            .filter(|n| *n > 0)
            .map(|n| Arc::new(Semaphore::new(n as usize)));

        Self {
            rpm_limiter,
            concurrency,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Whether any limit is configured.
    pub fn is_limited(&self) -> bool {
        self.rpm_limiter.is_some() || self.concurrency.is_some()
    }

    /// Wait for quota, returning a guard that holds the concurrency slot.
    pub async fn acquire(&self) -> Result<RequestPermit, GenerationError> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        // Concurrency slot last, so it is not held while waiting on the rate
        let permit = match &self.concurrency {
            Some(semaphore) => Some(semaphore.clone().acquire_owned().await.map_err(|e| {
                GenerationError::new(GenerationErrorKind::Unavailable(format!(
                    "Request limiter closed: {}",
                    e
                )))
            })?),
            None => None,
        };

        Ok(RequestPermit { _permit: permit })
    }
}

impl std::fmt::Debug for RequestLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestLimiter")
            .field("rpm_limited", &self.rpm_limiter.is_some())
            .field("concurrency_limited", &self.concurrency.is_some())
            .finish()
    }
}

impl Default for RequestLimiter {
    fn default() -> Self {
        Self::unlimited()
    }
}

/// Releases the concurrency slot when dropped.
#[derive(Debug)]
pub struct RequestPermit {
    _permit: Option<OwnedSemaphorePermit>,
}
