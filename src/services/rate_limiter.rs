use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Fixed-cadence limiter owned by a single worker
///
/// Burst is one, so consecutive operations are spaced by `1 / rate`
/// seconds regardless of how quickly tasks arrive.
pub struct WorkerRateLimiter {
    inner: DefaultDirectRateLimiter,
}

impl WorkerRateLimiter {
    /// Create a limiter allowing `per_second` operations each second
    pub fn new(per_second: NonZeroU32) -> Self {
        let quota = Quota::per_second(per_second).allow_burst(NonZeroU32::MIN);
        Self {
            inner: RateLimiter::direct(quota),
        }
    }

    /// Wait for the next tick
    pub async fn tick(&self) {
        self.inner.until_ready().await;
    }
}
