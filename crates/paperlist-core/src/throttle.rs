//! Request-rate limit for E-utilities.
//!
//! NCBI allows 3 requests per second without an API key and 10 with one.
//! Requests are spaced evenly (burst of one), so no one-second window sees
//! more than the quota.

use std::num::NonZeroU32;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};

use crate::http::SHARED_RUNTIME;

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Blocking rate limiter shared by all fetch workers
pub struct Throttle {
    limiter: DirectLimiter,
    per_second: NonZeroU32,
}

impl Throttle {
    /// Allow `requests` per second (at least one).
    pub fn per_second(requests: u32) -> Self {
        let per_second = NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(quota),
            per_second,
        }
    }

    pub fn rate(&self) -> u32 {
        self.per_second.get()
    }

    /// Block the calling thread until the next request may go out.
    pub fn wait(&self) {
        SHARED_RUNTIME.handle().block_on(self.limiter.until_ready());
    }
}

impl std::fmt::Debug for Throttle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Throttle").field("per_second", &self.per_second).finish()
    }
}
