//! Counting semaphore capping in-flight E-utilities requests.
//!
//! This bounds concurrency only. The per-second request rate is enforced
//! separately by [`Throttle`](crate::Throttle).

use std::sync::{Condvar, Mutex, PoisonError};

pub struct Semaphore {
    permits: Mutex<usize>,
    cond: Condvar,
}

/// Releases one permit on drop.
pub struct Permit<'a>(&'a Semaphore);

impl Semaphore {
    /// Create a semaphore with `permits` permits (at least one).
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits.max(1)),
            cond: Condvar::new(),
        }
    }

    /// Block until a permit is available, then take it.
    pub fn acquire(&self) -> Permit<'_> {
        let mut count = self.permits.lock().unwrap_or_else(PoisonError::into_inner);
        while *count == 0 {
            count = self.cond.wait(count).unwrap_or_else(PoisonError::into_inner);
        }
        *count -= 1;
        Permit(self)
    }

    /// Permits currently free.
    #[cfg(test)]
    fn available(&self) -> usize {
        *self.permits.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        let mut count = self.0.permits.lock().unwrap_or_else(PoisonError::into_inner);
        *count += 1;
        self.0.cond.notify_one();
    }
}
