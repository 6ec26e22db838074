//! Exclusive execution in strict arrival order
//!
//! Concurrent tasks that must not interleave around shared state (the proxy
//! pool's check-then-lease sequence, most importantly) funnel through one of
//! these. Grants are FIFO: tokio's `Mutex` queues waiters fairly, so callers
//! run in exactly the order they asked.

use std::future::Future;
use tokio::sync::{Mutex, MutexGuard};

/// Grants exclusive execution to one asynchronous caller at a time, in
/// request order.
#[derive(Debug, Default)]
pub struct SerialExecutor {
    inner: Mutex<()>,
}

/// Proof of exclusive access; the next waiter runs when this drops.
#[must_use = "the critical section ends when the guard is dropped"]
pub struct SerialGuard<'a> {
    _permit: MutexGuard<'a, ()>,
}

impl SerialExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for all earlier holders to release, then take exclusive access.
    pub async fn lock(&self) -> SerialGuard<'_> {
        SerialGuard {
            _permit: self.inner.lock().await,
        }
    }

    /// Run `op` under the lock and return its output.
    ///
    /// The lock is released whether `op` succeeds, fails, or panics: the
    /// guard lives on the stack of this call, so it cannot outlive it.
    pub async fn dispatch<F, Fut>(&self, op: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let _guard = self.lock().await;
        op().await
    }
}
