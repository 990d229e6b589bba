//! Timer and idle services used by the statement executor.
//!
//! The executor never touches a clock directly. Production code runs on the
//! `tokio` current-thread runtime; tests plug in [`VirtualScheduler`], which
//! advances a virtual clock without waiting.

use std::time::Duration;

use async_trait::async_trait;

/// The host loop's timer and idle facilities.
#[async_trait(?Send)]
pub trait Scheduler {
    /// Resume after `duration` has elapsed.
    async fn sleep(&self, duration: Duration);

    /// Resume the next time the loop is idle.
    async fn idle(&self);
}

/// Scheduler backed by the ambient `tokio` runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

#[async_trait(?Send)]
impl Scheduler for TokioScheduler {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    async fn idle(&self) {
        tokio::task::yield_now().await;
    }
}

#[cfg(test)]
pub use virtual_clock::VirtualScheduler;
