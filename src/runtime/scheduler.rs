//! Tick Scheduler
//!
//! A periodic task that can be torn down deterministically. The task stops
//! when its callback returns [`TickFlow::Stop`], when [`TickTask::cancel`] is
//! called, or when the handle is dropped.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Whether the scheduler keeps ticking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    /// Schedule the next tick.
    Continue,
    /// Halt; no further callbacks.
    Stop,
}

/// Owned handle to a running tick loop.
#[derive(Debug)]
pub struct TickTask {
    handle: Option<JoinHandle<()>>,
}

impl TickTask {
    /// Spawn a loop calling `on_tick` every `period`, first after one period.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = TickFlow> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if on_tick().await == TickFlow::Stop {
                    break;
                }
            }
            debug!("Tick loop halted");
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Abort the loop. Pending ticks are never delivered.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// True once the loop has exited or been cancelled.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for TickTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn counting_task(period_ms: u64, stop_after: u32) -> (TickTask, Arc<AtomicU32>) {
        let count = Arc::new(AtomicU32::new(0));
        let seen = count.clone();
        let task = TickTask::spawn(Duration::from_millis(period_ms), move || {
            let seen = seen.clone();
            async move {
                let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
                if n >= stop_after {
                    TickFlow::Stop
                } else {
                    TickFlow::Continue
                }
            }
        });
        (task, count)
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let (_task, count) = counting_task(100, u32::MAX);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_callback_says_so() {
        let (task, count) = counting_task(100, 3);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_pending_ticks() {
        let (mut task, count) = counting_task(100, u32::MAX);

        tokio::time::sleep(Duration::from_millis(350)).await;
        task.cancel();
        let at_cancel = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_cancel);
        assert!(task.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts() {
        let (task, count) = counting_task(100, u32::MAX);
        tokio::time::sleep(Duration::from_millis(250)).await;
        drop(task);
        let at_drop = count.load(Ordering::SeqCst);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(count.load(Ordering::SeqCst), at_drop);
    }
}
