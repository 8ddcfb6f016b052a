//! Cancellable periodic activity timers.
//!
//! Used for the drawing activity reward and the reading stopwatch. The
//! first tick fires one full period after start. Dropping the handle stops
//! the timer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

/// RAII handle for a spawned interval task
#[derive(Debug)]
pub struct ActivityTimer {
    label: &'static str,
    ticks: Arc<AtomicU64>,
    handle: JoinHandle<()>,
}

impl ActivityTimer {
    /// Start ticking every `period`, calling `on_tick` each time.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start<F>(label: &'static str, period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let first = Instant::now() + period;
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(first, period);
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::AcqRel);
                on_tick();
            }
        });

        debug!(timer = label, period_ms = period.as_millis() as u64, "timer started");
        Self {
            label,
            ticks,
            handle,
        }
    }

    /// Start a timer that only counts its ticks
    pub fn stopwatch(label: &'static str, period: Duration) -> Self {
        Self::start(label, period, || {})
    }

    /// Ticks fired so far
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Stop the timer and return the final tick count
    pub fn stop(self) -> u64 {
        self.ticks()
    }
}

impl Drop for ActivityTimer {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(timer = self.label, ticks = self.ticks(), "timer stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_period() {
        let timer = ActivityTimer::stopwatch("test", Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(timer.ticks(), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(timer.ticks(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticking() {
        let fired = Arc::new(AtomicU64::new(0));
        let seen = Arc::clone(&fired);
        let timer = ActivityTimer::start("test", Duration::from_secs(10), move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(timer.stop(), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }
}
