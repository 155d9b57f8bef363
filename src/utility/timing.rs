// ============================================
// TIMING UTILITY - upstream latency logging
// ============================================
// Usage:
//   1. Guard: let _timer = Timer::start("name");   (logs on drop)
//   2. Only slow calls: Timer::start_with_threshold("name", 1000)
//   3. Async wrapper: timed_async("name", || async { .. }).await
// ============================================

use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Timer that logs its elapsed time when dropped
pub struct Timer {
    name: String,
    start: Instant,
    threshold_ms: u128,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self::start_with_threshold(name, 0)
    }

    /// Only logs if execution exceeds threshold (in milliseconds)
    pub fn start_with_threshold(name: impl Into<String>, threshold_ms: u128) -> Self {
        Self {
            name: name.into(),
            start: Instant::now(),
            threshold_ms,
        }
    }

    fn log_duration(&self, duration: Duration) {
        let ms = duration.as_millis();
        if ms < self.threshold_ms {
            return;
        }

        match Self::classify(ms) {
            Speed::Fast => debug!(operation = %self.name, elapsed_ms = ms as u64, "completed"),
            Speed::Acceptable => info!(operation = %self.name, elapsed_ms = ms as u64, "completed"),
            Speed::Slow => warn!(operation = %self.name, elapsed_ms = ms as u64, "slow operation"),
        }
    }

    fn classify(ms: u128) -> Speed {
        match ms {
            0..=500 => Speed::Fast,
            501..=5000 => Speed::Acceptable,
            _ => Speed::Slow,
        }
    }
}

#[derive(Debug, PartialEq)]
enum Speed {
    Fast,
    Acceptable,
    Slow,
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.log_duration(self.start.elapsed());
    }
}

/// Time an async function (shorthand)
pub async fn timed_async<F, Fut, R>(name: impl Into<String>, f: F) -> R
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = R>,
{
    let _timer = Timer::start(name);
    f().await
}
