//! Time sources for entity timestamps

use chrono::{DateTime, Utc};
use std::fmt;
use tokio::time::Instant;

/// Source of the timestamps recorded on processes and tasks
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall time sampled once, then advanced by tokio's monotonic clock.
///
/// Timestamps from this clock never move backward, even if the system clock
/// is adjusted, and they follow tokio's virtual time when the runtime is
/// paused (`#[tokio::test(start_paused = true)]`).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    anchor_wall: DateTime<Utc>,
    anchor_instant: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// Start the clock at a fixed wall time
    pub fn anchored_at(anchor_wall: DateTime<Utc>) -> Self {
        Self {
            anchor_wall,
            anchor_instant: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = Instant::now().saturating_duration_since(self.anchor_instant);
        match chrono::Duration::from_std(elapsed) {
            Ok(delta) => self.anchor_wall + delta,
            Err(_) => self.anchor_wall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_monotonic_clock_follows_paused_time() {
        let anchor = Utc::now();
        let clock = MonotonicClock::anchored_at(anchor);
        assert_eq!(clock.now(), anchor);

        tokio::time::advance(Duration::from_secs(90)).await;
        assert_eq!(clock.now() - anchor, chrono::Duration::seconds(90));
    }

    #[tokio::test]
    async fn test_monotonic_clock_never_goes_backward() {
        let clock = MonotonicClock::new();
        let mut previous = clock.now();
        for _ in 0..100 {
            let current = clock.now();
            assert!(current >= previous);
            previous = current;
        }
    }
}
