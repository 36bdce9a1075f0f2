use std::time::Duration;

use rand::Rng;

/// Delay policy between vendor calls
#[derive(Debug, Clone)]
pub struct Pacer {
    min_delay: Duration,
    max_delay: Duration,
    enabled: bool,
}

impl Pacer {
    /// Create new `Pacer` pausing a random duration in `[min_delay, max_delay]`
    pub fn new(min_delay: Duration, max_delay: Duration) -> Self {
        let (min_delay, max_delay) = if min_delay <= max_delay {
            (min_delay, max_delay)
        } else {
            (max_delay, min_delay)
        };

        Self {
            min_delay,
            max_delay,
            enabled: true,
        }
    }

    /// Pacer that never sleeps
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            enabled: false,
        }
    }

    pub fn random_delay(&self) -> Duration {
        if !self.enabled || self.min_delay == self.max_delay {
            return self.min_delay;
        }

        let millis = rand::thread_rng()
            .gen_range(self.min_delay.as_millis() as u64..=self.max_delay.as_millis() as u64);
        Duration::from_millis(millis)
    }

    /// Random pause before the next call
    pub async fn pause(&self) {
        self.wait(self.random_delay()).await;
    }

    /// Fixed pause, skipped when pacing is disabled
    pub async fn wait(&self, duration: Duration) {
        if self.enabled && !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}

/// Bounded collection sweep: at most `iterations` taps, `interval` apart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepPolicy {
    pub iterations: u32,
    pub interval: Duration,
}

impl SweepPolicy {
    pub const CHEST: SweepPolicy = SweepPolicy {
        iterations: 240,
        interval: Duration::from_millis(2),
    };

    pub const FREE_CHEST: SweepPolicy = SweepPolicy {
        iterations: 100_000,
        interval: Duration::from_millis(200),
    };
}
