//! Reconnect backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Jittered exponential backoff for feed reconnects.
///
/// The deterministic delay doubles per consecutive failure up to `cap`;
/// the returned sleep is drawn uniformly from `[delay / 2, delay]` so a
/// fleet of clients dropped by the same outage does not reconnect in
/// lockstep.
#[derive(Debug, Clone)]
pub struct ReconnectBackoff {
    initial: Duration,
    cap: Duration,
    failures: u32,
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(60))
    }
}

impl ReconnectBackoff {
    pub fn new(initial: Duration, cap: Duration) -> Self {
        Self {
            initial,
            cap,
            failures: 0,
        }
    }

    /// Returns the sleep before the next attempt and records the failure.
    pub fn next_delay(&mut self) -> Duration {
        // Shift capped well below u32 doubling overflow territory.
        let doubled = self
            .initial
            .saturating_mul(1u32.checked_shl(self.failures.min(16)).unwrap_or(u32::MAX));
        let delay = doubled.min(self.cap);

        self.failures = self.failures.saturating_add(1);

        let floor = delay / 2;
        let jitter = rand::thread_rng().gen_range(Duration::ZERO..=delay - floor);
        floor + jitter
    }

    /// Clears the failure count after a stable connection.
    pub fn reset(&mut self) {
        self.failures = 0;
    }

    /// Consecutive failures recorded since the last reset.
    pub fn failures(&self) -> u32 {
        self.failures
    }
}
