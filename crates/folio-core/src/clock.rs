#![forbid(unsafe_code)]

//! Monotonic time sources.
//!
//! Engine components never read wall-clock time themselves; callers pass a
//! `now: Duration` obtained from a [`Clock`]. Hosts pick the source:
//!
//! - [`DeterministicClock`]: advanced explicitly (tests, replay, host-driven WASM).
//! - [`MonotonicClock`]: backed by `web_time::Instant`, which maps to
//!   `performance.now()` on `wasm32-unknown-unknown` where `std::time` panics.

use std::time::Duration;

/// A monotonic time source measured from an arbitrary origin.
pub trait Clock {
    /// Current monotonic time.
    fn now(&self) -> Duration;
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Real monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: web_time::Instant,
}

impl MonotonicClock {
    /// Create a clock whose origin is the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_clock_advances() {
        let mut clock = DeterministicClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));
        assert_eq!(clock.now(), Duration::from_millis(32));
    }

    #[test]
    fn deterministic_clock_never_goes_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_millis(100));
        clock.set(Duration::from_millis(40));
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn monotonic_clock_is_non_decreasing() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
