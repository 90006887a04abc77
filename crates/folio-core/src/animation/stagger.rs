#![forbid(unsafe_code)]

//! Stagger utilities: delay offsets for cascading decorative animations.
//!
//! # Invariants
//!
//! 1. `linear_offsets(0, ..)` returns an empty vec.
//! 2. offset[i] = i * step exactly (integer arithmetic).
//! 3. `random_offsets` values lie in `[0, span)` and depend only on the rng state.

use std::time::Duration;

use crate::rng::SeededRng;

/// Evenly spaced delay offsets for `count` items: offset[i] = i * step.
#[must_use]
pub fn linear_offsets(count: usize, step: Duration) -> Vec<Duration> {
    (0..count)
        .map(|i| step.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
        .collect()
}

/// Independent random offsets in `[0, span)`, one per item.
#[must_use]
pub fn random_offsets(count: usize, span: Duration, rng: &mut SeededRng) -> Vec<Duration> {
    let span_secs = span.as_secs_f64();
    (0..count)
        .map(|_| Duration::from_secs_f64(rng.range_f64(0.0, span_secs)))
        .collect()
}
