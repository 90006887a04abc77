#![forbid(unsafe_code)]

//! Easing curves and time-to-progress helpers.
//!
//! The engine does not run keyframe animations itself; it hands normalized
//! progress values to the presentation layer (CSS) which does. These helpers
//! keep that mapping consistent across components.

pub mod stagger;

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Quadratic ease-out (slow end), clamping `t` to [0, 1].
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Linear progress of `elapsed` through `duration`, in [0.0, 1.0].
///
/// A zero `duration` is treated as already complete.
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        return 1.0;
    }
    let t = elapsed.as_secs_f64() / duration.as_secs_f64();
    (t as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_endpoints_and_clamping() {
        assert_eq!(ease_out(0.0), 0.0);
        assert!((ease_out(1.0) - 1.0).abs() < f32::EPSILON);
        assert_eq!(ease_out(-3.0), 0.0);
        assert_eq!(ease_out(7.0), 1.0);
    }

    #[test]
    fn ease_out_leads_linear_and_is_monotonic() {
        assert!(ease_out(0.25) > 0.25);
        let mut prev = 0.0f32;
        for i in 0..=100 {
            let t = i as f32 / 100.0;
            let v = ease_out(t);
            assert!(v >= prev, "ease_out should be monotonic at t={t}");
            prev = v;
        }
    }

    #[test]
    fn progress_bounds() {
        let second = Duration::from_secs(1);
        assert_eq!(progress(Duration::ZERO, second), 0.0);
        assert!((progress(Duration::from_millis(500), second) - 0.5).abs() < 1e-6);
        assert_eq!(progress(Duration::from_secs(3), second), 1.0);
        assert_eq!(progress(Duration::ZERO, Duration::ZERO), 1.0);
    }
}
