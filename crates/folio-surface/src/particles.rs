#![forbid(unsafe_code)]

//! Decorative particle layouts.
//!
//! Two fields exist: the page-wide background (randomly placed, random delay
//! and duration) and the floaters inside each interactive surface (evenly
//! spaced columns, random height, linear delay stagger). Layouts are fixed
//! when created so particles never jump between renders.

use std::time::Duration;

use folio_core::animation::stagger::{linear_offsets, random_offsets};
use folio_core::rng::SeededRng;

/// Maximum background animation delay.
const BACKGROUND_DELAY_SPAN: Duration = Duration::from_secs(3);
/// Background animation durations fall in `[2s, 5s)`.
const BACKGROUND_MIN_DURATION: Duration = Duration::from_secs(2);
const BACKGROUND_DURATION_SPAN: Duration = Duration::from_secs(3);
/// Delay between consecutive floaters.
const FLOATER_STAGGER: Duration = Duration::from_millis(500);

/// One particle, positioned in percent of its container.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Particle {
    pub left: f64,
    pub top: f64,
    pub delay_ms: u64,
    /// `None` keeps the stylesheet duration.
    pub duration_ms: Option<u64>,
}

impl Particle {
    /// Inline style for the particle element.
    #[must_use]
    pub fn style(&self) -> String {
        let mut style = format!(
            "left: {}%; top: {}%; animation-delay: {}s",
            self.left,
            self.top,
            seconds(self.delay_ms)
        );
        if let Some(duration) = self.duration_ms {
            style.push_str(&format!("; animation-duration: {}s", seconds(duration)));
        }
        style
    }
}

fn seconds(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Page-wide background: `count` particles scattered over the viewport.
#[must_use]
pub fn background_field(count: usize, rng: &mut SeededRng) -> Vec<Particle> {
    let delays = random_offsets(count, BACKGROUND_DELAY_SPAN, rng);
    let durations = random_offsets(count, BACKGROUND_DURATION_SPAN, rng);
    delays
        .into_iter()
        .zip(durations)
        .map(|(delay, extra)| Particle {
            left: rng.range_f64(0.0, 100.0),
            top: rng.range_f64(0.0, 100.0),
            delay_ms: millis(delay),
            duration_ms: Some(millis(BACKGROUND_MIN_DURATION + extra)),
        })
        .collect()
}

/// Floaters for one surface: column `i` sits at `20 + 20 * i` percent.
#[must_use]
pub fn floaters(count: usize, rng: &mut SeededRng) -> Vec<Particle> {
    linear_offsets(count, FLOATER_STAGGER)
        .into_iter()
        .enumerate()
        .map(|(i, delay)| Particle {
            left: 20.0 + i as f64 * 20.0,
            top: rng.range_f64(0.0, 100.0),
            delay_ms: millis(delay),
            duration_ms: None,
        })
        .collect()
}
