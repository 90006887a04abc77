#![forbid(unsafe_code)]

//! Tunables for the surface engine.
//!
//! Every struct has a `Default` matching the shipped site and `with_*`
//! builders. With the `serde` feature, each one deserializes from a partial
//! JSON object (missing keys take their default) using camelCase keys, with
//! durations as integer milliseconds:
//!
//! ```json
//! { "ripple": { "ttlMs": 800 }, "scroll": { "minOffset": 64 } }
//! ```

use std::fmt;
use std::time::Duration;

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Pointer tracking options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PointerConfig {
    /// Keep tracking (clamped to the edges) while the pointer is outside the
    /// container. When false, moves outside the bounds are ignored.
    /// Default: false
    pub track_outside: bool,
}

impl PointerConfig {
    /// Set [`track_outside`](Self::track_outside).
    #[must_use]
    pub fn with_track_outside(mut self, track_outside: bool) -> Self {
        self.track_outside = track_outside;
        self
    }
}

// ---------------------------------------------------------------------------
// Ripple
// ---------------------------------------------------------------------------

/// Click ripple options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct RippleConfig {
    /// Lifetime of one ripple.
    /// Default: 1000ms (the CSS ripple animation length)
    #[cfg_attr(feature = "serde", serde(rename = "ttlMs", with = "duration_ms"))]
    pub ttl: Duration,

    /// Optional cap on live ripples per surface. When set, the oldest ripple
    /// is evicted early once a click would exceed it. Without a cap every
    /// ripple lives for exactly its `ttl`.
    /// Default: None
    pub max_live: Option<usize>,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_millis(1000),
            max_live: None,
        }
    }
}

impl RippleConfig {
    /// Set the ripple lifetime.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Cap the number of live ripples.
    #[must_use]
    pub fn with_max_live(mut self, max_live: usize) -> Self {
        self.max_live = Some(max_live);
        self
    }
}

// ---------------------------------------------------------------------------
// Scroll gate
// ---------------------------------------------------------------------------

/// Nav visibility hysteresis options. Distances are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ScrollGateConfig {
    /// Upward delta that reveals the nav.
    /// Default: 10
    pub up_threshold: f64,

    /// Downward delta that hides the nav.
    /// Default: 10
    pub down_threshold: f64,

    /// The nav never hides at or above this offset.
    /// Default: 100
    pub min_offset: f64,

    /// Quiet window before a burst of scroll events is sampled.
    /// Default: 10ms
    #[cfg_attr(feature = "serde", serde(rename = "debounceMs", with = "duration_ms"))]
    pub debounce: Duration,
}

impl Default for ScrollGateConfig {
    fn default() -> Self {
        Self {
            up_threshold: 10.0,
            down_threshold: 10.0,
            min_offset: 100.0,
            debounce: Duration::from_millis(10),
        }
    }
}

impl ScrollGateConfig {
    /// Set both directional thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, up: f64, down: f64) -> Self {
        self.up_threshold = up;
        self.down_threshold = down;
        self
    }

    /// Set the minimum offset below which the nav stays visible.
    #[must_use]
    pub fn with_min_offset(mut self, min_offset: f64) -> Self {
        self.min_offset = min_offset;
        self
    }

    /// Set the debounce window.
    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

// ---------------------------------------------------------------------------
// Particles
// ---------------------------------------------------------------------------

/// Decorative particle counts and layout seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ParticleConfig {
    /// Page-wide background particles.
    /// Default: 50
    pub background_count: usize,

    /// Floating particles per interactive surface.
    /// Default: 5
    pub floater_count: usize,

    /// Seed for every particle layout.
    pub seed: u64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            background_count: 50,
            floater_count: 5,
            seed: 0x5eed,
        }
    }
}

impl ParticleConfig {
    /// Set the layout seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set both particle counts.
    #[must_use]
    pub fn with_counts(mut self, background: usize, floaters: usize) -> Self {
        self.background_count = background;
        self.floater_count = floaters;
        self
    }
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Every engine tunable.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct SurfaceConfig {
    pub pointer: PointerConfig,
    pub ripple: RippleConfig,
    pub scroll: ScrollGateConfig,
    pub particles: ParticleConfig,
}

impl SurfaceConfig {
    #[must_use]
    pub fn with_pointer(mut self, pointer: PointerConfig) -> Self {
        self.pointer = pointer;
        self
    }

    #[must_use]
    pub fn with_ripple(mut self, ripple: RippleConfig) -> Self {
        self.ripple = ripple;
        self
    }

    #[must_use]
    pub fn with_scroll(mut self, scroll: ScrollGateConfig) -> Self {
        self.scroll = scroll;
        self
    }

    #[must_use]
    pub fn with_particles(mut self, particles: ParticleConfig) -> Self {
        self.particles = particles;
        self
    }

    /// Reject values the state machines cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ripple.ttl.is_zero() {
            return Err(ConfigError::ZeroRippleTtl);
        }
        if self.ripple.max_live == Some(0) {
            return Err(ConfigError::ZeroRippleCap);
        }
        let distances = [
            ("up_threshold", self.scroll.up_threshold),
            ("down_threshold", self.scroll.down_threshold),
            ("min_offset", self.scroll.min_offset),
        ];
        for (field, value) in distances {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }
        Ok(())
    }
}

/// Invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Ripples would expire the instant they are created.
    ZeroRippleTtl,
    /// No ripple could ever be live.
    ZeroRippleCap,
    /// A scroll distance is NaN or infinite.
    NonFinite { field: &'static str, value: f64 },
    /// A scroll distance is negative.
    Negative { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroRippleTtl => write!(f, "ripple ttl must be greater than zero"),
            Self::ZeroRippleCap => write!(f, "ripple max_live must be at least 1"),
            Self::NonFinite { field, value } => {
                write!(f, "scroll {field} must be finite, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "scroll {field} must not be negative, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(feature = "serde")]
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
