#![forbid(unsafe_code)]

//! Core: geometry, canonical pointer/scroll events, host-driven time and
//! cancellable timers.

pub mod animation;
pub mod clock;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod rng;
pub mod timer;

#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, trace_span, warn};
