#![forbid(unsafe_code)]

//! Interactive surface engine.
//!
//! Host-driven state machines that turn document pointer, click and scroll
//! events into render inputs:
//!
//! - [`pointer::PointerTracker`]: frame-coalesced percentage coordinates.
//! - [`ripple::RippleManager`]: self-expiring click ripples.
//! - [`scroll_gate::ScrollDirectionGate`]: debounced nav visibility with hysteresis.
//! - [`surface::InteractiveSurface`]: one tracker and one ripple set per section.
//! - [`page::Page`]: the theme, the gate and every section surface.
//!
//! Nothing here reads the clock or touches the DOM. Callers pass `now` and
//! call `frame` once per animation frame.

pub mod config;
pub mod page;
pub mod particles;
pub mod pointer;
pub mod ripple;
pub mod scroll_gate;
pub mod surface;

pub use config::{
    ConfigError, ParticleConfig, PointerConfig, RippleConfig, ScrollGateConfig, SurfaceConfig,
};
pub use page::{Dirty, Page, PageFrame, Section, SectionFrame, UnknownSection};
pub use particles::Particle;
pub use pointer::{PointerPosition, PointerTracker};
pub use ripple::{Ripple, RippleId, RippleManager, RippleView};
pub use scroll_gate::{NavState, ScrollDirectionGate};
pub use surface::{InteractiveSurface, SurfaceFrame, SurfaceTick};
