#![forbid(unsafe_code)]

//! Browser frontend for the folio interactive surface engine.
//!
//! On `wasm32` this crate exposes [`FolioSurfaceWeb`], a `wasm-bindgen`
//! class that wires document and window listeners into a
//! [`folio_surface::Page`] and writes the results back to the DOM from an
//! animation-frame loop.
//!
//! On every target it provides:
//! - [`input`]: a JSON record schema for host input,
//! - [`replay`]: headless playback of recorded input, producing the same
//!   frames the browser would render.

pub mod input;
pub mod replay;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::FolioSurfaceWeb;

pub use input::{HostInput, InputParseError, InputRecord, parse_jsonl};
pub use replay::{Replay, ReplayError, replay_jsonl};

/// Native builds compile the DOM binding as a stub so the workspace builds
/// on non-wasm targets. Use [`Replay`] to drive a page natively.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioSurfaceWeb;

#[cfg(not(target_arch = "wasm32"))]
impl FolioSurfaceWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
