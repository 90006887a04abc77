#![forbid(unsafe_code)]

//! Logging facade.
//!
//! With the `tracing` feature the engine's log points are real `tracing`
//! events. Without it the same macro names expand to nothing, so call sites
//! read identically in both builds:
//!
//! ```
//! let span = folio_core::trace_span!("frame");
//! let _guard = span.enter();
//! folio_core::debug!(count = 3, "ripples expired");
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, trace_span, warn};

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
///
/// Intended for native hosts (tests, replay tools). Returns an error if a
/// global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
}

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// Discards its arguments.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// Discards its arguments.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// Evaluates to a [`NoopSpan`](crate::logging::NoopSpan).
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in for `tracing::Span` when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    #[must_use]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;
