#![forbid(unsafe_code)]

//! Frame-coalesced pointer tracking over one container.
//!
//! Pointer moves arrive far more often than the display refreshes. The
//! tracker stores only the latest sample and asks for one frame callback;
//! when the host runs the frame, the sample is mapped to percentages of the
//! container bounds at that moment:
//!
//! ```text
//! x = clamp((client_x - left) / width * 100, 0, 100)
//! y = clamp((client_y - top) / height * 100, 0, 100)
//! ```
//!
//! # Invariants
//!
//! 1. At most one frame request is outstanding.
//! 2. A frame publishes the most recent qualifying sample, never an older one.
//! 3. Degenerate bounds never publish; the sample waits for usable bounds.
//! 4. After [`teardown`](PointerTracker::teardown) nothing publishes.

use folio_core::event::PointerEvent;
use folio_core::geometry::{Point, Rect};
use folio_core::timer::{Scheduler, TimerHandle};

use crate::config::PointerConfig;

/// Pointer position as percentages of the container extent, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    /// Create a position. Values are not clamped.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `--mouse-x` / `--mouse-y` custom property pairs.
    #[must_use]
    pub fn css_vars(&self) -> [(&'static str, String); 2] {
        [
            ("--mouse-x", format!("{}%", self.x)),
            ("--mouse-y", format!("{}%", self.y)),
        ]
    }
}

impl From<Point> for PointerPosition {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// Tracks the pointer over one container.
#[derive(Debug)]
pub struct PointerTracker {
    config: PointerConfig,
    bounds: Rect,
    /// Latest sample not yet applied by a frame.
    sample: Option<Point>,
    frame: Option<TimerHandle>,
    timers: Scheduler<()>,
    position: PointerPosition,
    published: u64,
    torn_down: bool,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(PointerConfig::default())
    }
}

impl PointerTracker {
    /// Create a tracker with empty bounds. Nothing publishes until
    /// [`set_bounds`](Self::set_bounds) supplies a laid-out rectangle.
    #[must_use]
    pub fn new(config: PointerConfig) -> Self {
        Self {
            config,
            bounds: Rect::default(),
            sample: None,
            frame: None,
            timers: Scheduler::new(),
            position: PointerPosition::default(),
            published: 0,
            torn_down: false,
        }
    }

    /// Record the container bounding rectangle.
    ///
    /// When a sample was held back by degenerate bounds and `bounds` is
    /// usable, a frame is requested for it.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
        if !self.torn_down && self.sample.is_some() && !bounds.is_degenerate() {
            self.request_frame();
        }
    }

    /// Current container bounds.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Store a pointer sample. Returns `true` if this call requested a frame.
    ///
    /// Moves outside usable bounds are ignored unless
    /// [`PointerConfig::track_outside`] is set. Non-finite coordinates are
    /// always ignored.
    pub fn on_pointer_move(&mut self, event: &PointerEvent) -> bool {
        if self.torn_down {
            return false;
        }
        let point = event.position();
        if !point.is_finite() {
            return false;
        }
        if !self.config.track_outside
            && !self.bounds.is_degenerate()
            && !self.bounds.contains(point.x, point.y)
        {
            return false;
        }
        self.sample = Some(point);
        self.request_frame()
    }

    fn request_frame(&mut self) -> bool {
        if self.frame.is_some() {
            return false;
        }
        self.frame = Some(self.timers.request_frame(()));
        true
    }

    /// Whether a frame callback is waiting.
    #[inline]
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.timers.has_frame_request()
    }

    /// Run the pending frame callback, if any.
    ///
    /// Returns the newly published position, or `None` when no frame was
    /// pending or the bounds are degenerate.
    pub fn frame(&mut self) -> Option<PointerPosition> {
        if self.timers.run_frame().is_empty() {
            return None;
        }
        // The handle's work has run; it can no longer be cancelled.
        self.frame = None;

        let sample = self.sample?;
        let Some(percent) = self.bounds.percent_of(sample.x, sample.y) else {
            folio_core::trace!(
                width = self.bounds.width,
                height = self.bounds.height,
                "pointer frame skipped: degenerate bounds"
            );
            return None;
        };
        self.sample = None;
        self.position = PointerPosition::from(percent);
        self.published += 1;
        Some(self.position)
    }

    /// Last published position. `(0, 0)` before the first publish.
    #[inline]
    #[must_use]
    pub fn position(&self) -> PointerPosition {
        self.position
    }

    /// Number of positions published so far.
    #[inline]
    #[must_use]
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[inline]
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Cancel the pending frame and stop accepting input.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.frame.take() {
            let _ = self.timers.cancel(handle);
        }
        self.sample = None;
        self.torn_down = true;
    }
}
