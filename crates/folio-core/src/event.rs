#![forbid(unsafe_code)]

//! Canonical input event types.
//!
//! The host (DOM bindings or a replay harness) converts document and window
//! events into [`SurfaceEvent`] values. Coordinates are viewport (client)
//! CSS pixels; scroll offsets are the document's vertical scroll position.
//!
//! # Design Notes
//!
//! - Events are document-wide. Consumers self-filter against their own
//!   bounding rectangle.
//! - Button numbering follows `MouseEvent.button`.

use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The pointer moved.
    PointerMove(PointerEvent),

    /// A click completed (press and release on the same target).
    Click(PointerEvent),

    /// The document scrolled.
    Scroll(ScrollEvent),
}

impl SurfaceEvent {
    /// Pointer payload for pointer-derived events.
    #[must_use]
    pub const fn pointer(&self) -> Option<&PointerEvent> {
        match self {
            Self::PointerMove(pointer) | Self::Click(pointer) => Some(pointer),
            Self::Scroll(_) => None,
        }
    }
}

/// A pointer event in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Horizontal client coordinate (`MouseEvent.clientX`).
    pub client_x: f64,

    /// Vertical client coordinate (`MouseEvent.clientY`).
    pub client_y: f64,

    /// Button that triggered the event. Moves report [`PointerButton::Primary`].
    pub button: PointerButton,
}

impl PointerEvent {
    /// Create a primary-button pointer event.
    #[must_use]
    pub const fn new(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            button: PointerButton::Primary,
        }
    }

    /// Create a pointer event with a specific button.
    #[must_use]
    pub const fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    /// Get the position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.client_x, self.client_y)
    }
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointerButton {
    /// Main button, usually the left button.
    #[default]
    Primary,

    /// Auxiliary button, usually the wheel.
    Auxiliary,

    /// Secondary button, usually the right button.
    Secondary,

    /// Any other button (back, forward, pen eraser...).
    Other(u8),
}

impl PointerButton {
    /// Map a DOM `MouseEvent.button` value.
    #[must_use]
    pub const fn from_dom(button: i16) -> Self {
        match button {
            0 => Self::Primary,
            1 => Self::Auxiliary,
            2 => Self::Secondary,
            n if n > 0 && n <= u8::MAX as i16 => Self::Other(n as u8),
            _ => Self::Other(u8::MAX),
        }
    }
}

/// A scroll event carrying the document's current vertical offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    /// `window.scrollY` at the time of the event.
    pub offset: f64,
}

impl ScrollEvent {
    /// Create a new scroll event.
    #[must_use]
    pub const fn new(offset: f64) -> Self {
        Self { offset }
    }
}
