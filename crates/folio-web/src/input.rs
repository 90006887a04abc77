#![forbid(unsafe_code)]

//! Deterministic, JSON-friendly input schema for `folio-web`.
//!
//! Every host action the engine reacts to is one [`InputRecord`]: a
//! timestamp (`t_ms`, host monotonic milliseconds) plus a tagged
//! [`HostInput`]. One record per line (JSONL) makes a session log that
//! [`crate::replay`] can play back without a browser:
//!
//! ```text
//! {"t_ms":0,"kind":"mount","section":"hero","left":0,"top":0,"width":800,"height":600}
//! {"t_ms":12,"kind":"pointer_move","x":400,"y":300}
//! {"t_ms":16,"kind":"frame"}
//! ```

use std::fmt;
use std::time::Duration;

use folio_core::event::{PointerButton, PointerEvent, ScrollEvent, SurfaceEvent};
use folio_core::geometry::Rect;
use folio_surface::Section;
use serde::{Deserialize, Serialize};

/// One host action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostInput {
    /// Document `mousemove`, client coordinates.
    PointerMove { x: f64, y: f64 },
    /// Document `click`; `button` is `MouseEvent.button`.
    Click {
        x: f64,
        y: f64,
        #[serde(default)]
        button: i16,
    },
    /// Window `scroll`; `offset` is `window.scrollY`.
    Scroll { offset: f64 },
    /// A section element was attached.
    Mount {
        section: Section,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    /// A section's bounding rectangle changed.
    Bounds {
        section: Section,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    /// A section element was detached.
    Unmount { section: Section },
    /// The theme toggle control was pressed.
    ToggleTheme,
    /// An animation frame fired.
    Frame,
}

impl HostInput {
    /// Document event equivalent, for pointer, click and scroll inputs.
    #[must_use]
    pub fn to_surface_event(&self) -> Option<SurfaceEvent> {
        match *self {
            Self::PointerMove { x, y } => Some(SurfaceEvent::PointerMove(PointerEvent::new(x, y))),
            Self::Click { x, y, button } => Some(SurfaceEvent::Click(
                PointerEvent::new(x, y).with_button(PointerButton::from_dom(button)),
            )),
            Self::Scroll { offset } => Some(SurfaceEvent::Scroll(ScrollEvent::new(offset))),
            _ => None,
        }
    }

    /// Record a document event.
    #[must_use]
    pub fn from_surface_event(event: &SurfaceEvent) -> Self {
        match event {
            SurfaceEvent::PointerMove(p) => Self::PointerMove {
                x: p.client_x,
                y: p.client_y,
            },
            SurfaceEvent::Click(p) => Self::Click {
                x: p.client_x,
                y: p.client_y,
                button: dom_button(p.button),
            },
            SurfaceEvent::Scroll(s) => Self::Scroll { offset: s.offset },
        }
    }

    /// Section and rectangle of a `mount` or `bounds` input.
    #[must_use]
    pub fn section_rect(&self) -> Option<(Section, Rect)> {
        match *self {
            Self::Mount {
                section,
                left,
                top,
                width,
                height,
            }
            | Self::Bounds {
                section,
                left,
                top,
                width,
                height,
            } => Some((section, Rect::new(left, top, width, height))),
            _ => None,
        }
    }
}

fn dom_button(button: PointerButton) -> i16 {
    match button {
        PointerButton::Primary => 0,
        PointerButton::Auxiliary => 1,
        PointerButton::Secondary => 2,
        PointerButton::Other(n) => i16::from(n),
    }
}

/// A timestamped [`HostInput`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub t_ms: u64,
    #[serde(flatten)]
    pub input: HostInput,
}

impl InputRecord {
    #[must_use]
    pub const fn new(t_ms: u64, input: HostInput) -> Self {
        Self { t_ms, input }
    }

    /// Host time of the record.
    #[must_use]
    pub const fn at(&self) -> Duration {
        Duration::from_millis(self.t_ms)
    }

    /// Encode this record as a stable JSON string.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a previously encoded record.
    ///
    /// Errors occur if the JSON does not match the expected schema.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

/// A JSONL line that failed to decode.
#[derive(Debug)]
pub struct InputParseError {
    /// 1-based line number.
    pub line: usize,
    pub source: serde_json::Error,
}

impl fmt::Display for InputParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "input log line {}: {}", self.line, self.source)
    }
}

impl std::error::Error for InputParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Decode a JSONL session log. Blank lines are skipped.
pub fn parse_jsonl(log: &str) -> Result<Vec<InputRecord>, InputParseError> {
    log.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            InputRecord::from_json_str(line).map_err(|source| InputParseError {
                line: i + 1,
                source,
            })
        })
        .collect()
}
