#![forbid(unsafe_code)]

//! Headless playback of recorded host input.
//!
//! Drives a [`Page`] from [`InputRecord`]s on a [`DeterministicClock`] and
//! collects a [`PageFrame`] for every `frame` input that changed something.
//! The same record stream always yields the same frames, which makes
//! session logs usable as regression fixtures.

use std::fmt;

use folio_core::clock::{Clock, DeterministicClock};
use folio_surface::{ConfigError, Dirty, Page, PageFrame, SurfaceConfig};

use crate::input::{HostInput, InputParseError, InputRecord, parse_jsonl};

/// Why a replay could not run.
#[derive(Debug)]
pub enum ReplayError {
    Config(ConfigError),
    Parse(InputParseError),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ReplayError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<InputParseError> for ReplayError {
    fn from(err: InputParseError) -> Self {
        Self::Parse(err)
    }
}

/// A page plus the clock that feeds it.
#[derive(Debug)]
pub struct Replay {
    page: Page,
    clock: DeterministicClock,
    frames: Vec<PageFrame>,
}

impl Replay {
    pub fn new(config: SurfaceConfig) -> Result<Self, ReplayError> {
        Ok(Self {
            page: Page::new(config)?,
            clock: DeterministicClock::new(),
            frames: Vec::new(),
        })
    }

    /// Apply one record. Returns the dirty flags when the record was a frame.
    ///
    /// Records timestamped before the current clock run at the current time.
    pub fn apply(&mut self, record: &InputRecord) -> Option<Dirty> {
        self.clock.set(record.at());
        let now = self.clock.now();
        if let Some(event) = record.input.to_surface_event() {
            self.page.dispatch(&event, now);
            return None;
        }
        match record.input {
            HostInput::Mount { .. } => {
                if let Some((section, rect)) = record.input.section_rect() {
                    self.page.mount(section, rect);
                }
            }
            HostInput::Bounds { .. } => {
                if let Some((section, rect)) = record.input.section_rect() {
                    self.page.set_bounds(section, rect);
                }
            }
            HostInput::Unmount { section } => {
                self.page.unmount(section);
            }
            HostInput::ToggleTheme => {
                self.page.toggle_theme();
            }
            HostInput::Frame => {
                let dirty = self.page.frame(now);
                if !dirty.is_empty() {
                    self.frames.push(self.page.snapshot(now));
                }
                return Some(dirty);
            }
            HostInput::PointerMove { .. } | HostInput::Click { .. } | HostInput::Scroll { .. } => {}
        }
        None
    }

    /// Apply every record in order.
    pub fn run<'a>(&mut self, records: impl IntoIterator<Item = &'a InputRecord>) {
        for record in records {
            self.apply(record);
        }
    }

    /// Page under replay.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Frames collected so far.
    #[must_use]
    pub fn frames(&self) -> &[PageFrame] {
        &self.frames
    }

    /// Consume the replay, returning its frames.
    #[must_use]
    pub fn into_frames(self) -> Vec<PageFrame> {
        self.frames
    }
}

/// Parse a JSONL log and replay it against a fresh page.
pub fn replay_jsonl(config: SurfaceConfig, log: &str) -> Result<Vec<PageFrame>, ReplayError> {
    let records = parse_jsonl(log)?;
    let mut replay = Replay::new(config)?;
    replay.run(&records);
    Ok(replay.into_frames())
}
