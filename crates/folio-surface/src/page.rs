#![forbid(unsafe_code)]

//! Page composition: the theme, the nav gate, the background field and one
//! [`InteractiveSurface`] per mounted section.
//!
//! # Frame protocol
//!
//! ```text
//! host event  ──► Page::dispatch(event, now)   (every surface + the gate)
//! rAF         ──► Page::frame(now) -> Dirty    (pointer frames, expiries, debounce)
//!                 Page::snapshot(now)          (render inputs)
//! ```
//!
//! [`Dirty`] accumulates across `dispatch`, `toggle_theme` and mount changes
//! and is drained by `frame`, so a host can skip DOM writes on idle frames.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bitflags::bitflags;
use folio_core::event::SurfaceEvent;
use folio_core::geometry::Rect;
use folio_core::rng::SeededRng;
use folio_style::{ResolvedPalette, ThemeMode, ThemeStore, ThemeSubscription};

use crate::config::{ConfigError, SurfaceConfig};
use crate::particles::{self, Particle};
use crate::scroll_gate::{NavState, ScrollDirectionGate};
use crate::surface::{InteractiveSurface, SurfaceFrame};

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Interactive sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Section {
    Hero,
    About,
    Skills,
    Projects,
    Experience,
    Certificates,
    Education,
    Extracurriculars,
    Contact,
}

impl Section {
    /// Every section, in page order.
    pub const ALL: [Section; 9] = [
        Self::Hero,
        Self::About,
        Self::Skills,
        Self::Projects,
        Self::Experience,
        Self::Certificates,
        Self::Education,
        Self::Extracurriculars,
        Self::Contact,
    ];

    /// Element id / anchor of the section.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Experience => "experience",
            Self::Certificates => "certificates",
            Self::Education => "education",
            Self::Extracurriculars => "extracurriculars",
            Self::Contact => "contact",
        }
    }

    const fn index(self) -> u64 {
        self as u64
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('#');
        Self::ALL
            .into_iter()
            .find(|section| section.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownSection(s.to_owned()))
    }
}

/// A section id that names no interactive section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section: {:?}", self.0)
    }
}

impl std::error::Error for UnknownSection {}

// ---------------------------------------------------------------------------
// Dirty flags
// ---------------------------------------------------------------------------

bitflags! {
    /// What changed since the last [`Page::frame`].
    ///
    /// Encoded as a compact `u8` bitset in JSON (`dirty`).
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Dirty: u8 {
        /// A surface published a new pointer position.
        const POINTER = 0b0_0001;
        /// A ripple was spawned or removed.
        const RIPPLES = 0b0_0010;
        /// The nav visibility changed.
        const NAV     = 0b0_0100;
        /// The theme mode changed.
        const THEME   = 0b0_1000;
        /// A section was mounted or unmounted.
        const MOUNT   = 0b1_0000;
    }
}

// ---------------------------------------------------------------------------
// Frame snapshot
// ---------------------------------------------------------------------------

/// Render inputs of one mounted section.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionFrame {
    pub section: Section,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub frame: SurfaceFrame,
}

/// Everything the presentation layer needs for one paint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PageFrame {
    pub theme: ThemeMode,
    pub palette: ResolvedPalette,
    pub nav: NavState,
    pub scroll_offset: f64,
    pub sections: Vec<SectionFrame>,
    /// [`Dirty`] bits of the frame that produced this snapshot.
    pub dirty: u8,
}

impl PageFrame {
    /// Frame of one section, if mounted.
    #[must_use]
    pub fn section(&self, section: Section) -> Option<&SurfaceFrame> {
        self.sections
            .iter()
            .find(|entry| entry.section == section)
            .map(|entry| &entry.frame)
    }

    /// Decoded dirty bits.
    #[must_use]
    pub fn dirty(&self) -> Dirty {
        Dirty::from_bits_truncate(self.dirty)
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Theme, nav gate, background and section surfaces of one page.
#[derive(Debug)]
pub struct Page {
    config: SurfaceConfig,
    theme: ThemeStore,
    gate: ScrollDirectionGate,
    background: Vec<Particle>,
    surfaces: BTreeMap<Section, InteractiveSurface>,
    pending: Dirty,
    last_frame: Dirty,
    destroyed: bool,
}

impl Page {
    /// Validate `config` and build an empty page in dark mode.
    pub fn new(config: SurfaceConfig) -> Result<Self, ConfigError> {
        Self::with_theme(config, ThemeStore::new())
    }

    /// Validate `config` and build an empty page around `theme`.
    pub fn with_theme(config: SurfaceConfig, theme: ThemeStore) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = SeededRng::new(config.particles.seed);
        let background = particles::background_field(config.particles.background_count, &mut rng);
        Ok(Self {
            config,
            theme,
            gate: ScrollDirectionGate::new(config.scroll),
            background,
            surfaces: BTreeMap::new(),
            pending: Dirty::empty(),
            last_frame: Dirty::empty(),
            destroyed: false,
        })
    }

    #[must_use]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    // -- theme --------------------------------------------------------------

    #[must_use]
    pub fn theme(&self) -> ThemeMode {
        self.theme.mode()
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    /// Flip the theme; subscribers run before this returns.
    pub fn toggle_theme(&mut self) -> ThemeMode {
        self.pending |= Dirty::THEME;
        self.theme.toggle()
    }

    /// Listen for theme changes.
    pub fn subscribe_theme<F>(&mut self, listener: F) -> ThemeSubscription
    where
        F: FnMut(ThemeMode) + 'static,
    {
        self.theme.subscribe(listener)
    }

    pub fn unsubscribe_theme(&mut self, subscription: ThemeSubscription) -> bool {
        self.theme.unsubscribe(subscription)
    }

    #[must_use]
    pub fn palette(&self) -> ResolvedPalette {
        self.theme.resolved()
    }

    // -- nav ----------------------------------------------------------------

    #[must_use]
    pub fn nav(&self) -> NavState {
        self.gate.nav()
    }

    #[must_use]
    pub fn nav_visible(&self) -> bool {
        self.gate.is_nav_visible()
    }

    // -- sections -----------------------------------------------------------

    /// Mount the surface of `section` at `bounds`.
    ///
    /// Returns `false` if it is already mounted or the page was destroyed.
    pub fn mount(&mut self, section: Section, bounds: Rect) -> bool {
        if self.destroyed || self.surfaces.contains_key(&section) {
            return false;
        }
        let seed = self.config.particles.seed ^ (section.index() + 1).wrapping_mul(0x9E37_79B9);
        let surface = InteractiveSurface::mount(&self.config, bounds, &mut SeededRng::new(seed));
        self.surfaces.insert(section, surface);
        self.pending |= Dirty::MOUNT;
        folio_core::debug!(section = section.id(), "section mounted");
        true
    }

    /// Unmount `section`, cancelling its timers.
    ///
    /// Returns the number of live ripples dropped, or `None` if it was not
    /// mounted.
    pub fn unmount(&mut self, section: Section) -> Option<usize> {
        let mut surface = self.surfaces.remove(&section)?;
        let dropped = surface.unmount();
        self.pending |= Dirty::MOUNT;
        if dropped > 0 {
            self.pending |= Dirty::RIPPLES;
        }
        folio_core::debug!(section = section.id(), dropped, "section unmounted");
        Some(dropped)
    }

    #[must_use]
    pub fn is_mounted(&self, section: Section) -> bool {
        self.surfaces.contains_key(&section)
    }

    /// Mounted sections in page order.
    pub fn mounted(&self) -> impl Iterator<Item = Section> + '_ {
        self.surfaces.keys().copied()
    }

    /// Surface of a mounted section.
    #[must_use]
    pub fn surface(&self, section: Section) -> Option<&InteractiveSurface> {
        self.surfaces.get(&section)
    }

    /// Update a section's bounding rectangle. Returns `false` if not mounted.
    pub fn set_bounds(&mut self, section: Section, bounds: Rect) -> bool {
        match self.surfaces.get_mut(&section) {
            Some(surface) => {
                surface.set_bounds(bounds);
                true
            }
            None => false,
        }
    }

    /// Background particle field, fixed for the page's lifetime.
    #[must_use]
    pub fn background(&self) -> &[Particle] {
        &self.background
    }

    // -- events and frames --------------------------------------------------

    /// Fan a document event out to every surface and the gate.
    pub fn dispatch(&mut self, event: &SurfaceEvent, now: Duration) {
        if self.destroyed {
            return;
        }
        if let SurfaceEvent::Scroll(scroll) = event {
            self.gate.on_scroll(scroll.offset, now);
            return;
        }
        for surface in self.surfaces.values_mut() {
            if surface.handle_event(event, now).is_some() {
                self.pending |= Dirty::RIPPLES;
            }
        }
    }

    /// Run every frame callback and every timer due at `now`.
    ///
    /// Returns everything that changed since the previous call.
    pub fn frame(&mut self, now: Duration) -> Dirty {
        let span = folio_core::trace_span!("page_frame");
        let _guard = span.enter();
        let mut dirty = std::mem::take(&mut self.pending);
        if !self.destroyed {
            for surface in self.surfaces.values_mut() {
                let tick = surface.frame(now);
                if tick.pointer.is_some() {
                    dirty |= Dirty::POINTER;
                }
                if !tick.expired.is_empty() {
                    dirty |= Dirty::RIPPLES;
                }
            }
            if self.gate.advance(now).is_some() {
                dirty |= Dirty::NAV;
            }
        }
        self.last_frame = dirty;
        dirty
    }

    /// Whether the host should keep its animation frame loop running.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        !self.destroyed
            && (!self.pending.is_empty()
                || self.gate.next_deadline().is_some()
                || self.surfaces.values().any(InteractiveSurface::wants_frame))
    }

    /// Earliest pending deadline across the gate and every surface.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.surfaces
            .values()
            .filter_map(InteractiveSurface::next_deadline)
            .chain(self.gate.next_deadline())
            .min()
    }

    /// Render inputs at `now`.
    #[must_use]
    pub fn snapshot(&self, now: Duration) -> PageFrame {
        PageFrame {
            theme: self.theme.mode(),
            palette: self.theme.resolved(),
            nav: self.gate.nav(),
            scroll_offset: self.gate.last_offset(),
            sections: self
                .surfaces
                .iter()
                .map(|(section, surface)| SectionFrame {
                    section: *section,
                    frame: surface.snapshot(now),
                })
                .collect(),
            dirty: self.last_frame.bits(),
        }
    }

    /// Unmount every section and freeze the gate. Returns the dropped ripple count.
    pub fn destroy(&mut self) -> usize {
        if self.destroyed {
            return 0;
        }
        let sections: Vec<Section> = self.surfaces.keys().copied().collect();
        let dropped: usize = sections
            .into_iter()
            .filter_map(|section| self.unmount(section))
            .sum();
        self.gate.teardown();
        self.destroyed = true;
        folio_core::info!(dropped, "page destroyed");
        dropped
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use folio_core::event::{PointerEvent, ScrollEvent};

    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn page() -> Page {
        let mut page = Page::new(SurfaceConfig::default()).unwrap();
        assert!(page.mount(Section::Hero, Rect::new(0.0, 0.0, 800.0, 600.0)));
        assert!(page.mount(Section::Contact, Rect::new(0.0, 600.0, 800.0, 400.0)));
        page
    }

    #[test]
    fn section_ids_parse() {
        for section in Section::ALL {
            assert_eq!(section.id().parse::<Section>(), Ok(section));
        }
        assert_eq!("#Projects".parse::<Section>(), Ok(Section::Projects));
        assert!("navbar".parse::<Section>().is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SurfaceConfig::default();
        config.ripple.max_live = Some(0);
        assert_eq!(Page::new(config).unwrap_err(), ConfigError::ZeroRippleCap);
    }

    #[test]
    fn mount_is_exclusive() {
        let mut page = page();
        assert!(!page.mount(Section::Hero, Rect::new(0.0, 0.0, 1.0, 1.0)));
        let order: Vec<_> = page.mounted().collect();
        assert_eq!(order, vec![Section::Hero, Section::Contact]);
        assert!(page.frame(ms(0)).contains(Dirty::MOUNT));
        assert!(page.frame(ms(1)).is_empty());
    }

    #[test]
    fn click_reaches_only_the_containing_section() {
        let mut page = page();
        page.frame(ms(0));
        page.dispatch(&SurfaceEvent::Click(PointerEvent::new(100.0, 700.0)), ms(10));
        let frame = page.snapshot(ms(10));
        assert!(frame.section(Section::Hero).unwrap().ripples.is_empty());
        assert_eq!(frame.section(Section::Contact).unwrap().ripples.len(), 1);
        assert!(page.frame(ms(16)).contains(Dirty::RIPPLES));
    }

    #[test]
    fn pointer_frame_marks_dirty() {
        let mut page = page();
        page.frame(ms(0));
        page.dispatch(&SurfaceEvent::PointerMove(PointerEvent::new(400.0, 300.0)), ms(1));
        assert!(page.wants_frame());
        let dirty = page.frame(ms(16));
        assert_eq!(dirty, Dirty::POINTER);
        let hero = page.surface(Section::Hero).unwrap();
        assert_eq!(hero.css_vars()[0].1, "50%");
    }

    #[test]
    fn scroll_drives_nav_through_debounce() {
        let mut page = page();
        page.dispatch(&SurfaceEvent::Scroll(ScrollEvent::new(300.0)), ms(0));
        assert!(page.nav_visible());
        assert!(page.frame(ms(10)).contains(Dirty::NAV));
        assert!(!page.nav_visible());
        assert_eq!(page.snapshot(ms(10)).scroll_offset, 300.0);
    }

    #[test]
    fn toggle_theme_notifies_and_marks_dirty() {
        let mut page = page();
        page.frame(ms(0));
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let _sub = page.subscribe_theme(move |mode| sink.set(Some(mode)));
        assert_eq!(page.toggle_theme(), ThemeMode::Light);
        assert_eq!(seen.get(), Some(ThemeMode::Light));
        assert_eq!(page.frame(ms(1)), Dirty::THEME);
        assert_eq!(page.palette().mode, ThemeMode::Light);
    }

    #[test]
    fn destroy_cancels_everything() {
        let mut page = page();
        page.dispatch(&SurfaceEvent::Click(PointerEvent::new(10.0, 10.0)), ms(0));
        page.dispatch(&SurfaceEvent::Scroll(ScrollEvent::new(500.0)), ms(0));
        assert_eq!(page.destroy(), 1);
        assert_eq!(page.next_deadline(), None);
        page.frame(ms(5000));
        assert!(page.nav_visible());
        assert!(page.snapshot(ms(5000)).sections.is_empty());
        assert!(!page.wants_frame());
        assert!(!page.mount(Section::Hero, Rect::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn background_field_is_stable() {
        let a = Page::new(SurfaceConfig::default()).unwrap();
        let b = Page::new(SurfaceConfig::default()).unwrap();
        assert_eq!(a.background().len(), 50);
        assert_eq!(a.background(), b.background());
    }
}
