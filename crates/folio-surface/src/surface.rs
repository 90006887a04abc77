#![forbid(unsafe_code)]

//! One interactive section: a pointer tracker and a ripple set scoped to a
//! single container, plus its floating particles.
//!
//! The surface owns lifecycle. [`mount`](InteractiveSurface::mount) builds the
//! trackers; [`unmount`](InteractiveSurface::unmount) cancels every pending
//! frame and removal. Events and frames after unmount are ignored.

use std::time::Duration;

use folio_core::event::SurfaceEvent;
use folio_core::geometry::Rect;
use folio_core::rng::SeededRng;

use crate::config::SurfaceConfig;
use crate::particles::{self, Particle};
use crate::pointer::{PointerPosition, PointerTracker};
use crate::ripple::{RippleId, RippleManager, RippleView};

/// What one call to [`InteractiveSurface::frame`] changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceTick {
    /// Newly published pointer position.
    pub pointer: Option<PointerPosition>,
    /// Ripples whose lifetime ended.
    pub expired: Vec<RippleId>,
}

impl SurfaceTick {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointer.is_none() && self.expired.is_empty()
    }
}

/// Render inputs of one surface at one instant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceFrame {
    pub pointer: PointerPosition,
    pub ripples: Vec<RippleView>,
}

/// Pointer tracking and click ripples for one container.
#[derive(Debug)]
pub struct InteractiveSurface {
    pointer: PointerTracker,
    ripples: RippleManager,
    floaters: Vec<Particle>,
    mounted: bool,
}

impl InteractiveSurface {
    /// Build the trackers for a container at `bounds`.
    ///
    /// Floater heights are drawn from `rng` once and kept for the surface's
    /// lifetime.
    #[must_use]
    pub fn mount(config: &SurfaceConfig, bounds: Rect, rng: &mut SeededRng) -> Self {
        let mut pointer = PointerTracker::new(config.pointer);
        pointer.set_bounds(bounds);
        Self {
            pointer,
            ripples: RippleManager::new(config.ripple),
            floaters: particles::floaters(config.particles.floater_count, rng),
            mounted: true,
        }
    }

    /// Whether the surface is still mounted.
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Update the container bounding rectangle (after layout, resize or scroll).
    pub fn set_bounds(&mut self, bounds: Rect) {
        if self.mounted {
            self.pointer.set_bounds(bounds);
        }
    }

    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.pointer.bounds()
    }

    /// Feed a document-wide event. The surface filters by its own bounds.
    ///
    /// Returns the id of a ripple spawned by a click.
    pub fn handle_event(&mut self, event: &SurfaceEvent, now: Duration) -> Option<RippleId> {
        if !self.mounted {
            return None;
        }
        match event {
            SurfaceEvent::PointerMove(pointer) => {
                self.pointer.on_pointer_move(pointer);
                None
            }
            SurfaceEvent::Click(pointer) => {
                self.ripples.on_click(pointer, self.pointer.bounds(), now)
            }
            SurfaceEvent::Scroll(_) => None,
        }
    }

    /// Run the frame callback and any ripple removals due at `now`.
    pub fn frame(&mut self, now: Duration) -> SurfaceTick {
        if !self.mounted {
            return SurfaceTick::default();
        }
        SurfaceTick {
            pointer: self.pointer.frame(),
            expired: self.ripples.advance(now),
        }
    }

    /// Whether the next animation frame has work for this surface.
    #[must_use]
    pub fn wants_frame(&self) -> bool {
        self.mounted && (self.pointer.wants_frame() || !self.ripples.is_empty())
    }

    /// Earliest ripple removal.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.ripples.next_expiry()
    }

    /// Last published pointer position.
    #[inline]
    #[must_use]
    pub fn pointer_position(&self) -> PointerPosition {
        self.pointer.position()
    }

    /// `--mouse-x` / `--mouse-y` for the container element.
    #[must_use]
    pub fn css_vars(&self) -> [(&'static str, String); 2] {
        self.pointer.position().css_vars()
    }

    /// Live ripples as position and age, in creation order.
    #[must_use]
    pub fn ripples(&self, now: Duration) -> Vec<RippleView> {
        self.ripples.views(now)
    }

    /// Number of live ripples.
    #[must_use]
    pub fn ripple_count(&self) -> usize {
        self.ripples.len()
    }

    /// Floating particles, fixed at mount.
    #[must_use]
    pub fn floaters(&self) -> &[Particle] {
        &self.floaters
    }

    /// Render inputs at `now`.
    #[must_use]
    pub fn snapshot(&self, now: Duration) -> SurfaceFrame {
        SurfaceFrame {
            pointer: self.pointer_position(),
            ripples: self.ripples(now),
        }
    }

    /// Tear down: cancel the pending frame and every ripple removal.
    ///
    /// Returns how many live ripples were dropped. Calling it twice is a no-op.
    pub fn unmount(&mut self) -> usize {
        if !self.mounted {
            return 0;
        }
        self.mounted = false;
        self.pointer.teardown();
        self.ripples.teardown()
    }
}

#[cfg(test)]
mod tests {
    use folio_core::event::{PointerEvent, ScrollEvent};

    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn surface() -> InteractiveSurface {
        InteractiveSurface::mount(
            &SurfaceConfig::default(),
            Rect::new(0.0, 100.0, 400.0, 200.0),
            &mut SeededRng::new(9),
        )
    }

    #[test]
    fn move_then_frame_updates_css_vars() {
        let mut surface = surface();
        surface.handle_event(&SurfaceEvent::PointerMove(PointerEvent::new(100.0, 150.0)), ms(0));
        let tick = surface.frame(ms(16));
        assert_eq!(tick.pointer, Some(PointerPosition::new(25.0, 25.0)));
        assert_eq!(surface.css_vars()[0].1, "25%");
    }

    #[test]
    fn click_spawns_ripple_and_frame_expires_it() {
        let mut surface = surface();
        let click = SurfaceEvent::Click(PointerEvent::new(40.0, 120.0));
        let id = surface.handle_event(&click, ms(0)).unwrap();
        let views = surface.ripples(ms(250));
        assert_eq!(views.len(), 1);
        assert_eq!((views[0].x, views[0].y), (40.0, 20.0));
        assert_eq!(views[0].age_ms, 250);
        assert!(surface.wants_frame());

        assert_eq!(surface.frame(ms(1000)).expired, vec![id]);
        assert_eq!(surface.ripple_count(), 0);
        assert!(!surface.wants_frame());
    }

    #[test]
    fn scroll_is_not_a_surface_event() {
        let mut surface = surface();
        let scroll = SurfaceEvent::Scroll(ScrollEvent::new(50.0));
        assert!(surface.handle_event(&scroll, ms(0)).is_none());
        assert!(surface.frame(ms(16)).is_empty());
    }

    #[test]
    fn unmount_before_ttl_freezes_state() {
        let mut surface = surface();
        let click = SurfaceEvent::Click(PointerEvent::new(40.0, 120.0));
        surface.handle_event(&click, ms(0));
        surface.handle_event(&SurfaceEvent::PointerMove(PointerEvent::new(200.0, 200.0)), ms(1));
        let before = surface.pointer_position();

        assert_eq!(surface.unmount(), 1);
        assert_eq!(surface.unmount(), 0);
        assert!(surface.frame(ms(5000)).is_empty());
        assert!(surface.handle_event(&click, ms(6000)).is_none());
        assert_eq!(surface.pointer_position(), before);
        assert_eq!(surface.next_deadline(), None);
    }

    #[test]
    fn floaters_follow_seed() {
        let a = surface();
        let b = surface();
        assert_eq!(a.floaters().len(), 5);
        assert_eq!(a.floaters(), b.floaters());
    }
}
