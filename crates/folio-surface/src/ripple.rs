#![forbid(unsafe_code)]

//! Self-expiring click ripples.
//!
//! Each primary click inside the container inserts a [`Ripple`] and schedules
//! its removal `ttl` later. The host drives removals with
//! [`advance`](RippleManager::advance).
//!
//! # Invariants
//!
//! 1. Ids are strictly increasing per manager and never reused.
//! 2. A ripple is removed exactly once: by its timer, by eviction when an
//!    optional live cap is configured, or by teardown.
//! 3. Without a cap, a ripple is never removed before `created_at + ttl`.
//! 4. Live ripples iterate in insertion order.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use folio_core::animation::{ease_out, progress};
use folio_core::event::{PointerButton, PointerEvent};
use folio_core::geometry::Rect;
use folio_core::timer::{Scheduler, TimerHandle};

use crate::config::RippleConfig;

/// Unique ripple identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RippleId(u64);

impl RippleId {
    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RippleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ripple-{}", self.0)
    }
}

/// One live ripple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub id: RippleId,
    /// Container-relative x in CSS pixels.
    pub x: f64,
    /// Container-relative y in CSS pixels.
    pub y: f64,
    /// Host time of the click.
    pub created_at: Duration,
}

impl Ripple {
    /// Time since the click. Zero if `now` precedes creation.
    #[inline]
    #[must_use]
    pub fn age(&self, now: Duration) -> Duration {
        now.saturating_sub(self.created_at)
    }

    /// Render values for this ripple at `now`.
    #[must_use]
    pub fn view(&self, now: Duration, ttl: Duration) -> RippleView {
        let age = self.age(now);
        let t = progress(age, ttl);
        RippleView {
            id: self.id,
            x: self.x,
            y: self.y,
            age_ms: u64::try_from(age.as_millis()).unwrap_or(u64::MAX),
            progress: t,
            scale: ease_out(t),
            opacity: 1.0 - t,
        }
    }
}

/// Position and age of a ripple, ready for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RippleView {
    pub id: RippleId,
    pub x: f64,
    pub y: f64,
    pub age_ms: u64,
    /// Linear progress through the lifetime, in `[0, 1]`.
    pub progress: f32,
    /// Eased ring scale, in `[0, 1]`.
    pub scale: f32,
    /// `1 - progress`.
    pub opacity: f32,
}

impl RippleView {
    /// Inline style positioning the ripple element.
    #[must_use]
    pub fn style(&self) -> String {
        format!("left: {}px; top: {}px", self.x, self.y)
    }
}

#[derive(Debug)]
struct Entry {
    ripple: Ripple,
    removal: TimerHandle,
}

/// Live ripples for one container.
#[derive(Debug)]
pub struct RippleManager {
    config: RippleConfig,
    next_id: u64,
    live: BTreeMap<RippleId, Entry>,
    timers: Scheduler<RippleId>,
    spawned: u64,
    removed: u64,
    torn_down: bool,
}

impl Default for RippleManager {
    fn default() -> Self {
        Self::new(RippleConfig::default())
    }
}

impl RippleManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new(config: RippleConfig) -> Self {
        Self {
            config,
            next_id: 0,
            live: BTreeMap::new(),
            timers: Scheduler::new(),
            spawned: 0,
            removed: 0,
            torn_down: false,
        }
    }

    /// Ripple lifetime.
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Spawn a ripple for a click at `now`.
    ///
    /// Returns `None` for non-primary buttons, clicks outside `bounds`, or
    /// after teardown.
    pub fn on_click(
        &mut self,
        event: &PointerEvent,
        bounds: Rect,
        now: Duration,
    ) -> Option<RippleId> {
        if self.torn_down || event.button != PointerButton::Primary {
            return None;
        }
        if !bounds.contains(event.client_x, event.client_y) {
            return None;
        }

        let id = RippleId(self.next_id);
        self.next_id += 1;

        if let Some(cap) = self.config.max_live {
            while self.live.len() >= cap.max(1) {
                self.evict_oldest();
            }
        }

        let local = bounds.relative(event.client_x, event.client_y);
        let removal = self.timers.schedule_after(now, self.config.ttl, id);
        self.live.insert(
            id,
            Entry {
                ripple: Ripple {
                    id,
                    x: local.x,
                    y: local.y,
                    created_at: now,
                },
                removal,
            },
        );
        self.spawned += 1;
        folio_core::debug!(
            id = id.get(),
            x = local.x,
            y = local.y,
            live = self.live.len(),
            "ripple spawned"
        );
        Some(id)
    }

    fn evict_oldest(&mut self) {
        if let Some((_, entry)) = self.live.pop_first() {
            let _ = self.timers.cancel(entry.removal);
            self.removed += 1;
            folio_core::debug!(id = entry.ripple.id.get(), "ripple evicted at live cap");
        }
    }

    /// Remove every ripple whose lifetime ended at or before `now`.
    ///
    /// Returns the removed ids in expiry order.
    pub fn advance(&mut self, now: Duration) -> Vec<RippleId> {
        let due = self.timers.run_due(now);
        let mut removed = Vec::with_capacity(due.len());
        for id in due {
            if self.live.remove(&id).is_some() {
                self.removed += 1;
                folio_core::trace!(id = id.get(), "ripple expired");
                removed.push(id);
            }
        }
        removed
    }

    /// Live ripples in insertion order.
    pub fn ripples(&self) -> impl Iterator<Item = &Ripple> + '_ {
        self.live.values().map(|entry| &entry.ripple)
    }

    /// Render values for every live ripple at `now`.
    #[must_use]
    pub fn views(&self, now: Duration) -> Vec<RippleView> {
        self.ripples().map(|r| r.view(now, self.config.ttl)).collect()
    }

    /// Look up one ripple.
    #[must_use]
    pub fn get(&self, id: RippleId) -> Option<&Ripple> {
        self.live.get(&id).map(|entry| &entry.ripple)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Earliest pending removal.
    #[must_use]
    pub fn next_expiry(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Ripples created so far.
    #[must_use]
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Ripples removed so far, by any path.
    #[must_use]
    pub fn removed(&self) -> u64 {
        self.removed
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Cancel every pending removal and drop all ripples.
    ///
    /// Returns how many ripples were dropped.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.live.len();
        for (_, entry) in std::mem::take(&mut self.live) {
            let _ = self.timers.cancel(entry.removal);
        }
        self.removed += dropped as u64;
        self.torn_down = true;
        folio_core::debug!(dropped, "ripple manager torn down");
        dropped
    }
}
