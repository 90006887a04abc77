#![forbid(unsafe_code)]

//! Nav bar visibility from scroll direction, with hysteresis.
//!
//! # Algorithm
//!
//! Scroll events are debounced: each event restarts a short quiet window and
//! only the last offset of a burst is sampled. For each sample:
//!
//! - `delta = offset - last_offset`
//! - `Hidden -> Visible` when `delta <= -up_threshold`, at any offset
//! - `Visible -> Hidden` when `offset > min_offset && delta >= down_threshold`
//! - otherwise unchanged
//!
//! `last_offset` becomes `offset` after every sample. The dead zone between
//! the thresholds absorbs jitter; `min_offset` keeps the nav pinned near the
//! top of the page.
//!
//! # Invariants
//!
//! 1. Initial state is `Visible` with `last_offset = 0`.
//! 2. A sample with `|delta|` below both thresholds never changes state.
//! 3. After [`teardown`](ScrollDirectionGate::teardown) the state is frozen.

use std::time::Duration;

use folio_core::timer::{Scheduler, TimerHandle};

use crate::config::ScrollGateConfig;

/// Nav bar visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NavState {
    #[default]
    Visible,
    Hidden,
}

impl NavState {
    #[inline]
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }

    /// Class applied to the nav element.
    #[must_use]
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Visible => "nav-visible",
            Self::Hidden => "nav-hidden",
        }
    }
}

/// Debounced scroll-direction state machine. One per page.
#[derive(Debug)]
pub struct ScrollDirectionGate {
    config: ScrollGateConfig,
    nav: NavState,
    last_offset: f64,
    /// Offset of the current burst, waiting for the debounce window.
    pending: Option<f64>,
    debounce: Option<TimerHandle>,
    timers: Scheduler<()>,
    samples: u64,
    transitions: u64,
    torn_down: bool,
}

impl Default for ScrollDirectionGate {
    fn default() -> Self {
        Self::new(ScrollGateConfig::default())
    }
}

impl ScrollDirectionGate {
    #[must_use]
    pub fn new(config: ScrollGateConfig) -> Self {
        Self {
            config,
            nav: NavState::Visible,
            last_offset: 0.0,
            pending: None,
            debounce: None,
            timers: Scheduler::new(),
            samples: 0,
            transitions: 0,
            torn_down: false,
        }
    }

    /// Record a scroll offset at `now`, restarting the debounce window.
    ///
    /// Non-finite offsets are ignored.
    pub fn on_scroll(&mut self, offset: f64, now: Duration) {
        if self.torn_down || !offset.is_finite() {
            return;
        }
        self.pending = Some(offset);
        if let Some(previous) = self.debounce.take() {
            let _ = self.timers.cancel(previous);
        }
        self.debounce = Some(self.timers.schedule_after(now, self.config.debounce, ()));
    }

    /// Fire the debounce window if it has elapsed by `now`.
    ///
    /// Returns the new state when the sample caused a transition.
    pub fn advance(&mut self, now: Duration) -> Option<NavState> {
        if self.timers.run_due(now).is_empty() {
            return None;
        }
        self.debounce = None;
        let offset = self.pending.take()?;
        self.sample(offset)
    }

    /// Apply one debounced sample immediately.
    ///
    /// Returns the new state when it changed.
    pub fn sample(&mut self, offset: f64) -> Option<NavState> {
        if self.torn_down || !offset.is_finite() {
            return None;
        }
        let delta = offset - self.last_offset;
        self.last_offset = offset;
        self.samples += 1;

        let next = match self.nav {
            NavState::Hidden if delta <= -self.config.up_threshold => NavState::Visible,
            NavState::Visible
                if offset > self.config.min_offset && delta >= self.config.down_threshold =>
            {
                NavState::Hidden
            }
            unchanged => unchanged,
        };
        if next == self.nav {
            return None;
        }
        self.nav = next;
        self.transitions += 1;
        folio_core::debug!(
            nav = next.class_name(),
            offset,
            delta,
            "nav visibility changed"
        );
        Some(next)
    }

    /// Current nav state.
    #[inline]
    #[must_use]
    pub fn nav(&self) -> NavState {
        self.nav
    }

    #[inline]
    #[must_use]
    pub fn is_nav_visible(&self) -> bool {
        self.nav.is_visible()
    }

    /// Offset of the last applied sample.
    #[inline]
    #[must_use]
    pub fn last_offset(&self) -> f64 {
        self.last_offset
    }

    /// When the pending debounce window closes.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Samples applied so far.
    #[must_use]
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// State changes so far.
    #[must_use]
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Cancel the pending debounce and freeze the state.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.debounce.take() {
            let _ = self.timers.cancel(handle);
        }
        self.pending = None;
        self.torn_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn gate_at(offset: f64, nav: NavState) -> ScrollDirectionGate {
        let mut gate = ScrollDirectionGate::default();
        gate.last_offset = offset;
        gate.nav = nav;
        gate
    }

    #[test]
    fn starts_visible_at_top() {
        let gate = ScrollDirectionGate::default();
        assert_eq!(gate.nav(), NavState::Visible);
        assert_eq!(gate.last_offset(), 0.0);
    }

    #[test]
    fn scroll_up_reveals_from_any_offset() {
        let mut gate = gate_at(500.0, NavState::Hidden);
        assert_eq!(gate.sample(485.0), Some(NavState::Visible));

        let mut near_top = gate_at(20.0, NavState::Hidden);
        assert_eq!(near_top.sample(5.0), Some(NavState::Visible));
    }

    #[test]
    fn scroll_down_past_min_offset_hides() {
        let mut gate = gate_at(150.0, NavState::Visible);
        assert_eq!(gate.sample(165.0), Some(NavState::Hidden));
        assert_eq!(gate.last_offset(), 165.0);
    }

    #[test]
    fn scroll_down_near_top_keeps_nav() {
        let mut gate = gate_at(50.0, NavState::Visible);
        assert_eq!(gate.sample(65.0), None);
        assert_eq!(gate.nav(), NavState::Visible);
        assert_eq!(gate.last_offset(), 65.0);
    }

    #[test]
    fn small_deltas_never_change_state() {
        for nav in [NavState::Visible, NavState::Hidden] {
            let mut gate = gate_at(400.0, nav);
            assert_eq!(gate.sample(405.0), None);
            assert_eq!(gate.sample(400.0), None);
            assert_eq!(gate.nav(), nav);
        }
    }

    #[test]
    fn thresholds_are_inclusive() {
        let mut gate = gate_at(200.0, NavState::Visible);
        assert_eq!(gate.sample(210.0), Some(NavState::Hidden));
        assert_eq!(gate.sample(200.0), Some(NavState::Visible));
    }

    #[test]
    fn debounce_keeps_last_offset_of_burst() {
        let mut gate = ScrollDirectionGate::default();
        gate.on_scroll(120.0, ms(0));
        gate.on_scroll(140.0, ms(4));
        gate.on_scroll(300.0, ms(8));
        assert_eq!(gate.advance(ms(17)), None);
        assert_eq!(gate.samples(), 0);
        assert_eq!(gate.advance(ms(18)), Some(NavState::Hidden));
        assert_eq!(gate.samples(), 1);
        assert_eq!(gate.last_offset(), 300.0);
    }

    #[test]
    fn non_finite_offsets_are_ignored() {
        let mut gate = ScrollDirectionGate::default();
        gate.on_scroll(f64::NAN, ms(0));
        assert_eq!(gate.next_deadline(), None);
        assert_eq!(gate.sample(f64::INFINITY), None);
        assert_eq!(gate.last_offset(), 0.0);
    }

    #[test]
    fn teardown_cancels_debounce() {
        let mut gate = ScrollDirectionGate::default();
        gate.on_scroll(500.0, ms(0));
        gate.teardown();
        assert_eq!(gate.advance(ms(100)), None);
        assert_eq!(gate.nav(), NavState::Visible);
        assert_eq!(gate.last_offset(), 0.0);
        gate.on_scroll(900.0, ms(200));
        assert_eq!(gate.next_deadline(), None);
    }
}
