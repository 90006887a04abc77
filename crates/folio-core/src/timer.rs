#![forbid(unsafe_code)]

//! Cancellable scheduled work for single-threaded, host-driven components.
//!
//! A [`Scheduler`] holds two kinds of pending work, each tagged with an
//! owner-defined payload `T`:
//!
//! - **Frame callbacks** ([`request_frame`](Scheduler::request_frame)): run at
//!   the next paint, when the host calls [`run_frame`](Scheduler::run_frame).
//! - **Deadlines** ([`schedule_at`](Scheduler::schedule_at)): run once the host
//!   calls [`run_due`](Scheduler::run_due) with `now >= deadline`.
//!
//! Scheduling returns a [`TimerHandle`]; [`cancel`](Scheduler::cancel)
//! consumes it. Fired work is handed back to the owner as payloads instead of
//! invoking closures, so the owner applies it against its own state and a
//! torn-down owner simply never asks.
//!
//! # Usage
//!
//! ```
//! use std::time::Duration;
//! use folio_core::timer::Scheduler;
//!
//! let mut timers = Scheduler::new();
//! let keep = timers.schedule_at(Duration::from_millis(10), "keep");
//! let drop_me = timers.schedule_at(Duration::from_millis(5), "drop");
//! assert_eq!(timers.cancel(drop_me), Some("drop"));
//!
//! assert!(timers.run_due(Duration::from_millis(9)).is_empty());
//! assert_eq!(timers.run_due(Duration::from_millis(10)), vec!["keep"]);
//! assert!(!timers.is_pending(&keep));
//! ```
//!
//! # Invariants
//!
//! 1. Every scheduled payload is returned exactly once: by `cancel`, by
//!    `run_frame`/`run_due`, or by `cancel_all`.
//! 2. `run_due` returns payloads ordered by deadline, ties by scheduling order.
//! 3. A deadline never fires before `now >= deadline`.
//! 4. Cancelling a handle whose work already fired is a no-op returning `None`.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Identifier of one scheduled piece of work. Never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Raw id value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Proof of a scheduled piece of work, consumed by [`Scheduler::cancel`].
///
/// Deliberately not `Clone`: one handle, one cancellation.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a TimerHandle leaves the work scheduled with no way to cancel it"]
pub struct TimerHandle {
    id: TimerId,
}

impl TimerHandle {
    /// Id of the scheduled work.
    #[inline]
    pub const fn id(&self) -> TimerId {
        self.id
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Frame,
    Deadline(Duration),
}

/// Pending frame callbacks and deadlines for one owner.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    frames: BTreeMap<u64, T>,
    deadlines: BTreeMap<(Duration, u64), T>,
    slots: HashMap<u64, Slot>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            frames: BTreeMap::new(),
            deadlines: BTreeMap::new(),
            slots: HashMap::new(),
        }
    }

    fn mint(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Run `payload` at the next frame boundary.
    pub fn request_frame(&mut self, payload: T) -> TimerHandle {
        let id = self.mint();
        self.frames.insert(id, payload);
        self.slots.insert(id, Slot::Frame);
        TimerHandle { id: TimerId(id) }
    }

    /// Run `payload` once the host time reaches `deadline`.
    pub fn schedule_at(&mut self, deadline: Duration, payload: T) -> TimerHandle {
        let id = self.mint();
        self.deadlines.insert((deadline, id), payload);
        self.slots.insert(id, Slot::Deadline(deadline));
        TimerHandle { id: TimerId(id) }
    }

    /// Run `payload` after `delay` has elapsed from `now`.
    pub fn schedule_after(&mut self, now: Duration, delay: Duration, payload: T) -> TimerHandle {
        self.schedule_at(now.saturating_add(delay), payload)
    }

    /// Cancel scheduled work, returning its payload if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let id = handle.id.0;
        match self.slots.remove(&id)? {
            Slot::Frame => self.frames.remove(&id),
            Slot::Deadline(deadline) => self.deadlines.remove(&(deadline, id)),
        }
    }

    /// Whether the work behind `handle` is still pending.
    #[must_use]
    pub fn is_pending(&self, handle: &TimerHandle) -> bool {
        self.slots.contains_key(&handle.id.0)
    }

    /// Take every pending frame callback, in request order.
    pub fn run_frame(&mut self) -> Vec<T> {
        let frames = std::mem::take(&mut self.frames);
        frames
            .into_iter()
            .map(|(id, payload)| {
                self.slots.remove(&id);
                payload
            })
            .collect()
    }

    /// Take every deadline at or before `now`, ordered by deadline.
    pub fn run_due(&mut self, now: Duration) -> Vec<T> {
        let mut fired = Vec::new();
        while let Some(entry) = self.deadlines.first_entry() {
            let (deadline, id) = *entry.key();
            if deadline > now {
                break;
            }
            fired.push(entry.remove());
            self.slots.remove(&id);
        }
        fired
    }

    /// Earliest pending deadline, if any.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.deadlines.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Whether a frame callback is waiting for the next paint.
    #[must_use]
    pub fn has_frame_request(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Number of pending frame callbacks and deadlines.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop all pending work, returning how many entries were cancelled.
    ///
    /// Handles still held by the owner become stale; cancelling them later
    /// returns `None`.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.slots.len();
        self.frames.clear();
        self.deadlines.clear();
        self.slots.clear();
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn deadline_does_not_fire_early() {
        let mut timers = Scheduler::new();
        let _h = timers.schedule_at(ms(100), 1);
        assert!(timers.run_due(ms(99)).is_empty());
        assert_eq!(timers.run_due(ms(100)), vec![1]);
        assert!(timers.is_idle());
    }

    #[test]
    fn due_order_is_deadline_then_insertion() {
        let mut timers = Scheduler::new();
        let _a = timers.schedule_at(ms(30), "c");
        let _b = timers.schedule_at(ms(10), "a");
        let _c = timers.schedule_at(ms(10), "b");
        assert_eq!(timers.run_due(ms(50)), vec!["a", "b", "c"]);
    }

    #[test]
    fn cancel_returns_payload_once() {
        let mut timers = Scheduler::new();
        let h = timers.schedule_after(ms(5), ms(10), 7);
        assert!(timers.is_pending(&h));
        assert_eq!(timers.next_deadline(), Some(ms(15)));
        assert_eq!(timers.cancel(h), Some(7));
        assert!(timers.run_due(ms(100)).is_empty());
    }

    #[test]
    fn cancel_after_fire_is_noop() {
        let mut timers = Scheduler::new();
        let h = timers.schedule_at(ms(1), ());
        assert_eq!(timers.run_due(ms(1)).len(), 1);
        assert!(!timers.is_pending(&h));
        assert_eq!(timers.cancel(h), None);
    }

    #[test]
    fn frame_requests_run_once_in_order() {
        let mut timers = Scheduler::new();
        let _a = timers.request_frame('a');
        let _b = timers.request_frame('b');
        assert!(timers.has_frame_request());
        assert_eq!(timers.run_frame(), vec!['a', 'b']);
        assert!(timers.run_frame().is_empty());
        assert!(!timers.has_frame_request());
    }

    #[test]
    fn frames_are_not_deadlines() {
        let mut timers = Scheduler::new();
        let _f = timers.request_frame(1);
        assert!(timers.run_due(Duration::MAX).is_empty());
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn cancel_frame_request() {
        let mut timers = Scheduler::new();
        let h = timers.request_frame(3);
        assert_eq!(timers.cancel(h), Some(3));
        assert!(timers.run_frame().is_empty());
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut timers = Scheduler::new();
        let stale = timers.schedule_at(ms(10), 1);
        let _f = timers.request_frame(2);
        assert_eq!(timers.cancel_all(), 2);
        assert!(timers.is_idle());
        assert_eq!(timers.cancel(stale), None);
        assert!(timers.run_due(ms(100)).is_empty());
    }

    #[test]
    fn ids_are_never_reused() {
        let mut timers = Scheduler::new();
        let a = timers.schedule_at(ms(1), ());
        let a_id = a.id();
        let _ = timers.cancel(a);
        let b = timers.schedule_at(ms(1), ());
        assert_ne!(a_id, b.id());
    }
}
