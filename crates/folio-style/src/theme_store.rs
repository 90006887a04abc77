#![forbid(unsafe_code)]

//! Process-wide theme state.
//!
//! [`ThemeStore`] holds the one authoritative [`ThemeMode`]. [`toggle`] is
//! the only mutation; it notifies every subscriber synchronously, in
//! subscription order, before returning. A host that re-renders after the
//! call therefore never observes a stale mode.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use folio_style::{ThemeMode, ThemeStore};
//!
//! let mut store = ThemeStore::new();
//! let seen = Rc::new(Cell::new(None));
//! let sink = Rc::clone(&seen);
//! let sub = store.subscribe(move |mode| sink.set(Some(mode)));
//!
//! assert_eq!(store.toggle(), ThemeMode::Light);
//! assert_eq!(seen.get(), Some(ThemeMode::Light));
//! assert!(store.unsubscribe(sub));
//! ```
//!
//! [`toggle`]: ThemeStore::toggle

use std::fmt;

use crate::theme::{Palette, ResolvedPalette, ThemeMode};

/// Identifier of one theme subscriber.
pub type SubId = u64;

/// Registration token returned by [`ThemeStore::subscribe`], consumed by
/// [`ThemeStore::unsubscribe`].
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "dropping a ThemeSubscription leaves the listener registered"]
pub struct ThemeSubscription {
    id: SubId,
}

impl ThemeSubscription {
    /// Subscriber id.
    #[inline]
    pub const fn id(&self) -> SubId {
        self.id
    }
}

type Listener = Box<dyn FnMut(ThemeMode)>;

/// The single authoritative theme mode plus its listeners.
pub struct ThemeStore {
    mode: ThemeMode,
    palette: Palette,
    revision: u64,
    next_id: SubId,
    listeners: Vec<(SubId, Listener)>,
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemeStore")
            .field("mode", &self.mode)
            .field("revision", &self.revision)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl ThemeStore {
    /// Create a store in [`ThemeMode::Dark`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(ThemeMode::default())
    }

    /// Create a store with an explicit initial mode.
    #[must_use]
    pub fn with_mode(mode: ThemeMode) -> Self {
        Self {
            mode,
            palette: Palette::default(),
            revision: 0,
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Current mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    /// Whether the current mode is dark.
    #[inline]
    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.mode.is_dark()
    }

    /// Number of committed toggles.
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Palette resolved for the current mode.
    #[must_use]
    pub fn resolved(&self) -> ResolvedPalette {
        self.palette.resolve(self.mode)
    }

    /// Flip the mode and notify every subscriber before returning.
    pub fn toggle(&mut self) -> ThemeMode {
        self.mode = self.mode.toggled();
        self.revision += 1;
        folio_core::info!(
            mode = self.mode.class_name(),
            revision = self.revision,
            listeners = self.listeners.len(),
            "theme toggled"
        );
        let mode = self.mode;
        for (_, listener) in &mut self.listeners {
            listener(mode);
        }
        mode
    }

    /// Register a listener called with the new mode after each toggle.
    pub fn subscribe<F>(&mut self, listener: F) -> ThemeSubscription
    where
        F: FnMut(ThemeMode) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        ThemeSubscription { id }
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, subscription: ThemeSubscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.id);
        self.listeners.len() != before
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}
