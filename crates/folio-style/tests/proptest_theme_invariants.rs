//! Property-based invariant tests for the theme store.
//!
//! 1. An even number of toggles restores the initial mode.
//! 2. Every subscriber observes every toggle, with the mode the store reports.
//! 3. Hex formatting parses back to the same color.

use std::cell::RefCell;
use std::rc::Rc;

use folio_style::{Rgb, ThemeMode, ThemeStore};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parity_of_toggles_decides_mode(toggles in 0usize..64, start_dark in any::<bool>()) {
        let start = ThemeMode::from_is_dark(start_dark);
        let mut store = ThemeStore::with_mode(start);
        for _ in 0..toggles {
            store.toggle();
        }
        let expected = if toggles % 2 == 0 { start } else { start.toggled() };
        prop_assert_eq!(store.mode(), expected);
        prop_assert_eq!(store.revision(), toggles as u64);
    }

    #[test]
    fn subscribers_never_observe_stale_mode(toggles in 1usize..32, listeners in 1usize..6) {
        let mut store = ThemeStore::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut subs = Vec::new();
        for _ in 0..listeners {
            let sink = Rc::clone(&seen);
            subs.push(store.subscribe(move |mode| sink.borrow_mut().push(mode)));
        }
        for _ in 0..toggles {
            let mode = store.toggle();
            let seen = seen.borrow();
            prop_assert!(seen[seen.len() - listeners..].iter().all(|m| *m == mode));
        }
        prop_assert_eq!(seen.borrow().len(), toggles * listeners);
        for sub in subs {
            prop_assert!(store.unsubscribe(sub));
        }
    }

    #[test]
    fn css_hex_parses_back(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = Rgb::new(r, g, b);
        prop_assert_eq!(Rgb::parse_hex(&color.to_css_hex()), Ok(color));
    }
}
