//! Property-based invariant tests for the surface engine.
//!
//! 1. Coalescing: any burst of moves within one frame publishes only the last.
//! 2. Degenerate bounds never publish, so no NaN or infinity escapes.
//! 3. N clicks yield N ripples, and none survives past ttl.
//! 4. Sub-threshold scroll deltas never change nav state.
//! 5. After unmount, no event or timer changes observable state.

use std::time::Duration;

use folio_core::event::{PointerEvent, SurfaceEvent};
use folio_core::geometry::Rect;
use folio_core::rng::SeededRng;
use folio_surface::{
    InteractiveSurface, NavState, PointerTracker, RippleConfig, RippleManager,
    ScrollDirectionGate, SurfaceConfig,
};
use proptest::prelude::*;

fn bounds_strategy() -> impl Strategy<Value = Rect> {
    (-500.0f64..500.0, -500.0f64..500.0, 1.0f64..2000.0, 1.0f64..2000.0)
        .prop_map(|(left, top, width, height)| Rect::new(left, top, width, height))
}

fn point_in(bounds: Rect) -> impl Strategy<Value = (f64, f64)> {
    (0.0f64..0.999, 0.0f64..0.999).prop_map(move |(fx, fy)| {
        (bounds.left + fx * bounds.width, bounds.top + fy * bounds.height)
    })
}

proptest! {
    #[test]
    fn burst_publishes_only_last_sample(
        (bounds, points) in bounds_strategy().prop_flat_map(|b| {
            (Just(b), prop::collection::vec(point_in(b), 1..20))
        })
    ) {
        let mut tracker = PointerTracker::default();
        tracker.set_bounds(bounds);
        for (x, y) in &points {
            tracker.on_pointer_move(&PointerEvent::new(*x, *y));
        }
        let published = tracker.frame();
        let (lx, ly) = points[points.len() - 1];
        let expected = bounds.percent_of(lx, ly);
        prop_assert!(expected.is_some());
        let expected = expected.unwrap();
        let published = published.unwrap();
        prop_assert_eq!((published.x, published.y), (expected.x, expected.y));
        prop_assert_eq!(tracker.published(), 1);
        prop_assert!(tracker.frame().is_none());
    }

    #[test]
    fn degenerate_bounds_never_publish(
        width in prop_oneof![
            Just(0.0f64),
            Just(-4.0),
            Just(f64::NAN),
            Just(f64::INFINITY),
            1.0f64..100.0,
        ],
        height in prop_oneof![Just(0.0f64), Just(-4.0), Just(f64::NAN), 1.0f64..100.0],
        moves in prop::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 1..10),
    ) {
        let bounds = Rect::new(0.0, 0.0, width, height);
        prop_assume!(bounds.is_degenerate());
        let mut tracker = PointerTracker::default();
        tracker.set_bounds(bounds);
        for (x, y) in moves {
            tracker.on_pointer_move(&PointerEvent::new(x, y));
            prop_assert!(tracker.frame().is_none());
        }
        prop_assert_eq!(tracker.published(), 0);
        let position = tracker.position();
        prop_assert!(position.x.is_finite() && position.y.is_finite());
    }

    #[test]
    fn clicks_spawn_then_all_expire(
        (bounds, clicks) in bounds_strategy().prop_flat_map(|b| {
            (Just(b), prop::collection::vec((point_in(b), 0u64..40), 1..96))
        })
    ) {
        let ttl = Duration::from_millis(1000);
        let config = RippleConfig::default().with_ttl(ttl);
        let mut ripples = RippleManager::new(config);
        let mut now = Duration::ZERO;
        let mut ids = Vec::new();
        for ((x, y), gap) in &clicks {
            now += Duration::from_millis(*gap);
            // Expire before clicking so live ripples are all younger than ttl.
            for id in ripples.advance(now) {
                let created = ids.iter().position(|(i, _)| *i == id);
                prop_assert!(created.is_some());
                let (_, at) = ids[created.unwrap()];
                prop_assert!(now >= at + ttl, "ripple removed before its ttl");
            }
            let id = ripples.on_click(&PointerEvent::new(*x, *y), bounds, now);
            prop_assert!(id.is_some());
            ids.push((id.unwrap(), now));
        }
        prop_assert!(ripples.ripples().all(|r| now.saturating_sub(r.created_at) < ttl));
        let younger = ids.iter().filter(|(_, at)| now < *at + ttl).count();
        prop_assert_eq!(ripples.len(), younger);
        ripples.advance(now + ttl);
        prop_assert!(ripples.is_empty());
        prop_assert_eq!(ripples.spawned(), clicks.len() as u64);
        prop_assert_eq!(ripples.removed(), ripples.spawned());
    }

    #[test]
    fn small_deltas_never_flip_nav(
        start in 0.0f64..5000.0,
        hidden in any::<bool>(),
        deltas in prop::collection::vec(-9.99f64..9.99, 1..50),
    ) {
        let mut gate = ScrollDirectionGate::default();
        gate.sample(start);
        if hidden {
            // Force the hidden state with a decisive downward move.
            gate.sample(start + 500.0);
        }
        let nav = gate.nav();
        let mut offset = gate.last_offset();
        for delta in deltas {
            offset += delta;
            prop_assert_eq!(gate.sample(offset), None);
        }
        prop_assert_eq!(gate.nav(), nav);
    }

    #[test]
    fn unmounted_surface_is_frozen(
        events in prop::collection::vec((0.0f64..400.0, 0.0f64..400.0, any::<bool>()), 1..30),
        advance_ms in 0u64..10_000,
    ) {
        let bounds = Rect::new(0.0, 0.0, 400.0, 400.0);
        let mut surface =
            InteractiveSurface::mount(&SurfaceConfig::default(), bounds, &mut SeededRng::new(1));
        let half = events.len() / 2;
        for (i, (x, y, click)) in events.iter().enumerate() {
            let pointer = PointerEvent::new(*x, *y);
            let event = if *click {
                SurfaceEvent::Click(pointer)
            } else {
                SurfaceEvent::PointerMove(pointer)
            };
            let now = Duration::from_millis(i as u64);
            if i == half {
                surface.unmount();
            }
            surface.handle_event(&event, now);
            if i >= half {
                prop_assert!(surface.frame(now + Duration::from_millis(advance_ms)).is_empty());
            } else {
                surface.frame(now);
            }
        }
        let frozen = surface.pointer_position();
        prop_assert!(surface.frame(Duration::from_secs(60)).is_empty());
        prop_assert_eq!(surface.pointer_position(), frozen);
        prop_assert_eq!(surface.ripple_count(), 0);
        prop_assert!(!surface.wants_frame());
    }
}

#[test]
fn hysteresis_reference_cases() {
    let mut gate = ScrollDirectionGate::default();
    assert_eq!(gate.sample(160.0), Some(NavState::Hidden));
    assert_eq!(gate.sample(150.0), Some(NavState::Visible));
    assert_eq!(gate.sample(165.0), Some(NavState::Hidden));
    assert_eq!(gate.sample(150.0), Some(NavState::Visible));

    let mut near_top = ScrollDirectionGate::default();
    near_top.sample(50.0);
    assert_eq!(near_top.sample(65.0), None);
    assert_eq!(near_top.nav(), NavState::Visible);
}
