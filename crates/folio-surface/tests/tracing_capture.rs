//! Log points emitted by the engine, captured through a registry layer.
//!
//! Run with `--features tracing`.

#![cfg(feature = "tracing")]

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use folio_core::event::{PointerEvent, ScrollEvent, SurfaceEvent};
use folio_core::geometry::Rect;
use folio_surface::{Page, Section, SurfaceConfig};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<String>>>);

struct MessageVisitor(Option<String>);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.0.lock().unwrap().push(message);
        }
    }
}

#[test]
fn lifecycle_events_are_logged() {
    let capture = Capture::default();
    let subscriber = Registry::default().with(capture.clone());

    tracing::subscriber::with_default(subscriber, || {
        let mut page = Page::new(SurfaceConfig::default()).unwrap();
        page.mount(Section::Hero, Rect::new(0.0, 0.0, 800.0, 600.0));
        page.dispatch(&SurfaceEvent::Click(PointerEvent::new(10.0, 10.0)), Duration::ZERO);
        page.dispatch(&SurfaceEvent::Scroll(ScrollEvent::new(400.0)), Duration::ZERO);
        page.frame(Duration::from_millis(20));
        page.toggle_theme();
        page.frame(Duration::from_millis(1000));
        page.destroy();
    });

    let messages = capture.0.lock().unwrap().clone();
    for expected in [
        "section mounted",
        "ripple spawned",
        "nav visibility changed",
        "theme toggled",
        "ripple expired",
        "page destroyed",
    ] {
        assert!(
            messages.iter().any(|m| m == expected),
            "missing {expected:?} in {messages:?}"
        );
    }
}
