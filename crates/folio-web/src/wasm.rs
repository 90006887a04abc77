#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use folio_core::clock::{Clock, MonotonicClock};
use folio_core::event::{PointerButton, PointerEvent, ScrollEvent, SurfaceEvent};
use folio_core::geometry::Rect;
use folio_surface::{Dirty, Page, RippleId, Section, SurfaceConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, MouseEvent, Window};

const OVERLAY_CLASS: &str = "interactive-overlay";
const RIPPLE_CLASS: &str = "interactive-click-ripple";
const FLOATER_CLASS: &str = "interactive-floating-particle";
const BACKGROUND_CLASS: &str = "particle";
const NAV_HIDDEN_CLASS: &str = "nav-hidden";

fn js_err(err: impl fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn client_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

// ---------------------------------------------------------------------------
// Host state
// ---------------------------------------------------------------------------

/// DOM nodes owned by one mounted section.
struct MountedSection {
    element: HtmlElement,
    overlay: Element,
    ripples: HashMap<RippleId, Element>,
}

struct Host {
    page: Page,
    clock: MonotonicClock,
    document: Document,
    sections: BTreeMap<Section, MountedSection>,
}

impl Host {
    fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Client rects move with scrolling and layout; read them before use.
    fn refresh_bounds(&mut self) {
        for (section, mounted) in &self.sections {
            self.page.set_bounds(*section, client_rect(&mounted.element));
        }
    }

    fn dispatch(&mut self, event: SurfaceEvent) {
        let now = self.now();
        if event.pointer().is_some() {
            self.refresh_bounds();
        }
        self.page.dispatch(&event, now);
    }

    fn paint(&mut self) -> Result<(), JsValue> {
        let now = self.now();
        self.refresh_bounds();
        let dirty = self.page.frame(now);

        if dirty.contains(Dirty::THEME) {
            self.apply_theme()?;
        }
        if dirty.contains(Dirty::NAV) {
            self.apply_nav()?;
        }
        if dirty.intersects(Dirty::POINTER | Dirty::MOUNT) {
            for (section, mounted) in &self.sections {
                if let Some(surface) = self.page.surface(*section) {
                    let style = mounted.element.style();
                    for (name, value) in surface.css_vars() {
                        style.set_property(name, &value)?;
                    }
                }
            }
        }
        if dirty.contains(Dirty::RIPPLES) {
            self.sync_ripples(now)?;
        }
        Ok(())
    }

    fn sync_ripples(&mut self, now: Duration) -> Result<(), JsValue> {
        for (section, mounted) in &mut self.sections {
            let Some(surface) = self.page.surface(*section) else {
                continue;
            };
            let views = surface.ripples(now);
            mounted.ripples.retain(|id, node| {
                let live = views.iter().any(|view| view.id == *id);
                if !live {
                    node.remove();
                }
                live
            });
            for view in views {
                if mounted.ripples.contains_key(&view.id) {
                    continue;
                }
                let node = self.document.create_element("div")?;
                node.set_class_name(RIPPLE_CLASS);
                node.set_attribute("style", &view.style())?;
                mounted.overlay.append_child(&node)?;
                mounted.ripples.insert(view.id, node);
            }
        }
        Ok(())
    }

    fn apply_theme(&self) -> Result<(), JsValue> {
        let Some(root) = self.document.document_element() else {
            return Ok(());
        };
        let palette = self.page.palette();
        let classes = root.class_list();
        classes.toggle_with_force("dark", palette.mode.is_dark())?;
        classes.toggle_with_force("light", !palette.mode.is_dark())?;
        if let Some(root) = root.dyn_ref::<HtmlElement>() {
            let style = root.style();
            for (name, value) in palette.css_vars() {
                style.set_property(name, &value)?;
            }
        }
        Ok(())
    }

    fn apply_nav(&self) -> Result<(), JsValue> {
        if let Some(root) = self.document.document_element() {
            root.class_list()
                .toggle_with_force(NAV_HIDDEN_CLASS, !self.page.nav_visible())?;
        }
        Ok(())
    }

    fn mount(&mut self, section: Section, element: HtmlElement) -> Result<bool, JsValue> {
        if !self.page.mount(section, client_rect(&element)) {
            return Ok(false);
        }
        let overlay = self.document.create_element("div")?;
        overlay.set_class_name(OVERLAY_CLASS);
        if let Some(surface) = self.page.surface(section) {
            for particle in surface.floaters() {
                let node = self.document.create_element("div")?;
                node.set_class_name(FLOATER_CLASS);
                node.set_attribute("style", &particle.style())?;
                overlay.append_child(&node)?;
            }
        }
        element.prepend_with_node_1(&overlay)?;
        self.sections.insert(
            section,
            MountedSection {
                element,
                overlay,
                ripples: HashMap::new(),
            },
        );
        Ok(true)
    }

    fn unmount(&mut self, section: Section) -> Option<usize> {
        let dropped = self.page.unmount(section)?;
        if let Some(mounted) = self.sections.remove(&section) {
            // Removing the overlay also removes every ripple node.
            mounted.overlay.remove();
        }
        Some(dropped)
    }
}

// ---------------------------------------------------------------------------
// Listener and frame-loop bookkeeping
// ---------------------------------------------------------------------------

type EventCallback = Closure<dyn FnMut(web_sys::Event)>;
type FrameCallback = Closure<dyn FnMut(f64)>;

/// One attached DOM listener; removed on teardown.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: EventCallback,
}

impl Listener {
    fn attach(target: EventTarget, kind: &'static str, callback: EventCallback) -> Result<Self, JsValue> {
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target,
            kind,
            callback,
        })
    }

    fn detach(self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// `requestAnimationFrame` loop that only runs while the page has work.
#[derive(Clone)]
struct FrameLoop {
    window: Window,
    callback: Rc<RefCell<Option<FrameCallback>>>,
    pending: Rc<Cell<Option<i32>>>,
}

impl FrameLoop {
    fn request(&self) {
        if self.pending.get().is_some() {
            return;
        }
        let callback = self.callback.borrow();
        let Some(callback) = callback.as_ref() else {
            return;
        };
        if let Ok(id) = self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            self.pending.set(Some(id));
        }
    }

    fn cancel(&self) {
        if let Some(id) = self.pending.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Drops the closure, breaking the closure -> loop -> closure cycle.
        self.callback.borrow_mut().take();
    }
}

// ---------------------------------------------------------------------------
// JS API
// ---------------------------------------------------------------------------

/// Interactive surface engine bound to the current document.
///
/// Listens to document `mousemove`/`click` and window `scroll`, and writes
/// `--mouse-x`/`--mouse-y` on each mounted section, ripple and floater nodes
/// into a per-section overlay, theme classes and `--color-*` variables on
/// the root element, and `nav-hidden` on the root when the nav should hide.
#[wasm_bindgen]
pub struct FolioSurfaceWeb {
    host: Rc<RefCell<Host>>,
    frames: FrameLoop,
    listeners: Vec<Listener>,
    destroyed: bool,
}

#[wasm_bindgen]
impl FolioSurfaceWeb {
    /// Create the engine. `options` is a partial configuration object, e.g.
    /// `{ ripple: { ttlMs: 800 } }`; omitted keys keep their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<JsValue>) -> Result<FolioSurfaceWeb, JsValue> {
        let config = match options {
            Some(options) if !options.is_undefined() && !options.is_null() => {
                let json: String = js_sys::JSON::stringify(&options)?.into();
                serde_json::from_str::<SurfaceConfig>(&json).map_err(js_err)?
            }
            _ => SurfaceConfig::default(),
        };
        let page = Page::new(config).map_err(js_err)?;
        let window = web_sys::window().ok_or_else(|| js_err("no window"))?;
        let document = window.document().ok_or_else(|| js_err("no document"))?;

        let host = Rc::new(RefCell::new(Host {
            page,
            clock: MonotonicClock::new(),
            document: document.clone(),
            sections: BTreeMap::new(),
        }));
        let frames = FrameLoop {
            window: window.clone(),
            callback: Rc::new(RefCell::new(None)),
            pending: Rc::new(Cell::new(None)),
        };

        let tick = {
            let host = Rc::clone(&host);
            let frames = frames.clone();
            Closure::wrap(Box::new(move |_timestamp: f64| {
                frames.pending.set(None);
                let wants_more = {
                    let mut host = host.borrow_mut();
                    if host.paint().is_err() {
                        folio_core::warn!("frame paint failed");
                    }
                    host.page.wants_frame()
                };
                if wants_more {
                    frames.request();
                }
            }) as Box<dyn FnMut(f64)>)
        };
        *frames.callback.borrow_mut() = Some(tick);

        let pointer_listener = |kind: &'static str, click: bool| -> Result<Listener, JsValue> {
            let host = Rc::clone(&host);
            let frames = frames.clone();
            let callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let pointer = PointerEvent::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
                let event = if click {
                    SurfaceEvent::Click(pointer.with_button(PointerButton::from_dom(mouse.button())))
                } else {
                    SurfaceEvent::PointerMove(pointer)
                };
                host.borrow_mut().dispatch(event);
                frames.request();
            }) as Box<dyn FnMut(web_sys::Event)>);
            Listener::attach(document.clone().into(), kind, callback)
        };
        let mut listeners = vec![pointer_listener("mousemove", false)?, pointer_listener("click", true)?];

        let scroll = {
            let host = Rc::clone(&host);
            let frames = frames.clone();
            let window = window.clone();
            Closure::wrap(Box::new(move |_event: web_sys::Event| {
                let offset = window.scroll_y().unwrap_or(0.0);
                host.borrow_mut().dispatch(SurfaceEvent::Scroll(ScrollEvent::new(offset)));
                frames.request();
            }) as Box<dyn FnMut(web_sys::Event)>)
        };
        listeners.push(Listener::attach(window.into(), "scroll", scroll)?);

        host.borrow().apply_theme()?;
        folio_core::info!("folio surface attached");

        Ok(Self {
            host,
            frames,
            listeners,
            destroyed: false,
        })
    }

    /// Attach the interactive surface of section `id` to `element`.
    ///
    /// Returns `false` when the section is already mounted.
    #[wasm_bindgen(js_name = mountSection)]
    pub fn mount_section(&mut self, id: &str, element: HtmlElement) -> Result<bool, JsValue> {
        if self.destroyed {
            return Ok(false);
        }
        let section: Section = id.parse().map_err(js_err)?;
        let mounted = self.host.borrow_mut().mount(section, element)?;
        self.frames.request();
        Ok(mounted)
    }

    /// Detach section `id`, cancelling its pending frame and ripple timers.
    ///
    /// Returns `false` when the section was not mounted.
    #[wasm_bindgen(js_name = unmountSection)]
    pub fn unmount_section(&mut self, id: &str) -> Result<bool, JsValue> {
        let section: Section = id.parse().map_err(js_err)?;
        Ok(self.host.borrow_mut().unmount(section).is_some())
    }

    /// Append the page-wide background particles to `container`.
    #[wasm_bindgen(js_name = mountBackground)]
    pub fn mount_background(&self, container: &Element) -> Result<(), JsValue> {
        let host = self.host.borrow();
        for particle in host.page.background() {
            let node = host.document.create_element("div")?;
            node.set_class_name(BACKGROUND_CLASS);
            node.set_attribute("style", &particle.style())?;
            container.append_child(&node)?;
        }
        Ok(())
    }

    /// Flip the theme. Returns whether the new mode is dark.
    #[wasm_bindgen(js_name = toggleTheme)]
    pub fn toggle_theme(&mut self) -> bool {
        let dark = self.host.borrow_mut().page.toggle_theme().is_dark();
        self.frames.request();
        dark
    }

    #[wasm_bindgen(js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.host.borrow().page.is_dark()
    }

    #[wasm_bindgen(js_name = navVisible)]
    pub fn nav_visible(&self) -> bool {
        self.host.borrow().page.nav_visible()
    }

    /// Current render inputs as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        let host = self.host.borrow();
        serde_json::to_string(&host.page.snapshot(host.now())).map_err(js_err)
    }

    /// Remove every listener, cancel the frame loop and unmount all sections.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        for listener in self.listeners.drain(..) {
            listener.detach();
        }
        self.frames.cancel();
        let mut host = self.host.borrow_mut();
        let sections: Vec<Section> = host.sections.keys().copied().collect();
        for section in sections {
            host.unmount(section);
        }
        host.page.destroy();
    }
}

impl Drop for FolioSurfaceWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}
