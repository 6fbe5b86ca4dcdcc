//! Browser glue (WASM only)
//!
//! Everything that touches `web-sys` lives here:
//! - `Listener`: event listener removed on drop
//! - `BrowserFrames` / `BrowserTimers`: `requestAnimationFrame` and `setTimeout` hosts
//! - `canvas`: canvas-backed drawing surface
//! - `hero`, `cursor`, `scroll`, `boot`: per-section mounts
//! - `page`: mounts everything and owns the handles

pub mod boot;
pub mod canvas;
pub mod cursor;
pub mod hero;
pub mod page;
pub mod scroll;

use glam::Vec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, MouseEvent, Window};

use crate::error::{MountError, Result};
use crate::sched::{FrameCallback, FrameHost, FrameToken, TimerCallback, TimerHost, TimerToken};
use crate::{Rect, SiteContent};

pub(crate) fn js_err(err: JsValue) -> MountError {
    MountError::Js(format!("{err:?}"))
}

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(MountError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(MountError::NoWindow)
}

/// Milliseconds on the same clock as animation frame timestamps
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Inner viewport size in CSS pixels
pub fn viewport_size(window: &Window) -> Vec2 {
    let dim = |v: std::result::Result<JsValue, JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Vec2::new(dim(window.inner_width()), dim(window.inner_height()))
}

pub fn scroll_y(window: &Window) -> f32 {
    window.scroll_y().unwrap_or(0.0) as f32
}

/// Pointer position of a mouse event in client space
pub fn client_pos(event: &Event) -> Option<Vec2> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some(Vec2::new(mouse.client_x() as f32, mouse.client_y() as f32))
}

pub fn bounding_rect(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32)
}

pub fn html_element(el: Element) -> Option<HtmlElement> {
    el.dyn_into::<HtmlElement>().ok()
}

pub fn query_all(root: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(list) = root.query_selector_all(selector) else {
        log::warn!("Bad selector {selector}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Quiet period before layout-dependent state is re-measured
pub const RESIZE_DEBOUNCE_MS: u32 = 150;

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

pub fn set_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

/// Site content from the embedded JSON document, or the built-in defaults
pub fn load_content(document: &Document) -> SiteContent {
    let Some(json) = document
        .get_element_by_id(crate::content::CONTENT_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        log::info!("Using built-in site content");
        return SiteContent::default();
    };
    match SiteContent::from_json(&json) {
        Ok(content) => {
            log::info!("Loaded site content ({} projects)", content.projects.len());
            content
        }
        Err(e) => {
            log::warn!("Ignoring embedded site content: {e}");
            SiteContent::default()
        }
    }
}

/// Event listener that is removed when dropped
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// `requestAnimationFrame` host.
///
/// A revoked request never calls its closure, so the closure is leaked to
/// the JS heap rather than freed.
pub struct BrowserFrames {
    window: Window,
}

impl BrowserFrames {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl FrameHost for BrowserFrames {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameToken> {
        let closure = Closure::once_into_js(move |now: f64| callback(now));
        self.window
            .request_animation_frame(closure.unchecked_ref())
            .ok()
            .map(|id| FrameToken(i64::from(id)))
    }

    fn cancel_frame(&self, token: FrameToken) {
        if let Ok(id) = i32::try_from(token.0) {
            let _ = self.window.cancel_animation_frame(id);
        }
    }
}

/// `setTimeout` host
pub struct BrowserTimers {
    window: Window,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl TimerHost for BrowserTimers {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Option<TimerToken> {
        let closure = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        self.window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), delay)
            .ok()
            .map(|id| TimerToken(i64::from(id)))
    }

    fn clear_timeout(&self, token: TimerToken) {
        if let Ok(id) = i32::try_from(token.0) {
            self.window.clear_timeout_with_handle(id);
        }
    }
}
