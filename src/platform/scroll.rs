//! Scroll-driven mounts: navigation state, reveals, pinned projects

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, Window,
};

use super::page::PageContext;
use super::{
    Listener, RESIZE_DEBOUNCE_MS, html_element, js_err, query_all, scroll_y, set_class, set_style,
    viewport_size,
};
use crate::choreo::{
    ActiveSection, PinConfig, PinnedScroll, Reveal, RevealConfig, ScrollTracker, VisibilityBand,
};
use crate::error::{MountError, Result};
use crate::sched::{FrameLoop, LoopControl, Timeout};

const NAV_ID: &str = "nav";
const NAV_LINK_SELECTOR: &str = "[data-nav-target]";
const REVEAL_SELECTOR: &str = "[data-reveal]";
const REVEAL_GROUP_SELECTOR: &str = "[data-reveal-group]";
const REVEAL_CHARS_SELECTOR: &str = "[data-reveal-chars]";
const PROJECTS_ID: &str = "projects";
const PROJECTS_PIN_SELECTOR: &str = "[data-projects-pin]";
const PROJECTS_TRACK_SELECTOR: &str = "[data-projects-track]";

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// Active-section tracking through an intersection observer
pub struct NavMount {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
    _listeners: Vec<Listener>,
}

impl Drop for NavMount {
    fn drop(&mut self) {
        self.observer.disconnect();
        log::info!("Navigation tracking unmounted");
    }
}

fn highlight(links: &[HtmlElement], active: &str) {
    for link in links {
        let on = link.get_attribute("data-nav-target").as_deref() == Some(active);
        set_class(link, "active", on);
    }
}

pub fn mount_nav(ctx: &PageContext) -> Result<NavMount> {
    let doc = &ctx.document;
    let links = query_all(doc, NAV_LINK_SELECTOR);
    let band = VisibilityBand::default();
    let active = Rc::new(RefCell::new(ActiveSection::new()));

    let state = active.clone();
    let viewport_h = {
        let window = ctx.window.clone();
        move || viewport_size(&window).y
    };
    let callback: ObserverCallback = Closure::new(move |entries: js_sys::Array, _: IntersectionObserver| {
        for entry in entries.iter() {
            let entry: IntersectionObserverEntry = entry.unchecked_into();
            let id = entry.target().id();
            let band_h = entry
                .root_bounds()
                .map(|r| r.height() as f32)
                .unwrap_or_else(|| band.band_height(viewport_h()));
            let coverage = band.coverage_from(
                entry.intersection_rect().height() as f32,
                entry.bounding_client_rect().height() as f32,
                band_h,
            );
            let entered = entry.is_intersecting() && band.is_entered(coverage);
            if let Some(now_active) = state.borrow_mut().on_signal(&id, entered) {
                log::debug!("Active section: {now_active}");
                highlight(&links, now_active);
            }
        }
    });

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&band.root_margin());
    let thresholds = js_sys::Array::new();
    for t in VisibilityBand::observer_thresholds() {
        thresholds.push(&JsValue::from_f64(t));
    }
    init.set_threshold(&thresholds);
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
        .map_err(js_err)?;

    for id in ctx.content.section_ids() {
        match doc.get_element_by_id(id) {
            Some(section) => {
                active.borrow_mut().observe(id);
                observer.observe(&section);
            }
            None => log::warn!("Section #{id} not found; not tracked"),
        }
    }

    // Backdrop and hide-on-scroll-down
    let mut listeners = Vec::new();
    if let Some(nav) = doc.get_element_by_id(NAV_ID) {
        let window = ctx.window.clone();
        let mut tracker = ScrollTracker::new();
        listeners.push(Listener::new(&ctx.window, "scroll", move |_| {
            tracker.update(scroll_y(&window));
            set_class(&nav, "scrolled", tracker.is_scrolled());
            set_class(&nav, "nav-hidden", tracker.nav_hidden());
        })?);
    }

    log::info!("Navigation tracking mounted");
    Ok(NavMount {
        observer,
        _callback: callback,
        _listeners: listeners,
    })
}

struct RevealBinding {
    /// Element whose top edge is tested against the trigger line
    trigger: Element,
    items: Vec<HtmlElement>,
    reveal: Reveal,
    /// Final styles already written for the settled state
    settled_written: bool,
}

impl RevealBinding {
    fn new(trigger: Element, items: Vec<HtmlElement>, config: RevealConfig, reduced: bool) -> Self {
        let mut reveal = Reveal::staggered(config, items.len());
        reveal.set_reduced_motion(reduced);
        Self {
            trigger,
            items,
            reveal,
            settled_written: false,
        }
    }

    fn frame(&mut self, viewport_h: f32, dt: f32) {
        let top = self.trigger.get_bounding_client_rect().top() as f32;
        if self.reveal.update_position(top, viewport_h).is_some() {
            self.settled_written = false;
        }
        self.reveal.advance(dt);
        if self.settled_written {
            return;
        }
        for (i, el) in self.items.iter().enumerate() {
            let style = self.reveal.item_style(i);
            set_style(el, "opacity", &format!("{:.3}", style.opacity));
            set_style(el, "transform", &style.transform());
        }
        self.settled_written = self.reveal.is_settled();
    }
}

fn children(el: &Element) -> Vec<HtmlElement> {
    let Ok(list) = el.query_selector_all(":scope > *") else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
        .collect()
}

/// Replace an element's text with one inline-block span per character
fn split_chars(ctx: &PageContext, el: &HtmlElement) -> Result<Vec<HtmlElement>> {
    let text = el.text_content().unwrap_or_default();
    el.set_text_content(None);
    let mut spans = Vec::new();
    for c in text.chars() {
        let span = ctx.document.create_element("span").map_err(js_err)?;
        span.set_class_name("char");
        let glyph = if c == ' ' { '\u{00A0}' } else { c };
        span.set_text_content(Some(&glyph.to_string()));
        el.append_child(&span).map_err(js_err)?;
        if let Some(span) = html_element(span) {
            set_style(&span, "display", "inline-block");
            spans.push(span);
        }
    }
    Ok(spans)
}

fn collect_reveals(ctx: &PageContext) -> Result<Vec<RevealBinding>> {
    let doc = &ctx.document;
    let reduced = !ctx.settings.effective_animations();
    let mut bindings = Vec::new();

    for el in query_all(doc, REVEAL_SELECTOR) {
        let config = match el.get_attribute("data-reveal").as_deref() {
            Some("header") => RevealConfig::section_header(),
            _ => RevealConfig::default(),
        };
        bindings.push(RevealBinding::new(el.clone().into(), vec![el], config, reduced));
    }
    for group in query_all(doc, REVEAL_GROUP_SELECTOR) {
        let items = children(&group);
        if items.is_empty() {
            log::debug!("Empty reveal group skipped");
            continue;
        }
        let config = match group.get_attribute("data-reveal-group").as_deref() {
            Some("grid") => RevealConfig::content_grid(),
            _ => RevealConfig::default(),
        };
        bindings.push(RevealBinding::new(group.into(), items, config, reduced));
    }
    for el in query_all(doc, REVEAL_CHARS_SELECTOR) {
        let spans = split_chars(ctx, &el)?;
        if spans.is_empty() {
            continue;
        }
        bindings.push(RevealBinding::new(el.into(), spans, RevealConfig::text_chars(), reduced));
    }
    Ok(bindings)
}

struct PinBinding {
    pinned: PinnedScroll,
    section: HtmlElement,
    track: HtmlElement,
}

impl PinBinding {
    /// Read section position and track width from the current layout
    fn measure(&mut self, window: &Window) {
        let viewport = viewport_size(window);
        let start = self.section.get_bounding_client_rect().top() as f32 + scroll_y(window);
        self.pinned
            .remeasure(start, self.track.scroll_width() as f32, viewport.x);
        // The sticky wrapper stays in view for the pin distance
        set_style(
            &self.section,
            "height",
            &format!("{}px", viewport.y + self.pinned.pin_distance()),
        );
    }

    fn frame(&mut self, scroll_y: f32, dt: f32) {
        let frame = self.pinned.frame(scroll_y, dt);
        set_style(
            &self.track,
            "transform",
            &format!("translate3d({:.2}px, 0, 0)", frame.translate_x),
        );
        set_class(&self.section, "is-pinned", frame.pinned);
        set_style(&self.section, "--projects-progress", &format!("{:.4}", frame.progress));
    }
}

fn mount_pinned(ctx: &PageContext) -> Result<Option<PinBinding>> {
    let horizontal = ctx.settings.effective_pinned_scroll();
    let doc = &ctx.document;
    let section = doc
        .get_element_by_id(PROJECTS_ID)
        .and_then(html_element)
        .ok_or_else(|| MountError::MissingElement(format!("#{PROJECTS_ID}")))?;
    set_class(&section, "projects-horizontal", horizontal);
    set_class(&section, "projects-list", !horizontal);
    if !horizontal {
        log::info!("Projects: vertical list layout");
        return Ok(None);
    }

    let pin = section
        .query_selector(PROJECTS_PIN_SELECTOR)
        .ok()
        .flatten()
        .and_then(html_element)
        .ok_or_else(|| MountError::MissingElement(PROJECTS_PIN_SELECTOR.into()))?;
    let track = section
        .query_selector(PROJECTS_TRACK_SELECTOR)
        .ok()
        .flatten()
        .and_then(html_element)
        .ok_or_else(|| MountError::MissingElement(PROJECTS_TRACK_SELECTOR.into()))?;

    set_style(&pin, "position", "sticky");
    set_style(&pin, "top", "0");
    let mut binding = PinBinding {
        pinned: PinnedScroll::new(PinConfig::default(), 0.0, 0.0, 0.0),
        section,
        track,
    };
    binding.measure(&ctx.window);
    log::info!(
        "Projects: pinned horizontal scroll over {:.0}px",
        binding.pinned.pin_distance()
    );
    Ok(Some(binding))
}

/// Reveals and pinned projects, advanced on one frame loop
pub struct ScrollMount {
    _animation: FrameLoop,
    _listeners: Vec<Listener>,
}

impl Drop for ScrollMount {
    fn drop(&mut self) {
        log::info!("Scroll animations unmounted");
    }
}

pub fn mount_scroll(ctx: &PageContext) -> Result<ScrollMount> {
    let mut reveals = collect_reveals(ctx)?;
    let pin = match mount_pinned(ctx) {
        Ok(pin) => pin,
        Err(e) => {
            log::warn!("Pinned projects skipped: {e}");
            None
        }
    };
    log::info!("Scroll animations mounted ({} reveals)", reveals.len());
    let pin = Rc::new(RefCell::new(pin));

    // Layout shifts move the pin; the layout choice itself stays
    let mut listeners = Vec::new();
    if pin.borrow().is_some() {
        let p = pin.clone();
        let window = ctx.window.clone();
        let timers = ctx.timers.clone();
        let mut pending: Option<Timeout> = None;
        listeners.push(Listener::new(&ctx.window, "resize", move |_| {
            let p = p.clone();
            let window = window.clone();
            pending.replace(Timeout::start(timers.clone(), RESIZE_DEBOUNCE_MS, move || {
                if let Some(binding) = p.borrow_mut().as_mut() {
                    binding.measure(&window);
                    log::debug!("Projects pin re-measured: {:.0}px", binding.pinned.pin_distance());
                }
            }));
        })?);
    }

    let window = ctx.window.clone();
    let mut last_ms: Option<f64> = None;
    let animation = FrameLoop::start(ctx.frames.clone(), move |now| {
        let dt = last_ms.map_or(0.0, |last| ((now - last) / 1000.0) as f32).max(0.0);
        last_ms = Some(now);
        let viewport_h = viewport_size(&window).y;
        for binding in reveals.iter_mut() {
            binding.frame(viewport_h, dt);
        }
        if let Some(binding) = pin.borrow_mut().as_mut() {
            binding.frame(scroll_y(&window), dt);
        }
        LoopControl::Continue
    });

    Ok(ScrollMount {
        _animation: animation,
        _listeners: listeners,
    })
}
