//! Hero section mount: starfield canvas, entrance, typewriter, coordinates

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlElement};

use super::canvas::CanvasSurface;
use super::page::PageContext;
use super::{Listener, RESIZE_DEBOUNCE_MS, bounding_rect, client_pos, html_element, now_ms, query_all, set_style, viewport_size};
use crate::choreo::{HeroEntrance, hero_coordinates};
use crate::effect::FieldEffect;
use crate::error::{MountError, Result};
use crate::sched::{FrameLoop, LoopControl, Timeout};
use crate::sim::ParticleField;
use crate::typewriter::{Typewriter, TypewriterConfig};

pub const FIELD_CANVAS_ID: &str = "hero-field";
const CONTENT_SELECTOR: &str = "[data-hero-content]";
const LINE_SELECTOR: &str = "[data-hero-line]";
const TAGLINE_ID: &str = "hero-tagline";
const CARET_ID: &str = "hero-caret";
const COORDINATES_ID: &str = "hero-coordinates";
const GLOW_SELECTOR: &str = ".hero-glow";

type FieldSlot = Rc<RefCell<Option<FieldEffect<CanvasSurface>>>>;

/// Everything the hero owns; dropping it revokes all of it
pub struct HeroMount {
    field: FieldSlot,
    entrance: Rc<RefCell<Option<HeroEntrance>>>,
    _animation: FrameLoop,
    _listeners: Vec<Listener>,
}

impl HeroMount {
    /// Start the entrance timeline (after the boot overlay is gone)
    pub fn play_entrance(&self, reduced_motion: bool) {
        let lines = self.entrance_line_count();
        *self.entrance.borrow_mut() = Some(HeroEntrance::new(lines, reduced_motion));
        log::debug!("Hero entrance started ({lines} lines)");
    }

    fn entrance_line_count(&self) -> usize {
        super::document()
            .map(|d| query_all(&d, LINE_SELECTOR).len())
            .unwrap_or(0)
    }

    pub fn unmount(self) {
        if let Some(field) = self.field.borrow_mut().take() {
            field.unmount();
        }
        if let Some(entrance) = self.entrance.borrow_mut().as_mut() {
            entrance.kill();
        }
        log::info!("Hero unmounted");
    }
}

fn mount_field(ctx: &PageContext) -> Result<FieldEffect<CanvasSurface>> {
    let canvas = ctx
        .document
        .get_element_by_id(FIELD_CANVAS_ID)
        .ok_or_else(|| MountError::MissingElement(format!("#{FIELD_CANVAS_ID}")))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| MountError::SurfaceUnavailable(format!("#{FIELD_CANVAS_ID} is not a canvas")))?;

    let region = bounding_rect(&canvas);
    let mut surface = CanvasSurface::new(canvas)?;
    surface.resize(region.size, ctx.window.device_pixel_ratio());

    let seed = js_sys::Date::now() as u64;
    let mut field = ParticleField::new(region, ctx.tuning.clone(), seed);
    field.set_reduced_motion(!ctx.settings.effective_animations());
    Ok(FieldEffect::mount(ctx.frames.clone(), field, surface))
}

/// Pointer and resize listeners feeding the field
fn field_listeners(ctx: &PageContext, shared: FieldSlot) -> Result<Vec<Listener>> {
    let window = ctx.window.clone();
    let mut listeners = Vec::new();

    if ctx.settings.effective_pointer_effects() {
        let canvas = ctx
            .document
            .get_element_by_id(FIELD_CANVAS_ID)
            .ok_or_else(|| MountError::MissingElement(format!("#{FIELD_CANVAS_ID}")))?;
        let s = shared.clone();
        let c = canvas.clone();
        listeners.push(Listener::new(&window, "mousemove", move |e| {
            if let (Some(p), Some(f)) = (client_pos(&e), s.borrow().as_ref()) {
                let origin = bounding_rect(&c).origin;
                f.with_field(|field| {
                    field.set_origin(origin);
                    field.on_pointer_move(p);
                });
            }
        })?);
        let s = shared.clone();
        listeners.push(Listener::new(&window, "mousedown", move |e| {
            if let (Some(p), Some(f)) = (client_pos(&e), s.borrow().as_ref()) {
                // The canvas scrolls with the page
                let origin = bounding_rect(&canvas).origin;
                f.with_field(|field| {
                    field.set_origin(origin);
                    field.on_pointer_down(p, now_ms());
                });
            }
        })?);
        let s = shared.clone();
        listeners.push(Listener::new(&window, "mouseup", move |_| {
            if let Some(f) = s.borrow().as_ref() {
                f.with_field(|field| field.on_pointer_up());
            }
        })?);
        if let Some(root) = ctx.document.document_element() {
            let s = shared.clone();
            listeners.push(Listener::new(&root, "mouseleave", move |_| {
                if let Some(f) = s.borrow().as_ref() {
                    f.with_field(|field| field.on_pointer_leave());
                }
            })?);
        }
    }

    // Re-measure once resizing settles
    let s = shared;
    let document = ctx.document.clone();
    let timers = ctx.timers.clone();
    let w = window.clone();
    let mut pending: Option<Timeout> = None;
    listeners.push(Listener::new(&window, "resize", move |_| {
        let s = s.clone();
        let document = document.clone();
        let w = w.clone();
        // Replacing the handle clears the previous timer
        pending.replace(Timeout::start(timers.clone(), RESIZE_DEBOUNCE_MS, move || {
            let slot = s.borrow();
            let (Some(f), Some(canvas)) = (slot.as_ref(), document.get_element_by_id(FIELD_CANVAS_ID)) else {
                return;
            };
            let region = bounding_rect(&canvas);
            f.with_surface(|surface| surface.resize(region.size, w.device_pixel_ratio()));
            f.with_field(|field| field.resize(region));
            log::debug!("Field resized to {}x{}", region.size.x, region.size.y);
        }));
    })?);

    Ok(listeners)
}

fn apply_entrance(entrance: &HeroEntrance, content: &[HtmlElement], lines: &[HtmlElement]) {
    let opacity = entrance.content_opacity().to_string();
    for el in content {
        set_style(el, "opacity", &opacity);
    }
    for (i, el) in lines.iter().enumerate() {
        let style = entrance.line_style(i);
        set_style(el, "opacity", &style.opacity.to_string());
        set_style(el, "transform", &style.transform());
    }
}

pub fn mount_hero(ctx: &PageContext) -> Result<HeroMount> {
    let shared: FieldSlot = Rc::new(RefCell::new(None));
    let mut listeners = Vec::new();
    match mount_field(ctx) {
        Ok(field) => {
            *shared.borrow_mut() = Some(field);
            listeners = field_listeners(ctx, shared.clone())?;
        }
        Err(e) => log::warn!("Particle field skipped: {e}"),
    }

    // Coordinates readout and glow follow the pointer
    let pointer = Rc::new(RefCell::new(None::<Vec2>));
    {
        let p = pointer.clone();
        listeners.push(Listener::new(&ctx.window, "mousemove", move |e| {
            if let Some(pos) = client_pos(&e) {
                *p.borrow_mut() = Some(pos);
            }
        })?);
    }

    let doc = &ctx.document;
    let content: Vec<HtmlElement> = query_all(doc, CONTENT_SELECTOR);
    let lines: Vec<HtmlElement> = query_all(doc, LINE_SELECTOR);
    let tagline = doc.get_element_by_id(TAGLINE_ID).and_then(html_element);
    let caret = doc.get_element_by_id(CARET_ID).and_then(html_element);
    let coordinates = doc.get_element_by_id(COORDINATES_ID).and_then(html_element);
    let glow = doc.query_selector(GLOW_SELECTOR).ok().flatten().and_then(html_element);
    if tagline.is_none() {
        log::debug!("No #{TAGLINE_ID}; typewriter skipped");
    }

    // Hold the entrance's first frame until the boot overlay hands over
    let animate = ctx.settings.effective_animations();
    apply_entrance(&HeroEntrance::new(lines.len(), !animate), &content, &lines);

    let entrance: Rc<RefCell<Option<HeroEntrance>>> = Rc::new(RefCell::new(None));
    let taglines = ctx.content.taglines.clone();
    let mut typewriter = if animate {
        Typewriter::new(taglines, TypewriterConfig::default())
    } else {
        Typewriter::still(taglines, TypewriterConfig::default())
    };
    let origin = ctx.content.personal.origin;
    let window = ctx.window.clone();
    let mut last_ms: Option<f64> = None;
    let mut last_text = String::new();
    let e = entrance.clone();

    let animation = FrameLoop::start(ctx.frames.clone(), move |now| {
        let dt_ms = last_ms.map_or(0.0, |last| (now - last).max(0.0));
        last_ms = Some(now);

        if let Some(entrance) = e.borrow_mut().as_mut() {
            entrance.advance((dt_ms / 1000.0) as f32);
            apply_entrance(entrance, &content, &lines);
        }

        if let Some(el) = &tagline {
            typewriter.advance(dt_ms);
            let text = typewriter.text();
            if text != last_text {
                el.set_text_content(Some(&text));
                last_text = text;
            }
            if let Some(caret) = &caret {
                set_style(caret, "opacity", if typewriter.caret_visible() { "1" } else { "0" });
            }
        }

        if let Some(pos) = pointer.borrow_mut().take() {
            let viewport = viewport_size(&window);
            if let Some(el) = &coordinates {
                el.set_text_content(Some(&hero_coordinates(origin, pos, viewport).label()));
            }
            if let Some(el) = &glow {
                set_style(el, "left", &format!("{}px", pos.x));
                set_style(el, "top", &format!("{}px", pos.y));
            }
        }
        LoopControl::Continue
    });

    log::info!("Hero mounted");
    Ok(HeroMount {
        field: shared,
        entrance,
        _animation: animation,
        _listeners: listeners,
    })
}
