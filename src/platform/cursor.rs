//! Custom cursor and magnetic element mount

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement};

use super::page::PageContext;
use super::{Listener, bounding_rect, client_pos, html_element, js_err, set_class, set_style};
use crate::cursor::{
    CursorConfig, CursorState, ElementTraits, MAGNETIC_CLASS, hovers_interactive, magnetic_offset,
    trail_point_style,
};
use crate::error::{MountError, Result};
use crate::sched::{FrameLoop, LoopControl};

const MAGNETIC_HOVER_SCALE: f32 = 1.05;

/// Owned data for one element on the event path
struct PathEntry {
    tag: String,
    role: Option<String>,
    class_name: String,
}

/// Event target and its ancestors, innermost first
fn event_path(event: &Event) -> Vec<PathEntry> {
    let mut path = Vec::new();
    let mut node = event.target().and_then(|t| t.dyn_into::<Element>().ok());
    while let Some(el) = node {
        path.push(PathEntry {
            tag: el.tag_name().to_ascii_lowercase(),
            role: el.get_attribute("role"),
            class_name: el.class_name(),
        });
        node = el.parent_element();
    }
    path
}

fn magnetic_target(event: &Event) -> Option<HtmlElement> {
    let el = event.target()?.dyn_into::<Element>().ok()?;
    el.closest(&format!(".{MAGNETIC_CLASS}")).ok().flatten().and_then(html_element)
}

fn translate(p: Vec2) -> String {
    format!("translate3d({:.2}px, {:.2}px, 0) translate(-50%, -50%)", p.x, p.y)
}

pub struct CursorMount {
    elements: Vec<HtmlElement>,
    body: HtmlElement,
    _animation: FrameLoop,
    _listeners: Vec<Listener>,
}

impl Drop for CursorMount {
    fn drop(&mut self) {
        for el in &self.elements {
            el.remove();
        }
        set_class(&self.body, "hovering", false);
        set_class(&self.body, "holding", false);
        log::info!("Cursor unmounted");
    }
}

pub fn mount_cursor(ctx: &PageContext) -> Result<CursorMount> {
    if !ctx.settings.effective_cursor() {
        return Err(MountError::Disabled("custom cursor needs a fine pointer, a wide viewport and motion"));
    }
    let doc = &ctx.document;
    let body = doc.body().ok_or_else(|| MountError::MissingElement("body".into()))?;
    let config = CursorConfig::default();

    let make = |class: &str| -> Result<HtmlElement> {
        let el = doc.create_element("div").map_err(js_err)?;
        el.set_class_name(class);
        let _ = el.set_attribute("aria-hidden", "true");
        body.append_child(&el).map_err(js_err)?;
        html_element(el).ok_or_else(|| MountError::Js("created element is not an HtmlElement".into()))
    };
    let mut trail = Vec::with_capacity(config.trail_len);
    for i in 0..config.trail_len {
        let el = make("cursor-trail")?;
        let (_, opacity, size) = trail_point_style(i);
        set_style(&el, "opacity", &opacity.to_string());
        set_style(&el, "width", &format!("{size}px"));
        set_style(&el, "height", &format!("{size}px"));
        trail.push(el);
    }
    let dot = make("cursor-dot")?;
    let ring = make("cursor-ring")?;

    let state = Rc::new(RefCell::new(CursorState::new(config)));
    let mut listeners = Vec::new();

    {
        let s = state.clone();
        let dot = dot.clone();
        let mut magnetic: Option<HtmlElement> = None;
        let magnetic_on = ctx.settings.effective_magnetic();
        listeners.push(Listener::new(&ctx.window, "mousemove", move |e| {
            let Some(p) = client_pos(&e) else {
                return;
            };
            s.borrow_mut().on_move(p);
            set_style(&dot, "transform", &translate(p));

            let target = if magnetic_on { magnetic_target(&e) } else { None };
            if let Some(prev) = magnetic.as_ref() {
                if target.as_ref() != Some(prev) {
                    set_style(prev, "transform", "");
                }
            }
            if let Some(el) = &target {
                let offset = magnetic_offset(p, bounding_rect(el), config.magnetic_strength);
                set_style(
                    el,
                    "transform",
                    &format!(
                        "translate({:.2}px, {:.2}px) scale({MAGNETIC_HOVER_SCALE})",
                        offset.x, offset.y
                    ),
                );
            }
            magnetic = target;
        })?);
    }
    {
        let s = state.clone();
        let body = body.clone();
        listeners.push(Listener::new(&ctx.window, "mousedown", move |_| {
            s.borrow_mut().on_press();
            set_class(&body, "holding", true);
        })?);
    }
    {
        let s = state.clone();
        let body = body.clone();
        listeners.push(Listener::new(&ctx.window, "mouseup", move |_| {
            s.borrow_mut().on_release();
            set_class(&body, "holding", false);
        })?);
    }
    {
        // One delegated listener decides hover for every element, present or future
        let s = state.clone();
        let body = body.clone();
        listeners.push(Listener::new(doc, "mouseover", move |e| {
            let path = event_path(&e);
            let hovering = hovers_interactive(path.iter().map(|p| ElementTraits {
                tag: &p.tag,
                role: p.role.as_deref(),
                class_name: &p.class_name,
            }));
            if s.borrow_mut().set_hovering(hovering) {
                set_class(&body, "hovering", hovering);
            }
        })?);
    }

    let s = state;
    let d = dot.clone();
    let r = ring.clone();
    let t = trail.clone();
    let mut last_ms: Option<f64> = None;
    let animation = FrameLoop::start(ctx.frames.clone(), move |now| {
        let dt = last_ms.map_or(0.0, |last| ((now - last) / 1000.0) as f32);
        last_ms = Some(now);
        let mut cursor = s.borrow_mut();
        cursor.step(dt.max(0.0));

        set_style(
            &r,
            "transform",
            &format!("{} scale({:.3})", translate(cursor.ring()), cursor.ring_scale()),
        );
        set_style(&r, "opacity", &format!("{:.3}", cursor.ring_opacity()));
        set_style(
            &d,
            "transform",
            &format!("{} scale({:.3})", translate(cursor.dot()), cursor.dot_scale()),
        );
        for (i, (el, p)) in t.iter().zip(cursor.trail()).enumerate() {
            let (scale, _, _) = trail_point_style(i);
            set_style(el, "transform", &format!("{} scale({scale:.3})", translate(*p)));
        }
        LoopControl::Continue
    });

    let mut elements = trail;
    elements.push(dot);
    elements.push(ring);
    log::info!("Cursor mounted");
    Ok(CursorMount {
        elements,
        body,
        _animation: animation,
        _listeners: listeners,
    })
}
