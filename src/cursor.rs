//! Custom cursor
//!
//! A dot that follows the pointer exactly, a ring that lerps behind it and a
//! short trail where each point chases the one before. Hover over an
//! interactive element grows the ring; pressing shrinks it.
//!
//! Hover is decided per event from the element under the pointer (and its
//! ancestors) through [`is_interactive`], so elements added later need no
//! extra wiring.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::choreo::ease::{Ease, lerp};
use crate::{Rect, approach};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    pub ring_lerp: f32,
    pub trail_len: usize,
    /// Lerp factor of the first trail point; later points are slower
    pub trail_lerp: f32,
    pub trail_lerp_step: f32,
    pub hover_ring_scale: f32,
    pub hover_ring_opacity: f32,
    pub hover_dot_scale: f32,
    pub hover_duration: f32,
    pub hold_ring_scale: f32,
    pub hold_dot_scale: f32,
    pub hold_duration: f32,
    /// Fraction of the pointer's offset from centre a magnetic element follows
    pub magnetic_strength: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            ring_lerp: 0.15,
            trail_len: 8,
            trail_lerp: 0.2,
            trail_lerp_step: 0.02,
            hover_ring_scale: 2.0,
            hover_ring_opacity: 0.5,
            hover_dot_scale: 0.5,
            hover_duration: 0.3,
            hold_ring_scale: 0.8,
            hold_dot_scale: 1.5,
            hold_duration: 0.2,
            magnetic_strength: 0.3,
        }
    }
}

/// The parts of an element the hover predicate looks at
#[derive(Debug, Clone, Copy, Default)]
pub struct ElementTraits<'a> {
    /// Lower-case tag name
    pub tag: &'a str,
    pub role: Option<&'a str>,
    /// Space-separated class list
    pub class_name: &'a str,
}

const INTERACTIVE_TAGS: [&str; 4] = ["a", "button", "input", "textarea"];
pub const HOVERABLE_CLASS: &str = "hoverable";
pub const MAGNETIC_CLASS: &str = "magnetic";

pub fn is_interactive(el: &ElementTraits<'_>) -> bool {
    INTERACTIVE_TAGS.contains(&el.tag)
        || el.role == Some("button")
        || has_class(el.class_name, HOVERABLE_CLASS)
}

/// Whether the event target or any ancestor (innermost first) is interactive
pub fn hovers_interactive<'a>(chain: impl IntoIterator<Item = ElementTraits<'a>>) -> bool {
    chain.into_iter().any(|el| is_interactive(&el))
}

pub fn has_class(class_name: &str, class: &str) -> bool {
    class_name.split_ascii_whitespace().any(|c| c == class)
}

/// Offset applied to a hovered magnetic element
pub fn magnetic_offset(pointer: Vec2, element: Rect, strength: f32) -> Vec2 {
    (pointer - element.center()) * strength
}

/// A scalar eased toward its latest target
#[derive(Debug, Clone, Copy, PartialEq)]
struct Tweened {
    from: f32,
    to: f32,
    elapsed: f32,
    duration: f32,
    ease: Ease,
}

impl Tweened {
    fn at(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            elapsed: 0.0,
            duration: 0.0,
            ease: Ease::None,
        }
    }

    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        lerp(self.from, self.to, self.ease.apply(self.elapsed / self.duration))
    }

    /// Restart from the current value toward `to`
    fn retarget(&mut self, to: f32, duration: f32, ease: Ease) {
        *self = Self {
            from: self.value(),
            to,
            elapsed: 0.0,
            duration,
            ease,
        };
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }
}

#[derive(Debug, Clone)]
pub struct CursorState {
    config: CursorConfig,
    pointer: Vec2,
    ring: Vec2,
    trail: Vec<Vec2>,
    hovering: bool,
    holding: bool,
    ring_scale: Tweened,
    ring_opacity: Tweened,
    dot_scale: Tweened,
}

impl CursorState {
    pub fn new(config: CursorConfig) -> Self {
        Self {
            trail: vec![Vec2::ZERO; config.trail_len],
            config,
            pointer: Vec2::ZERO,
            ring: Vec2::ZERO,
            hovering: false,
            holding: false,
            ring_scale: Tweened::at(1.0),
            ring_opacity: Tweened::at(1.0),
            dot_scale: Tweened::at(1.0),
        }
    }

    pub fn on_move(&mut self, pointer: Vec2) {
        self.pointer = pointer;
    }

    /// Returns `true` when the hover state changed
    pub fn set_hovering(&mut self, hovering: bool) -> bool {
        if hovering == self.hovering {
            return false;
        }
        self.hovering = hovering;
        let cfg = self.config;
        let (ring, opacity, dot) = if hovering {
            (cfg.hover_ring_scale, cfg.hover_ring_opacity, cfg.hover_dot_scale)
        } else {
            (1.0, 1.0, 1.0)
        };
        self.ring_scale.retarget(ring, cfg.hover_duration, Ease::Power2Out);
        self.ring_opacity.retarget(opacity, cfg.hover_duration, Ease::Power2Out);
        self.dot_scale.retarget(dot, cfg.hover_duration, Ease::Power2Out);
        true
    }

    pub fn on_press(&mut self) {
        self.holding = true;
        let cfg = self.config;
        self.ring_scale.retarget(cfg.hold_ring_scale, cfg.hold_duration, Ease::Power2Out);
        self.dot_scale.retarget(cfg.hold_dot_scale, cfg.hold_duration, Ease::Power2Out);
    }

    pub fn on_release(&mut self) {
        self.holding = false;
        let cfg = self.config;
        self.ring_scale.retarget(1.0, cfg.hold_duration, Ease::Power2Out);
        self.dot_scale.retarget(1.0, cfg.hold_duration, Ease::Power2Out);
    }

    /// One animation frame
    pub fn step(&mut self, dt: f32) {
        self.ring = approach(self.ring, self.pointer, self.config.ring_lerp);

        let mut leader = self.pointer;
        for (i, point) in self.trail.iter_mut().enumerate() {
            let factor = (self.config.trail_lerp - i as f32 * self.config.trail_lerp_step).max(0.0);
            *point = approach(*point, leader, factor);
            leader = *point;
        }

        self.ring_scale.advance(dt);
        self.ring_opacity.advance(dt);
        self.dot_scale.advance(dt);
    }

    pub fn dot(&self) -> Vec2 {
        self.pointer
    }

    pub fn ring(&self) -> Vec2 {
        self.ring
    }

    pub fn trail(&self) -> &[Vec2] {
        &self.trail
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn ring_scale(&self) -> f32 {
        self.ring_scale.value()
    }

    pub fn ring_opacity(&self) -> f32 {
        self.ring_opacity.value()
    }

    pub fn dot_scale(&self) -> f32 {
        self.dot_scale.value()
    }
}

/// Fixed look of trail point `i`: (scale, opacity, size in px)
pub fn trail_point_style(i: usize) -> (f32, f32, f32) {
    let i = i as f32;
    (1.0 - i * 0.12, (0.15 - i * 0.018).max(0.0), 6.0 - i * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el<'a>(tag: &'a str, role: Option<&'a str>, class_name: &'a str) -> ElementTraits<'a> {
        ElementTraits {
            tag,
            role,
            class_name,
        }
    }

    #[test]
    fn test_interactive_predicate() {
        assert!(is_interactive(&el("a", None, "")));
        assert!(is_interactive(&el("textarea", None, "")));
        assert!(is_interactive(&el("div", Some("button"), "")));
        assert!(is_interactive(&el("div", None, "card hoverable")));
        assert!(!is_interactive(&el("div", None, "hoverable-ish")));
        assert!(!is_interactive(&el("span", Some("link"), "")));
    }

    #[test]
    fn test_delegated_hover_walks_ancestors() {
        let chain = [el("span", None, "label"), el("button", None, ""), el("body", None, "")];
        assert!(hovers_interactive(chain));
        let plain = [el("p", None, ""), el("section", None, "")];
        assert!(!hovers_interactive(plain));
    }

    #[test]
    fn test_ring_lags_dot() {
        let mut c = CursorState::new(CursorConfig::default());
        c.on_move(Vec2::new(100.0, 0.0));
        c.step(1.0 / 60.0);
        assert_eq!(c.dot(), Vec2::new(100.0, 0.0));
        assert!((c.ring().x - 15.0).abs() < 1e-4);
        assert!((c.trail()[0].x - 20.0).abs() < 1e-4);
        // Second point chases the first at 0.18
        assert!((c.trail()[1].x - 3.6).abs() < 1e-4);
        assert_eq!(c.trail().len(), 8);
    }

    #[test]
    fn test_hover_and_hold_tweens() {
        let mut c = CursorState::new(CursorConfig::default());
        assert!(c.set_hovering(true));
        assert!(!c.set_hovering(true));
        c.step(0.15);
        assert!(c.ring_scale() > 1.0 && c.ring_scale() < 2.0);
        c.step(0.2);
        assert_eq!(c.ring_scale(), 2.0);
        assert_eq!(c.ring_opacity(), 0.5);
        assert_eq!(c.dot_scale(), 0.5);

        c.on_press();
        c.step(0.3);
        assert!((c.ring_scale() - 0.8).abs() < 1e-6);
        assert_eq!(c.dot_scale(), 1.5);
        c.on_release();
        c.step(0.3);
        assert!((c.ring_scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_magnetic_offset() {
        let r = Rect::new(100.0, 100.0, 200.0, 100.0);
        let off = magnetic_offset(Vec2::new(300.0, 150.0), r, 0.3);
        assert!((off.x - 30.0).abs() < 1e-5);
        assert_eq!(off.y, 0.0);
    }

    #[test]
    fn test_trail_fades_out() {
        let (s0, o0, px0) = trail_point_style(0);
        let (s7, o7, px7) = trail_point_style(7);
        assert_eq!((s0, o0, px0), (1.0, 0.15, 6.0));
        assert!(s7 < s0 && o7 < o0 && px7 < px0);
    }
}
