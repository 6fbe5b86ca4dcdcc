//! Starfield frame rendering
//!
//! Draw order: clear, pointer connectors (holding only), stars, attraction
//! glow (holding only) with a pulsing core once charge passes 0.1.

use glam::Vec2;

use super::{GradientStop, Rgba, Surface, channel};
use crate::sim::ParticleField;

/// Stars fainter than this get no connector line
const CONNECTOR_MIN_OPACITY: f32 = 0.2;
const CONNECTOR_RANGE: f32 = 250.0;
const CONNECTOR_RANGE_CHARGE_GAIN: f32 = 100.0;
const GLOW_RADIUS: f32 = 80.0;
const GLOW_RADIUS_CHARGE_GAIN: f32 = 220.0;
const CORE_MIN_CHARGE: f32 = 0.1;

/// Draw one frame of the field
pub fn draw_field(field: &ParticleField, surface: &mut impl Surface, now_ms: f64) {
    surface.clear();

    let pointer = field.pointer();
    if pointer.holding {
        draw_connectors(field, surface);
    }

    for p in field.particles() {
        if p.opacity <= 0.0 {
            continue;
        }
        surface.fill_circle(p.pos, p.size, Rgba::white(p.opacity));
    }

    if pointer.holding {
        draw_glow(surface, pointer.pos, pointer.charge, now_ms);
    }
}

fn draw_connectors(field: &ParticleField, surface: &mut impl Surface) {
    let pointer = field.pointer();
    let charge = pointer.charge;
    let range = CONNECTOR_RANGE + charge * CONNECTOR_RANGE_CHARGE_GAIN;
    let range_sq = range * range;

    let ends: Vec<Vec2> = field
        .particles()
        .iter()
        .filter(|p| p.opacity >= CONNECTOR_MIN_OPACITY)
        .filter(|p| (pointer.pos - p.pos).length_squared() < range_sq)
        .map(|p| p.pos)
        .collect();
    if ends.is_empty() {
        return;
    }

    let gb = channel(100.0 + charge * 155.0);
    let color = Rgba::new(255, gb, gb, 0.2 + charge * 0.3);
    surface.stroke_segments(pointer.pos, &ends, color, 0.5 + charge);
}

fn draw_glow(surface: &mut impl Surface, center: Vec2, charge: f32, now_ms: f64) {
    let radius = GLOW_RADIUS + charge * GLOW_RADIUS_CHARGE_GAIN;
    let g = (100.0 + charge * 155.0).floor();
    let b = (50.0 + charge * 205.0).floor();
    let stops = [
        GradientStop::new(0.0, Rgba::new(255, channel(g), channel(b), 0.3 + charge * 0.5)),
        GradientStop::new(
            0.5,
            Rgba::new(255, channel(g * 0.5), channel(b * 0.5), 0.1 + charge * 0.2),
        ),
        GradientStop::new(1.0, Rgba::new(255, 0, 0, 0.0)),
    ];
    surface.fill_radial(center, radius, &stops);

    if charge > CORE_MIN_CHARGE {
        let pulse = (now_ms * 0.02).sin() as f32;
        let core = 10.0 + charge * 20.0 + pulse * 8.0 * charge;
        let stops = [
            GradientStop::new(0.0, Rgba::white(charge * 0.8)),
            GradientStop::new(1.0, Rgba::new(255, 255, 200, 0.0)),
        ];
        surface.fill_radial(center, core, &stops);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCommand, RecordingSurface};
    use crate::sim::TickContext;
    use crate::tuning::FieldTuning;
    use crate::{Rect, consts::MAX_PARTICLES};

    fn field() -> ParticleField {
        ParticleField::new(Rect::new(0.0, 0.0, 1000.0, 800.0), FieldTuning::default(), 21)
    }

    #[test]
    fn test_idle_frame_has_no_pointer_effects() {
        let f = field();
        let mut s = RecordingSurface::new();
        draw_field(&f, &mut s, 0.0);
        assert_eq!(s.commands[0], DrawCommand::Clear);
        assert_eq!(s.radials(), 0);
        assert!(!s.commands.iter().any(|c| matches!(c, DrawCommand::Segments { .. })));
        let visible = f.particles().iter().filter(|p| p.opacity > 0.0).count();
        assert_eq!(s.circles(), visible);
        assert!(visible <= MAX_PARTICLES);
    }

    #[test]
    fn test_holding_draws_glow_and_core() {
        let mut f = field();
        let p = Vec2::new(500.0, 400.0);
        f.on_pointer_move(p);
        f.on_pointer_down(p, 0.0);
        f.tick(TickContext { now_ms: 5_000.0 });

        let mut s = RecordingSurface::new();
        draw_field(&f, &mut s, 5_000.0);
        // Charge 0.5: outer glow plus inner core
        assert_eq!(s.radials(), 2);
        let outer = s
            .last_frame()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Radial { radius, center, .. } => Some((*radius, *center)),
                _ => None,
            })
            .unwrap();
        assert!((outer.0 - 190.0).abs() < 1e-3);
        assert_eq!(outer.1, p);
    }

    #[test]
    fn test_low_charge_has_no_core() {
        let mut f = field();
        let p = Vec2::new(500.0, 400.0);
        f.on_pointer_move(p);
        f.on_pointer_down(p, 0.0);
        f.tick(TickContext { now_ms: 500.0 });
        let mut s = RecordingSurface::new();
        draw_field(&f, &mut s, 500.0);
        assert_eq!(s.radials(), 1);
    }

    #[test]
    fn test_connectors_only_reach_nearby_bright_stars() {
        let mut f = field();
        let p = Vec2::new(500.0, 400.0);
        f.on_pointer_move(p);
        f.on_pointer_down(p, 0.0);
        let mut s = RecordingSurface::new();
        draw_field(&f, &mut s, 0.0);
        for c in s.last_frame() {
            if let DrawCommand::Segments { hub, ends, width, .. } = c {
                assert_eq!(*hub, p);
                assert!((*width - 0.5).abs() < 1e-6);
                for e in ends {
                    assert!((*e - p).length() < 250.0);
                }
            }
        }
    }
}
