//! Hero entrance and coordinates readout

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ease::{Ease, lerp};
use super::reveal::RevealStyle;
use super::timeline::{Timeline, TweenId};

const ENTRANCE_DELAY: f32 = 0.3;
const CONTENT_FADE: f32 = 0.8;
const LINE_RISE: f32 = 60.0;
const LINE_DURATION: f32 = 1.0;
const LINE_STAGGER: f32 = 0.15;
/// Title lines start this long before the content fade ends
const LINE_OVERLAP: f32 = 0.5;

/// One-shot entrance: content fades in, then title lines rise in order
#[derive(Debug, Clone)]
pub struct HeroEntrance {
    timeline: Timeline<()>,
    content: TweenId,
    lines: Vec<TweenId>,
    reduced_motion: bool,
}

impl HeroEntrance {
    pub fn new(line_count: usize, reduced_motion: bool) -> Self {
        let mut timeline = Timeline::new();
        let content = timeline.tween_at(ENTRANCE_DELAY, CONTENT_FADE, Ease::Power3Out, 0.0, 1.0);
        let first_line = ENTRANCE_DELAY + CONTENT_FADE - LINE_OVERLAP;
        let lines = (0..line_count)
            .map(|i| {
                timeline.tween_at(
                    first_line + i as f32 * LINE_STAGGER,
                    LINE_DURATION,
                    Ease::Power4Out,
                    0.0,
                    1.0,
                )
            })
            .collect();
        Self {
            timeline,
            content,
            lines,
            reduced_motion,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.timeline.advance(dt);
    }

    pub fn is_finished(&self) -> bool {
        self.reduced_motion || self.timeline.is_finished()
    }

    /// Stop on unmount; values freeze where they are
    pub fn kill(&mut self) {
        self.timeline.kill();
    }

    pub fn content_opacity(&self) -> f32 {
        if self.reduced_motion {
            return 1.0;
        }
        self.timeline.value(self.content)
    }

    pub fn line_style(&self, index: usize) -> RevealStyle {
        let Some(id) = self.lines.get(index) else {
            return RevealStyle::SHOWN;
        };
        if self.reduced_motion {
            return RevealStyle::SHOWN;
        }
        let v = self.timeline.value(*id);
        RevealStyle {
            opacity: v,
            offset_y: lerp(LINE_RISE, 0.0, v),
        }
    }
}

/// Geographic origin the readout wanders around
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

const LAT_SPAN: f64 = 20.0;
const LON_SPAN: f64 = 30.0;

/// Latitude/longitude shown in the hero, swinging ±10° / ±15° around `base`
/// as the pointer crosses the viewport
pub fn hero_coordinates(base: GeoPoint, pointer: Vec2, viewport: Vec2) -> GeoPoint {
    if viewport.x <= 0.0 || viewport.y <= 0.0 {
        return base;
    }
    let nx = f64::from((pointer.x / viewport.x).clamp(0.0, 1.0)) - 0.5;
    let ny = f64::from((pointer.y / viewport.y).clamp(0.0, 1.0)) - 0.5;
    GeoPoint {
        lat: base.lat + ny * LAT_SPAN,
        lon: base.lon + nx * LON_SPAN,
    }
}

impl GeoPoint {
    /// `39.9334°N, 32.8597°E` style label
    pub fn label(&self) -> String {
        let ns = if self.lat >= 0.0 { 'N' } else { 'S' };
        let ew = if self.lon >= 0.0 { 'E' } else { 'W' };
        format!("{:.4}°{ns}, {:.4}°{ew}", self.lat.abs(), self.lon.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entrance_order() {
        let mut hero = HeroEntrance::new(3, false);
        hero.advance(0.2);
        assert_eq!(hero.content_opacity(), 0.0);
        assert_eq!(hero.line_style(0).offset_y, 60.0);

        hero.advance(0.6);
        assert!(hero.content_opacity() > 0.5);
        let a = hero.line_style(0).opacity;
        let b = hero.line_style(1).opacity;
        assert!(a > b);
        assert_eq!(hero.line_style(2).opacity, 0.0);

        hero.advance(2.0);
        assert!(hero.is_finished());
        assert_eq!(hero.line_style(2), RevealStyle::SHOWN);
    }

    #[test]
    fn test_unplayed_entrance_is_hidden() {
        let hero = HeroEntrance::new(2, false);
        assert_eq!(hero.content_opacity(), 0.0);
        for i in 0..2 {
            assert_eq!(
                hero.line_style(i),
                RevealStyle {
                    opacity: 0.0,
                    offset_y: 60.0
                }
            );
        }
    }

    #[test]
    fn test_reduced_motion_entrance() {
        let hero = HeroEntrance::new(2, true);
        assert!(hero.is_finished());
        assert_eq!(hero.content_opacity(), 1.0);
        assert_eq!(hero.line_style(1), RevealStyle::SHOWN);
    }

    #[test]
    fn test_coordinates() {
        let base = GeoPoint {
            lat: 39.9334,
            lon: 32.8597,
        };
        let vp = Vec2::new(1000.0, 800.0);
        assert_eq!(hero_coordinates(base, Vec2::new(500.0, 400.0), vp), base);
        let top_right = hero_coordinates(base, Vec2::new(1000.0, 0.0), vp);
        assert!((top_right.lat - 29.9334).abs() < 1e-9);
        assert!((top_right.lon - 47.8597).abs() < 1e-9);
        assert_eq!(base.label(), "39.9334°N, 32.8597°E");
    }
}
