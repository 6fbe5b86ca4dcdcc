//! Pinned horizontal scroll for the projects section
//!
//! On wide viewports the section pins while vertical scroll over a distance
//! of `0.6 × content width` drives the track horizontally across its
//! scrollable width (plus end padding). Narrow viewports get a plain
//! vertical list. The layout is chosen once at mount.

use serde::{Deserialize, Serialize};

use crate::consts::{DESKTOP_MIN_WIDTH, PIN_DISTANCE_FACTOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectsLayout {
    Horizontal,
    VerticalList,
}

impl ProjectsLayout {
    pub fn choose(viewport_width: f32) -> Self {
        if viewport_width >= DESKTOP_MIN_WIDTH {
            ProjectsLayout::Horizontal
        } else {
            ProjectsLayout::VerticalList
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    /// Pin length as a fraction of content width
    pub distance_factor: f32,
    /// Extra travel past the last card (px)
    pub end_padding: f32,
    /// Smoothing time constant for the scrubbed translation (seconds)
    pub scrub: f32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            distance_factor: PIN_DISTANCE_FACTOR,
            end_padding: 100.0,
            scrub: 0.1,
        }
    }
}

/// Per-frame output of a pinned scroll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinFrame {
    pub pinned: bool,
    /// 0..=1 through the pin distance
    pub progress: f32,
    /// Horizontal track offset (px, non-positive)
    pub translate_x: f32,
}

#[derive(Debug, Clone)]
pub struct PinnedScroll {
    config: PinConfig,
    /// Section top in page coordinates
    start: f32,
    content_width: f32,
    viewport_width: f32,
    current_x: f32,
}

impl PinnedScroll {
    pub fn new(config: PinConfig, start: f32, content_width: f32, viewport_width: f32) -> Self {
        Self {
            config,
            start,
            content_width: content_width.max(0.0),
            viewport_width,
            current_x: 0.0,
        }
    }

    /// Re-measure after a resize; the layout choice is not revisited
    pub fn remeasure(&mut self, start: f32, content_width: f32, viewport_width: f32) {
        self.start = start;
        self.content_width = content_width.max(0.0);
        self.viewport_width = viewport_width;
    }

    /// Vertical scroll length the section stays pinned for
    pub fn pin_distance(&self) -> f32 {
        self.content_width * self.config.distance_factor
    }

    /// Total horizontal travel of the track
    pub fn travel(&self) -> f32 {
        (self.content_width - self.viewport_width + self.config.end_padding).max(0.0)
    }

    pub fn end(&self) -> f32 {
        self.start + self.pin_distance()
    }

    pub fn progress(&self, scroll_y: f32) -> f32 {
        let distance = self.pin_distance();
        if distance <= 0.0 {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / distance).clamp(0.0, 1.0)
    }

    pub fn is_pinned(&self, scroll_y: f32) -> bool {
        scroll_y >= self.start && scroll_y < self.end()
    }

    /// Translation the track would have with no smoothing
    pub fn target_x(&self, scroll_y: f32) -> f32 {
        -self.travel() * self.progress(scroll_y)
    }

    /// Step the scrubbed translation toward the scroll-derived target
    pub fn frame(&mut self, scroll_y: f32, dt: f32) -> PinFrame {
        let target = self.target_x(scroll_y);
        self.current_x = if self.config.scrub <= 0.0 {
            target
        } else {
            let k = 1.0 - (-dt.max(0.0) / self.config.scrub).exp();
            self.current_x + (target - self.current_x) * k
        };
        PinFrame {
            pinned: self.is_pinned(scroll_y),
            progress: self.progress(scroll_y),
            translate_x: self.current_x,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pinned() -> PinnedScroll {
        // 6 cards of 500px
        PinnedScroll::new(PinConfig::default(), 1000.0, 3000.0, 1280.0)
    }

    #[test]
    fn test_layout_choice() {
        assert_eq!(ProjectsLayout::choose(1280.0), ProjectsLayout::Horizontal);
        assert_eq!(ProjectsLayout::choose(768.0), ProjectsLayout::Horizontal);
        assert_eq!(ProjectsLayout::choose(767.0), ProjectsLayout::VerticalList);
    }

    #[test]
    fn test_geometry() {
        let p = pinned();
        assert!((p.pin_distance() - 1800.0).abs() < 1e-3);
        assert!((p.travel() - 1820.0).abs() < 1e-3);
        assert!(!p.is_pinned(999.0));
        assert!(p.is_pinned(1000.0));
        assert!(p.is_pinned(2799.0));
        assert!(!p.is_pinned(2800.0));
        assert_eq!(p.progress(1900.0), 0.5);
        assert!((p.target_x(2800.0) + 1820.0).abs() < 1e-3);
    }

    #[test]
    fn test_scrub_converges() {
        let mut p = pinned();
        let first = p.frame(1900.0, 1.0 / 60.0);
        assert!(first.translate_x < 0.0 && first.translate_x > -910.0);
        let mut last = first;
        for _ in 0..120 {
            last = p.frame(1900.0, 1.0 / 60.0);
        }
        assert!((last.translate_x + 910.0).abs() < 0.5);
        assert!(last.pinned);
        assert_eq!(last.progress, 0.5);
    }

    #[test]
    fn test_remeasure_moves_the_pin() {
        let mut p = pinned();
        p.frame(1900.0, 1.0);
        // Narrower viewport, wider track, section pushed down by late layout
        p.remeasure(1200.0, 4000.0, 1000.0);
        assert!((p.pin_distance() - 2400.0).abs() < 1e-3);
        assert!((p.travel() - 3100.0).abs() < 1e-3);
        assert!(!p.is_pinned(1100.0));
        assert!(p.is_pinned(3500.0));
        assert!(!p.is_pinned(3600.0));
        assert_eq!(p.progress(2400.0), 0.5);
        assert!((p.target_x(2400.0) + 1550.0).abs() < 1e-3);
    }

    #[test]
    fn test_narrow_content_has_no_travel() {
        let p = PinnedScroll::new(PinConfig::default(), 0.0, 600.0, 1280.0);
        assert_eq!(p.travel(), 0.0);
        assert_eq!(p.target_x(300.0), 0.0);
    }
}
