//! Section tracking: active section, scroll direction, visibility band

use crate::consts::{NAV_HIDE_OFFSET, NAV_SCROLLED_OFFSET};

/// Middle band of the viewport a section must reach to become active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityBand {
    /// Band top as a fraction of viewport height
    pub top: f32,
    /// Band bottom as a fraction of viewport height
    pub bottom: f32,
    /// Fraction of the band (or of the section, if shorter) that must be covered
    pub threshold: f32,
}

impl Default for VisibilityBand {
    fn default() -> Self {
        Self {
            top: 0.3,
            bottom: 0.7,
            threshold: 0.2,
        }
    }
}

impl VisibilityBand {
    /// Observer root margin shrinking the viewport to the band
    pub fn root_margin(&self) -> String {
        format!(
            "-{}% 0px -{}% 0px",
            (self.top * 100.0).round(),
            ((1.0 - self.bottom) * 100.0).round()
        )
    }

    /// Observer thresholds fine enough to catch the coverage crossing.
    ///
    /// Intersection ratios are relative to the section, so a section much
    /// taller than the band never gets past a small ratio. Below the 5% steps
    /// the ladder halves down to about 0.005%, which still catches the band
    /// crossing for sections hundreds of viewports tall.
    pub fn observer_thresholds() -> Vec<f64> {
        let linear = (0..=20).map(|i| f64::from(i) / 20.0);
        let fine = (1..=10).map(|k| 0.05 / f64::from(1u32 << k));
        let mut thresholds: Vec<f64> = linear.chain(fine).collect();
        thresholds.sort_by(f64::total_cmp);
        thresholds
    }

    pub fn band_height(&self, viewport_height: f32) -> f32 {
        (self.bottom - self.top).max(0.0) * viewport_height
    }

    /// Coverage from measured heights, as an intersection observer reports them
    pub fn coverage_from(&self, intersection_height: f32, section_height: f32, band_height: f32) -> f32 {
        let basis = section_height.min(band_height);
        if basis <= 0.0 {
            return 0.0;
        }
        (intersection_height / basis).clamp(0.0, 1.0)
    }

    /// Coverage of the band by a section spanning `top..bottom` (client space)
    pub fn coverage(&self, section_top: f32, section_bottom: f32, viewport_height: f32) -> f32 {
        let band_top = self.top * viewport_height;
        let band_bottom = self.bottom * viewport_height;
        let overlap = section_bottom.min(band_bottom) - section_top.max(band_top);
        self.coverage_from(
            overlap.max(0.0),
            section_bottom - section_top,
            self.band_height(viewport_height),
        )
    }

    pub fn is_entered(&self, coverage: f32) -> bool {
        coverage >= self.threshold
    }
}

/// Single-writer record of which section is active.
///
/// Only entering signals write; the last one wins. Signals for sections that
/// are no longer observed are ignored.
#[derive(Debug, Clone, Default)]
pub struct ActiveSection {
    active: Option<String>,
    observed: Vec<String>,
}

impl ActiveSection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !self.observed.contains(&id) {
            self.observed.push(id);
        }
    }

    /// Stop tracking a section; clears the active id if it was this one
    pub fn unobserve(&mut self, id: &str) {
        self.observed.retain(|o| o != id);
        if self.active.as_deref() == Some(id) {
            self.active = None;
        }
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn is_observed(&self, id: &str) -> bool {
        self.observed.iter().any(|o| o == id)
    }

    /// Record a visibility signal; returns the id on a genuine transition
    pub fn on_signal(&mut self, id: &str, entered: bool) -> Option<&str> {
        if !entered || !self.is_observed(id) || self.active.as_deref() == Some(id) {
            return None;
        }
        self.active = Some(id.to_string());
        self.active.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollTracker {
    scroll_y: f32,
    direction: ScrollDirection,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll position; returns the direction when it changed
    pub fn update(&mut self, scroll_y: f32) -> Option<ScrollDirection> {
        let direction = if scroll_y > self.scroll_y {
            ScrollDirection::Down
        } else if scroll_y < self.scroll_y {
            ScrollDirection::Up
        } else {
            self.direction
        };
        self.scroll_y = scroll_y;
        if direction != self.direction {
            self.direction = direction;
            Some(direction)
        } else {
            None
        }
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn is_scrolled(&self) -> bool {
        self.scroll_y > NAV_SCROLLED_OFFSET
    }

    pub fn nav_hidden(&self) -> bool {
        self.direction == ScrollDirection::Down && self.scroll_y > NAV_HIDE_OFFSET
    }
}
