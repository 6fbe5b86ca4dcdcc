//! Device preferences and capabilities
//!
//! Detected once at start-up through media queries (WASM only). The
//! `effective_*` accessors encode which effects a device gets.

use serde::{Deserialize, Serialize};

use crate::choreo::ProjectsLayout;
use crate::consts::DESKTOP_MIN_WIDTH;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// User asked for reduced motion
    pub reduced_motion: bool,
    /// Primary input is a precise hovering pointer (mouse, trackpad)
    pub fine_pointer: bool,
    /// Viewport width in CSS pixels
    pub viewport_width: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            fine_pointer: true,
            viewport_width: 1280.0,
        }
    }
}

impl Settings {
    const REDUCED_MOTION_QUERY: &'static str = "(prefers-reduced-motion: reduce)";
    const FINE_POINTER_QUERY: &'static str = "(hover: hover) and (pointer: fine)";

    pub fn is_wide(&self) -> bool {
        self.viewport_width >= DESKTOP_MIN_WIDTH
    }

    /// Pointer-driven effects need a fine pointer on a wide viewport
    pub fn effective_pointer_effects(&self) -> bool {
        self.fine_pointer && self.is_wide()
    }

    /// Custom cursor (also off under reduced motion)
    pub fn effective_cursor(&self) -> bool {
        self.effective_pointer_effects() && !self.reduced_motion
    }

    /// Magnetic elements follow the same rule as the cursor
    pub fn effective_magnetic(&self) -> bool {
        self.effective_cursor()
    }

    /// Pinned horizontal projects scroll
    pub fn effective_pinned_scroll(&self) -> bool {
        ProjectsLayout::choose(self.viewport_width) == ProjectsLayout::Horizontal
    }

    /// Scroll and entrance animations play rather than jump to the end
    pub fn effective_animations(&self) -> bool {
        !self.reduced_motion
    }

    /// Detect from the browser's media queries (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn detect() -> Self {
        let Some(window) = web_sys::window() else {
            log::warn!("No window; using default settings");
            return Self::default();
        };
        let matches = |query: &str| {
            window
                .match_media(query)
                .ok()
                .flatten()
                .map(|m| m.matches())
                .unwrap_or(false)
        };
        let viewport_width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .map(|w| w as f32)
            .unwrap_or(Self::default().viewport_width);

        let settings = Self {
            reduced_motion: matches(Self::REDUCED_MOTION_QUERY),
            fine_pointer: matches(Self::FINE_POINTER_QUERY),
            viewport_width,
        };
        log::info!(
            "Device settings: reduced_motion={} fine_pointer={} width={}",
            settings.reduced_motion,
            settings.fine_pointer,
            settings.viewport_width
        );
        settings
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn detect() -> Self {
        Self::default()
    }
}
