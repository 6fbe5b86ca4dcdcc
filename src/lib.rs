//! Void Folio - animated portfolio effects core
//!
//! Core modules:
//! - `sim`: Starfield particle simulation (pointer attraction/explosion physics)
//! - `choreo`: Scroll choreography (reveals, pinned scroll, boot sequence, timelines)
//! - `renderer`: 2D drawing surface contract and field rendering
//! - `sched`: Revocable frame loop and timer handles
//! - `effect`: Mounted particle field (simulation + surface + frame loop)
//! - `cursor`/`typewriter`: Custom cursor and tagline typewriter
//! - `platform`: Browser glue (wasm32 only)
//! - `content`: Injected read-only site content
//! - `tuning`: Data-driven particle constants

pub mod choreo;
pub mod content;
pub mod cursor;
pub mod effect;
pub mod error;
#[cfg(target_arch = "wasm32")]
pub mod platform;
pub mod renderer;
pub mod sched;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod typewriter;

pub use content::SiteContent;
pub use effect::FieldEffect;
pub use error::{ContentError, MountError};
pub use settings::Settings;
pub use tuning::FieldTuning;

use glam::Vec2;

/// Effect configuration constants
pub mod consts {
    /// Number of stars in the field (constant pool size)
    pub const MAX_PARTICLES: usize = 80;
    /// Seconds of continuous hold to reach full charge
    pub const MAX_CHARGE_SECS: f64 = 10.0;
    /// Distance past the viewport edge before a star wraps around
    pub const WRAP_MARGIN: f32 = 20.0;
    /// Pointer position used when the pointer leaves the surface
    pub const OFFSCREEN_POINTER: f32 = -1000.0;

    /// Minimum viewport width (logical px) for desktop-only effects
    pub const DESKTOP_MIN_WIDTH: f32 = 768.0;
    /// Pinned horizontal scroll length as a fraction of content width
    pub const PIN_DISTANCE_FACTOR: f32 = 0.6;

    /// Scroll offset after which the navigation gets its backdrop
    pub const NAV_SCROLLED_OFFSET: f32 = 50.0;
    /// Scroll offset after which scrolling down hides the navigation
    pub const NAV_HIDE_OFFSET: f32 = 200.0;
}

/// Axis-aligned rectangle in client (CSS pixel) space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    /// Whether a client-space point lies inside (edges inclusive)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.origin.x
            && p.x <= self.origin.x + self.size.x
            && p.y >= self.origin.y
            && p.y <= self.bottom()
    }
}

/// Linear interpolation toward `target` by `factor` of the remaining distance
#[inline]
pub fn approach(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor
}
