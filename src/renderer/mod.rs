//! 2D rendering
//!
//! The field is drawn through the [`Surface`] trait so the same drawing code
//! runs against a browser canvas or a command recorder in tests.

pub mod field;
pub mod recording;

pub use field::draw_field;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

/// Straight (non-premultiplied) RGBA colour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// White at the given alpha
    pub const fn white(a: f32) -> Self {
        Self::new(255, 255, 255, a)
    }

    /// CSS `rgba()` notation
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a.clamp(0.0, 1.0))
    }
}

/// Convert a 0..=255 channel computed in float space
#[inline]
pub(crate) fn channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0).floor() as u8
}

/// One colour stop of a radial gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the radius, 0..=1
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// A 2D drawing surface sized to the viewport, redrawn every frame
pub trait Surface {
    /// Erase the whole surface
    fn clear(&mut self);

    /// Stroke one path made of segments from each of `ends` to `hub`
    fn stroke_segments(&mut self, hub: Vec2, ends: &[Vec2], color: Rgba, width: f32);

    /// Fill a circle
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fill a circle with a radial gradient centred on it
    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_css() {
        assert_eq!(Rgba::new(255, 100, 50, 0.5).to_css(), "rgba(255, 100, 50, 0.500)");
        assert_eq!(Rgba::white(1.4).to_css(), "rgba(255, 255, 255, 1.000)");
    }

    #[test]
    fn test_channel_floors_and_clamps() {
        assert_eq!(channel(177.5), 177);
        assert_eq!(channel(300.0), 255);
        assert_eq!(channel(-3.0), 0);
    }
}
