//! Surface that records draw calls instead of rasterising them

use glam::Vec2;

use super::{GradientStop, Rgba, Surface};

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Segments {
        hub: Vec2,
        ends: Vec<Vec2>,
        color: Rgba,
        width: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Radial {
        center: Vec2,
        radius: f32,
        stops: Vec<GradientStop>,
    },
}

/// Headless surface used by tests and the native demo
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands since the most recent clear
    pub fn last_frame(&self) -> &[DrawCommand] {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .unwrap_or(0);
        &self.commands[start..]
    }

    pub fn circles(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. }))
            .count()
    }

    pub fn radials(&self) -> usize {
        self.last_frame()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Radial { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn stroke_segments(&mut self, hub: Vec2, ends: &[Vec2], color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Segments {
            hub,
            ends: ends.to_vec(),
            color,
            width,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::Radial {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }
}
