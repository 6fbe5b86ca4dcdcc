//! `CanvasRenderingContext2d` surface

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::js_err;
use crate::error::{MountError, Result};
use crate::renderer::{GradientStop, Rgba, Surface};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    /// Logical size in CSS pixels
    size: Vec2,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(js_err)?
            .ok_or_else(|| MountError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| MountError::SurfaceUnavailable("unexpected context type".into()))?;
        Ok(Self {
            canvas,
            ctx,
            size: Vec2::ZERO,
        })
    }

    /// Match the backing store to `size` at the device pixel ratio
    pub fn resize(&mut self, size: Vec2, dpr: f64) {
        self.size = size;
        self.canvas.set_width((f64::from(size.x) * dpr).round() as u32);
        self.canvas.set_height((f64::from(size.y) * dpr).round() as u32);
        let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    fn circle_path(&self, center: Vec2, radius: f32) {
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        );
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(self.size.x), f64::from(self.size.y));
    }

    fn stroke_segments(&mut self, hub: Vec2, ends: &[Vec2], color: Rgba, width: f32) {
        self.ctx.begin_path();
        for end in ends {
            self.ctx.move_to(f64::from(hub.x), f64::from(hub.y));
            self.ctx.line_to(f64::from(end.x), f64::from(end.y));
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(f64::from(width));
        self.ctx.stroke();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circle_path(center, radius);
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill();
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        let (x, y) = (f64::from(center.x), f64::from(center.y));
        let Ok(gradient) = self
            .ctx
            .create_radial_gradient(x, y, 0.0, x, y, f64::from(radius.max(0.0)))
        else {
            return;
        };
        for stop in stops {
            let _ = gradient.add_color_stop(stop.offset, &stop.color.to_css());
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.circle_path(center, radius);
        self.ctx.fill();
    }
}
