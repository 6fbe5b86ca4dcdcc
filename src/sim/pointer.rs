//! Pointer interaction state owned by the particle field

use glam::Vec2;

use crate::consts::OFFSCREEN_POINTER;

/// Pointer position, hold tracking and accumulated charge
#[derive(Debug, Clone, PartialEq)]
pub struct PointerState {
    /// Position in surface-local coordinates
    pub pos: Vec2,
    pub holding: bool,
    /// Latched on press, cleared when the release edge is consumed
    pub was_holding: bool,
    /// Timestamp (ms) of the current press
    pub hold_start: Option<f64>,
    /// Normalized hold duration, 0..=1
    pub charge: f32,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            pos: Vec2::splat(OFFSCREEN_POINTER),
            holding: false,
            was_holding: false,
            hold_start: None,
            charge: 0.0,
        }
    }
}

impl PointerState {
    pub fn move_to(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Begin a hold. A new press restarts charge accumulation from zero.
    pub fn press(&mut self, now_ms: f64) {
        if self.holding {
            return;
        }
        self.holding = true;
        self.was_holding = true;
        self.hold_start = Some(now_ms);
        self.charge = 0.0;
    }

    /// End a hold. Charge is kept until the release edge is consumed.
    pub fn release(&mut self) {
        self.holding = false;
    }

    /// Pointer left the surface: park it far away and drop the hold
    pub fn leave(&mut self) {
        self.pos = Vec2::splat(OFFSCREEN_POINTER);
        self.holding = false;
    }

    /// Recompute charge from hold duration (no-op unless holding)
    pub fn update_charge(&mut self, now_ms: f64, max_charge_secs: f64) {
        if !self.holding {
            return;
        }
        if let Some(start) = self.hold_start {
            let held_secs = ((now_ms - start) / 1000.0).max(0.0);
            let charge = (held_secs / max_charge_secs).min(1.0) as f32;
            self.charge = self.charge.max(charge);
        }
    }

    /// Whether a hold→release edge is waiting to be consumed
    pub fn release_pending(&self) -> bool {
        self.was_holding && !self.holding
    }

    /// Consume the release edge: returns the charge at release and resets
    /// hold tracking. Returns `None` when no edge is pending.
    pub fn take_release(&mut self) -> Option<f32> {
        if !self.release_pending() {
            return None;
        }
        let charge = self.charge;
        self.was_holding = false;
        self.charge = 0.0;
        self.hold_start = None;
        Some(charge)
    }
}
