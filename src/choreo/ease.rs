//! Easing curves
//!
//! Power curves follow the usual web animation naming: `power2` is cubic,
//! `power3` quartic, `power4` quintic.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    /// Linear
    None,
    Power2Out,
    #[default]
    Power3Out,
    Power4Out,
    Power2InOut,
}

impl Ease {
    /// Map linear progress `t` (clamped to 0..=1) onto the curve
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::None => t,
            Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
            Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
            Ease::Power4Out => 1.0 - (1.0 - t).powi(5),
            Ease::Power2InOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Interpolate `from → to` at eased progress
#[inline]
pub fn lerp(from: f32, to: f32, progress: f32) -> f32 {
    from + (to - from) * progress
}
