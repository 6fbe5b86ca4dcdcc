//! Data-driven particle field constants
//!
//! Every force and lifecycle constant of the starfield lives here so the feel
//! can be adjusted without touching the simulation.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_CHARGE_SECS, MAX_PARTICLES, WRAP_MARGIN};

/// Particle field tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    /// Constant pool size
    pub particle_count: usize,
    /// Seconds of hold to reach full charge
    pub max_charge_secs: f64,

    // === Lifecycle ===
    /// Lifespan range in ticks
    pub life_min: f32,
    pub life_max: f32,
    /// Ticks spent fading in after birth
    pub fade_in_ticks: f32,
    /// Fraction of lifespan after which the death fade starts
    pub death_start: f32,
    /// Twinkle amplitude and angular rate (radians per tick)
    pub twinkle_amplitude: f32,
    pub twinkle_rate: f32,
    /// Birth size range
    pub size_min: f32,
    pub size_max: f32,
    /// Birth peak opacity range
    pub opacity_min: f32,
    pub opacity_max: f32,
    /// Birth velocity spread per axis (uniform in ±spread/2)
    pub birth_speed_spread: f32,

    // === Attraction ===
    pub attract_radius: f32,
    pub attract_base: f32,
    pub attract_charge_gain: f32,
    /// Tremble spread per axis at full charge (uniform in ±tremble/2)
    pub tremble: f32,
    pub brighten_base: f32,
    pub brighten_charge_gain: f32,

    // === Explosion ===
    pub explosion_range: f32,
    pub explosion_range_charge_gain: f32,
    pub explosion_power: f32,
    /// Exponent of the `(1 - d/range)` distance falloff
    pub explosion_falloff_exponent: f32,
    /// Exponent applied to the release charge
    pub explosion_charge_exponent: f32,
    /// Multiplier on `charge^exponent`
    pub explosion_charge_multiplier: f32,

    // === Motion ===
    /// Drift spread per axis (uniform in ±drift/2)
    pub drift: f32,
    pub calm_max_speed: f32,
    pub burst_max_speed: f32,
    pub burst_max_speed_charge_gain: f32,
    pub friction: f32,
    pub wrap_margin: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            particle_count: MAX_PARTICLES,
            max_charge_secs: MAX_CHARGE_SECS,

            life_min: 3000.0,
            life_max: 8000.0,
            fade_in_ticks: 100.0,
            death_start: 0.85,
            twinkle_amplitude: 0.1,
            twinkle_rate: 0.05,
            size_min: 0.5,
            size_max: 2.5,
            opacity_min: 0.3,
            opacity_max: 1.0,
            birth_speed_spread: 0.5,

            attract_radius: 400.0,
            attract_base: 0.3,
            attract_charge_gain: 0.7,
            tremble: 1.5,
            brighten_base: 0.3,
            brighten_charge_gain: 0.3,

            explosion_range: 350.0,
            explosion_range_charge_gain: 250.0,
            explosion_power: 18.0,
            explosion_falloff_exponent: 1.8,
            explosion_charge_exponent: 1.5,
            explosion_charge_multiplier: 12.0,

            drift: 0.02,
            calm_max_speed: 3.0,
            burst_max_speed: 30.0,
            burst_max_speed_charge_gain: 45.0,
            friction: 0.98,
            wrap_margin: WRAP_MARGIN,
        }
    }
}

impl FieldTuning {
    /// Attraction force magnitude at `distance` for the given charge
    #[inline]
    pub fn attraction_force(&self, distance: f32, charge: f32) -> f32 {
        let base = self.attract_base + charge * self.attract_charge_gain;
        ((self.attract_radius - distance) / self.attract_radius) * base
    }

    /// Explosion reach for a release charge
    #[inline]
    pub fn explosion_range(&self, charge: f32) -> f32 {
        self.explosion_range + charge * self.explosion_range_charge_gain
    }

    /// Explosion force magnitude at `distance` within `range`
    #[inline]
    pub fn explosion_force(&self, distance: f32, range: f32, charge: f32) -> f32 {
        let charge_multiplier =
            1.0 + charge.powf(self.explosion_charge_exponent) * self.explosion_charge_multiplier;
        let falloff = (1.0 - distance / range).powf(self.explosion_falloff_exponent);
        falloff * self.explosion_power * charge_multiplier
    }

    /// Speed cap for a tick; `release_charge` is set only on the explosion edge
    #[inline]
    pub fn max_speed(&self, release_charge: Option<f32>) -> f32 {
        match release_charge {
            Some(charge) => self.burst_max_speed + charge * self.burst_max_speed_charge_gain,
            None => self.calm_max_speed,
        }
    }

    /// Parse tuning overrides from JSON (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attraction_force_endpoints() {
        let t = FieldTuning::default();
        assert!((t.attraction_force(0.0, 0.0) - 0.3).abs() < 1e-6);
        assert!((t.attraction_force(0.0, 1.0) - 1.0).abs() < 1e-6);
        assert!(t.attraction_force(400.0, 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_explosion_force_full_charge() {
        let t = FieldTuning::default();
        let range = t.explosion_range(1.0);
        assert!((range - 600.0).abs() < 1e-4);
        // At the epicentre: 18 * (1 + 12) = 234
        assert!((t.explosion_force(0.0, range, 1.0) - 234.0).abs() < 1e-3);
        assert!(t.explosion_force(range, range, 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_max_speed() {
        let t = FieldTuning::default();
        assert_eq!(t.max_speed(None), 3.0);
        assert_eq!(t.max_speed(Some(0.0)), 30.0);
        assert_eq!(t.max_speed(Some(1.0)), 75.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = FieldTuning::from_json(r#"{"explosion_falloff_exponent": 2.0}"#).unwrap();
        assert_eq!(t.explosion_falloff_exponent, 2.0);
        assert_eq!(t.particle_count, MAX_PARTICLES);
    }
}
