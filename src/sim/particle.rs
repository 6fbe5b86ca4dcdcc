//! Star particles and their lifecycle
//!
//! A star fades in after birth, twinkles through most of its life, then fades
//! out over the final stretch. Dead stars are reborn in place.

use glam::Vec2;
use rand::Rng;

use crate::tuning::FieldTuning;

/// A single star
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radius, fixed at birth
    pub size: f32,
    /// Current alpha
    pub opacity: f32,
    /// Peak alpha, fixed at birth
    pub max_opacity: f32,
    /// Age in ticks
    pub life: f32,
    /// Lifespan in ticks
    pub max_life: f32,
    /// Set once the death fade has begun
    pub dying: bool,
}

/// Uniform sample in `[-spread/2, spread/2)`
#[inline]
pub(crate) fn jitter(rng: &mut impl Rng, spread: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * spread
}

/// Uniform sample in `[min, max)`
#[inline]
fn uniform(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

impl Particle {
    /// A freshly born star at a random position inside `bounds`
    pub fn birth(rng: &mut impl Rng, bounds: Vec2, tuning: &FieldTuning) -> Self {
        let max_life = uniform(rng, tuning.life_min, tuning.life_max);
        let pos = Vec2::new(rng.random::<f32>() * bounds.x, rng.random::<f32>() * bounds.y);
        let vel = Vec2::new(
            jitter(rng, tuning.birth_speed_spread),
            jitter(rng, tuning.birth_speed_spread),
        );
        Self {
            pos,
            vel,
            size: uniform(rng, tuning.size_min, tuning.size_max),
            opacity: 0.0,
            max_opacity: uniform(rng, tuning.opacity_min, tuning.opacity_max),
            life: 0.0,
            max_life,
            dying: false,
        }
    }

    /// A star for the initial pool: already partway through its life so the
    /// field does not fade in all at once.
    pub fn seeded(rng: &mut impl Rng, bounds: Vec2, tuning: &FieldTuning) -> Self {
        let mut p = Self::birth(rng, bounds, tuning);
        p.life = rng.random::<f32>() * p.max_life;
        p.opacity = p.max_opacity * (p.life / 50.0).min(1.0);
        p
    }

    /// Advance age by one tick and update the opacity curve.
    ///
    /// Returns true when the star has died and must be reborn.
    pub fn age(&mut self, tuning: &FieldTuning) -> bool {
        self.life += 1.0;

        let death_start = self.max_life * tuning.death_start;
        if self.life < tuning.fade_in_ticks {
            self.opacity = (self.life / tuning.fade_in_ticks) * self.max_opacity;
        } else if self.life > death_start {
            self.dying = true;
            let progress = (self.life - death_start) / (self.max_life - death_start);
            self.opacity = self.max_opacity * (1.0 - progress);
        } else if !self.dying {
            self.opacity =
                self.max_opacity + (self.life * tuning.twinkle_rate).sin() * tuning.twinkle_amplitude;
        }

        self.life >= self.max_life || self.opacity <= 0.0
    }

    /// Whether the star is in its death fade
    pub fn is_dying(&self) -> bool {
        self.dying
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn star(max_life: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size: 1.0,
            opacity: 0.0,
            max_opacity: 0.8,
            life: 0.0,
            max_life,
            dying: false,
        }
    }

    #[test]
    fn test_birth_ranges() {
        let tuning = FieldTuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = Vec2::new(1280.0, 720.0);
        for _ in 0..500 {
            let p = Particle::birth(&mut rng, bounds, &tuning);
            assert!((0.5..2.5).contains(&p.size));
            assert!((0.3..1.0).contains(&p.max_opacity));
            assert!((3000.0..8000.0).contains(&p.max_life));
            assert!(p.pos.x >= 0.0 && p.pos.x <= bounds.x);
            assert!(p.pos.y >= 0.0 && p.pos.y <= bounds.y);
            assert!(p.vel.x.abs() <= 0.25 && p.vel.y.abs() <= 0.25);
            assert_eq!(p.opacity, 0.0);
            assert!(!p.dying);
        }
    }

    #[test]
    fn test_fade_in() {
        let tuning = FieldTuning::default();
        let mut p = star(4000.0);
        for _ in 0..50 {
            assert!(!p.age(&tuning));
        }
        assert!((p.opacity - 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_twinkle_stays_near_peak() {
        let tuning = FieldTuning::default();
        let mut p = star(4000.0);
        p.life = 500.0;
        p.age(&tuning);
        assert!((p.opacity - p.max_opacity).abs() <= 0.1 + 1e-5);
        assert!(!p.is_dying());
    }

    #[test]
    fn test_death_fade_and_rebirth_signal() {
        let tuning = FieldTuning::default();
        let mut p = star(1000.0);
        p.life = 900.0;
        assert!(!p.age(&tuning));
        assert!(p.is_dying());
        // 901 of 1000: 51/150 of the way through the fade
        let expected = 0.8 * (1.0 - 51.0 / 150.0);
        assert!((p.opacity - expected).abs() < 1e-4);

        p.life = 998.0;
        assert!(!p.age(&tuning));
        assert!(p.age(&tuning), "star at end of life must signal rebirth");
    }
}
