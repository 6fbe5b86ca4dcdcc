//! Starfield simulation
//!
//! Per tick, for every star and in this order:
//! lifecycle → one force (attraction | explosion | drift) → speed clamp →
//! friction → integration → toroidal wrap.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::particle::{Particle, jitter};
use super::pointer::PointerState;
use crate::Rect;
use crate::tuning::FieldTuning;

/// Per-frame input to [`ParticleField::tick`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TickContext {
    /// Wall-clock timestamp in milliseconds (same clock as pointer events)
    pub now_ms: f64,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Stars pulled toward the pointer
    pub attracted: usize,
    /// Stars pushed by the release explosion
    pub exploded: usize,
    /// Stars reborn in place
    pub reborn: usize,
    /// Charge captured at the release edge, if this tick consumed one
    pub release_charge: Option<f32>,
}

/// The force branch applied to a star this tick
#[derive(Debug, Clone, Copy, PartialEq)]
enum Force {
    Attract { dir: Vec2, distance: f32 },
    Explode { dir: Vec2, distance: f32, range: f32, charge: f32 },
    Drift,
}

/// Fixed-size star pool plus the pointer state that drives it
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    pointer: PointerState,
    /// Client-space area covered by the drawing surface
    region: Rect,
    tuning: FieldTuning,
    rng: Pcg32,
    reduced_motion: bool,
}

impl ParticleField {
    /// Create a field covering `region`, with a seeded RNG
    pub fn new(region: Rect, tuning: FieldTuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let particles = (0..tuning.particle_count)
            .map(|_| Particle::seeded(&mut rng, region.size, &tuning))
            .collect();

        Self {
            particles,
            pointer: PointerState::default(),
            region,
            tuning,
            rng,
            reduced_motion: false,
        }
    }

    /// Reduced motion freezes the field at its resting state and ignores the
    /// pointer entirely.
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        if reduced {
            self.pointer = PointerState::default();
            for p in &mut self.particles {
                p.opacity = p.max_opacity;
                p.dying = false;
                p.vel = Vec2::ZERO;
            }
        }
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Update the covered region (viewport resize). Stars are kept as-is.
    pub fn resize(&mut self, region: Rect) {
        self.region = region;
    }

    /// Follow the surface as the page scrolls. Size and stars are unchanged.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.region.origin = origin;
    }

    pub fn size(&self) -> Vec2 {
        self.region.size
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Pointer moved (client coordinates)
    pub fn on_pointer_move(&mut self, client: Vec2) {
        if self.reduced_motion {
            return;
        }
        self.pointer.move_to(client - self.region.origin);
    }

    /// Pointer pressed (client coordinates). Returns whether the press was
    /// honoured, i.e. landed inside the field's region.
    pub fn on_pointer_down(&mut self, client: Vec2, now_ms: f64) -> bool {
        if self.reduced_motion || !self.region.contains(client) {
            return false;
        }
        self.pointer.press(now_ms);
        true
    }

    pub fn on_pointer_up(&mut self) {
        self.pointer.release();
    }

    pub fn on_pointer_leave(&mut self) {
        self.pointer.leave();
    }

    /// Advance every star by one frame
    pub fn tick(&mut self, ctx: TickContext) -> TickReport {
        let mut report = TickReport::default();
        if self.reduced_motion {
            return report;
        }

        self.pointer
            .update_charge(ctx.now_ms, self.tuning.max_charge_secs);
        // Read the charge for this frame's explosion, then reset it
        let release_charge = self.pointer.take_release();
        report.release_charge = release_charge;

        let pointer = self.pointer.pos;
        let holding = self.pointer.holding;
        let charge = self.pointer.charge;
        let bounds = self.region.size;
        let max_speed = self.tuning.max_speed(release_charge);
        let tuning = &self.tuning;
        let rng = &mut self.rng;

        for p in self.particles.iter_mut() {
            if p.age(tuning) {
                *p = Particle::birth(rng, bounds, tuning);
                report.reborn += 1;
            }

            match select_force(tuning, p.pos, pointer, holding, release_charge) {
                Force::Attract { dir, distance } => {
                    p.vel += dir * tuning.attraction_force(distance, charge);
                    let tremble = charge * tuning.tremble;
                    p.vel += Vec2::new(jitter(rng, tremble), jitter(rng, tremble));
                    let proximity = 1.0 - distance / tuning.attract_radius;
                    let brighten =
                        proximity * (tuning.brighten_base + charge * tuning.brighten_charge_gain);
                    p.opacity = (p.max_opacity + brighten).min(1.0);
                    report.attracted += 1;
                }
                Force::Explode {
                    dir,
                    distance,
                    range,
                    charge,
                } => {
                    p.vel -= dir * tuning.explosion_force(distance, range, charge);
                    report.exploded += 1;
                }
                Force::Drift => {
                    p.vel += Vec2::new(jitter(rng, tuning.drift), jitter(rng, tuning.drift));
                }
            }

            p.vel = clamp_speed(p.vel, max_speed);
            p.vel *= tuning.friction;
            p.pos += p.vel;
            wrap(&mut p.pos, bounds, tuning.wrap_margin);
        }

        report
    }

    #[cfg(test)]
    pub(crate) fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}

/// Pick the single force branch for a star
fn select_force(
    tuning: &FieldTuning,
    pos: Vec2,
    pointer: Vec2,
    holding: bool,
    release_charge: Option<f32>,
) -> Force {
    let delta = pointer - pos;
    let dist_sq = delta.length_squared();
    // Zero distance has no direction: fall through to drift
    if dist_sq <= 0.0 {
        return Force::Drift;
    }

    if holding && dist_sq < tuning.attract_radius * tuning.attract_radius {
        let distance = dist_sq.sqrt();
        return Force::Attract {
            dir: delta / distance,
            distance,
        };
    }

    if let Some(charge) = release_charge {
        let range = tuning.explosion_range(charge);
        if dist_sq < range * range {
            let distance = dist_sq.sqrt();
            return Force::Explode {
                dir: delta / distance,
                distance,
                range,
                charge,
            };
        }
    }

    Force::Drift
}

/// Scale `vel` down to `max_speed` if it exceeds it
#[inline]
fn clamp_speed(vel: Vec2, max_speed: f32) -> Vec2 {
    let speed_sq = vel.length_squared();
    if speed_sq > max_speed * max_speed {
        vel * (max_speed / speed_sq.sqrt())
    } else {
        vel
    }
}

/// Toroidal wrap: a star past an edge by more than `margin` reappears just
/// beyond the opposite edge.
#[inline]
fn wrap(pos: &mut Vec2, bounds: Vec2, margin: f32) {
    if pos.x < -margin {
        pos.x = bounds.x + margin;
    } else if pos.x > bounds.x + margin {
        pos.x = -margin;
    }
    if pos.y < -margin {
        pos.y = bounds.y + margin;
    } else if pos.y > bounds.y + margin {
        pos.y = -margin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_PARTICLES;
    use proptest::prelude::*;

    const W: f32 = 1280.0;
    const H: f32 = 720.0;

    fn field(seed: u64) -> ParticleField {
        ParticleField::new(Rect::new(0.0, 0.0, W, H), FieldTuning::default(), seed)
    }

    /// Put every star in mid-life at rest so forces are easy to observe
    fn calm(field: &mut ParticleField) {
        for p in field.particles_mut() {
            p.life = 1000.0;
            p.max_life = 8000.0;
            p.dying = false;
            p.vel = Vec2::ZERO;
        }
    }

    fn ctx(now_ms: f64) -> TickContext {
        TickContext { now_ms }
    }

    #[test]
    fn test_pool_starts_full() {
        assert_eq!(field(1).particles().len(), MAX_PARTICLES);
    }

    #[test]
    fn test_explosion_after_full_charge() {
        let mut f = field(42);
        calm(&mut f);
        let p = Vec2::new(640.0, 360.0);
        f.particles_mut()[0].pos = p + Vec2::new(100.0, 0.0);

        f.on_pointer_move(p);
        assert!(f.on_pointer_down(p, 0.0));
        // Hold for 10+ seconds: keep the star parked in place between frames
        for i in 1..=3 {
            f.tick(ctx(i as f64 * 5_000.0));
            f.particles_mut()[0].pos = p + Vec2::new(100.0, 0.0);
            f.particles_mut()[0].vel = Vec2::ZERO;
        }
        assert_eq!(f.pointer().charge, 1.0);

        f.on_pointer_up();
        let report = f.tick(ctx(15_100.0));
        assert_eq!(report.release_charge, Some(1.0));
        assert!(report.exploded >= 1);

        let star = &f.particles()[0];
        let speed = star.vel.length();
        assert!((30.0..=75.0).contains(&speed), "speed {speed}");
        // Outward: moving away from the release point along +x
        assert!(star.vel.x > 0.0);

        // Charge is gone on the following tick and no second explosion happens
        let next = f.tick(ctx(15_116.0));
        assert_eq!(f.pointer().charge, 0.0);
        assert_eq!(next.exploded, 0);
        assert_eq!(next.release_charge, None);
    }

    #[test]
    fn test_press_outside_region_ignored() {
        let mut f = ParticleField::new(
            Rect::new(0.0, 100.0, W, H),
            FieldTuning::default(),
            3,
        );
        assert!(!f.on_pointer_down(Vec2::new(50.0, 50.0), 0.0));
        assert!(!f.pointer().holding);
        assert!(f.on_pointer_down(Vec2::new(50.0, 150.0), 0.0));
        assert!(f.pointer().holding);
    }

    #[test]
    fn test_pointer_move_is_region_local() {
        let mut f = ParticleField::new(Rect::new(10.0, 100.0, W, H), FieldTuning::default(), 3);
        f.on_pointer_move(Vec2::new(60.0, 150.0));
        assert_eq!(f.pointer().pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn test_scrolled_surface_uses_current_origin() {
        let mut f = ParticleField::new(Rect::new(0.0, 0.0, W, 1000.0), FieldTuning::default(), 3);
        // Page scrolled by 300px: the surface now starts above the viewport
        f.set_origin(Vec2::new(0.0, -300.0));

        f.on_pointer_move(Vec2::new(100.0, 650.0));
        assert_eq!(f.pointer().pos, Vec2::new(100.0, 950.0));
        // Local y 1150 is below the surface
        assert!(!f.on_pointer_down(Vec2::new(100.0, 850.0), 0.0));
        assert!(f.on_pointer_down(Vec2::new(100.0, 650.0), 0.0));

        let before = f.particles().to_vec();
        f.set_origin(Vec2::ZERO);
        assert_eq!(f.particles(), &before[..]);
        assert_eq!(f.size(), Vec2::new(W, 1000.0));
    }

    #[test]
    fn test_attraction_pulls_toward_pointer() {
        let mut f = field(5);
        calm(&mut f);
        let p = Vec2::new(400.0, 400.0);
        f.particles_mut()[0].pos = p - Vec2::new(200.0, 0.0);
        f.on_pointer_move(p);
        f.on_pointer_down(p, 0.0);
        let report = f.tick(ctx(16.0));
        assert!(report.attracted >= 1);
        assert!(f.particles()[0].vel.x > 0.0);
    }

    #[test]
    fn test_zero_distance_is_drift() {
        let mut f = field(9);
        calm(&mut f);
        let p = Vec2::new(300.0, 300.0);
        for star in f.particles_mut() {
            star.pos = p;
        }
        f.on_pointer_move(p);
        f.on_pointer_down(p, 0.0);
        let report = f.tick(ctx(16.0));
        assert_eq!(report.attracted, 0);
        for star in f.particles() {
            assert!(star.vel.is_finite());
            assert!(star.vel.length() < 0.05);
        }
    }

    #[test]
    fn test_wrap_once_per_excursion() {
        let mut f = field(11);
        calm(&mut f);
        {
            let star = &mut f.particles_mut()[0];
            star.pos = Vec2::new(-20.5, 300.0);
            star.vel = Vec2::new(-1.0, 0.0);
        }
        f.tick(ctx(0.0));
        let x = f.particles()[0].pos.x;
        assert_eq!(x, W + 20.0);
        f.tick(ctx(16.0));
        let x2 = f.particles()[0].pos.x;
        assert!(x2 < W + 20.0 && x2 > W, "star drifted back in, not re-wrapped: {x2}");
    }

    #[test]
    fn test_resize_keeps_particles() {
        let mut f = field(13);
        let before = f.particles().to_vec();
        f.resize(Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(f.particles(), &before[..]);
        assert_eq!(f.size(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_reduced_motion_skips_forces() {
        let mut f = field(17);
        f.set_reduced_motion(true);
        let before = f.particles().to_vec();
        let p = Vec2::new(640.0, 360.0);
        f.on_pointer_move(p);
        assert!(!f.on_pointer_down(p, 0.0));
        for i in 0..10 {
            assert_eq!(f.tick(ctx(i as f64 * 16.0)), TickReport::default());
        }
        assert_eq!(f.particles(), &before[..]);
        assert!(f.particles().iter().all(|s| s.opacity == s.max_opacity));
    }

    proptest! {
        #[test]
        fn prop_pool_size_constant(seed in any::<u64>(), ticks in 1usize..400) {
            let mut f = field(seed);
            for i in 0..ticks {
                f.tick(ctx(i as f64 * 16.0));
                prop_assert_eq!(f.particles().len(), MAX_PARTICLES);
            }
        }

        #[test]
        fn prop_speed_clamped(
            seed in any::<u64>(),
            hold_ms in 0.0f64..20_000.0,
            px in 0.0f32..W,
            py in 0.0f32..H,
        ) {
            let mut f = field(seed);
            let p = Vec2::new(px, py);
            f.on_pointer_move(p);
            f.on_pointer_down(p, 0.0);
            for i in 0..30 {
                f.tick(ctx(hold_ms * i as f64 / 30.0));
                for s in f.particles() {
                    prop_assert!(s.vel.length() <= 3.0 + 1e-3);
                }
            }
            f.on_pointer_up();
            let report = f.tick(ctx(hold_ms + 16.0));
            let charge = report.release_charge.unwrap_or(0.0);
            let cap = 30.0 + charge * 45.0;
            for s in f.particles() {
                prop_assert!(s.vel.length() <= cap + 1e-3);
            }
            f.tick(ctx(hold_ms + 32.0));
            for s in f.particles() {
                prop_assert!(s.vel.length() <= 3.0 + 1e-3);
            }
        }

        #[test]
        fn prop_charge_monotonic_while_holding(
            seed in any::<u64>(),
            steps in proptest::collection::vec(0.0f64..2_000.0, 1..40),
        ) {
            let mut f = field(seed);
            f.on_pointer_down(Vec2::new(10.0, 10.0), 0.0);
            let mut now = 0.0;
            let mut last = 0.0f32;
            for dt in steps {
                now += dt;
                f.tick(ctx(now));
                let c = f.pointer().charge;
                prop_assert!(c >= last);
                prop_assert!(c <= 1.0);
                if now >= 10_000.0 {
                    prop_assert_eq!(c, 1.0);
                }
                last = c;
            }
        }

        #[test]
        fn prop_positions_stay_within_wrap_margin(seed in any::<u64>()) {
            let mut f = field(seed);
            let p = Vec2::new(640.0, 360.0);
            f.on_pointer_move(p);
            f.on_pointer_down(p, 0.0);
            for i in 0..60 {
                f.tick(ctx(i as f64 * 200.0));
            }
            f.on_pointer_up();
            f.tick(ctx(12_100.0));
            for s in f.particles() {
                prop_assert!(s.pos.x >= -20.0 - 75.0 && s.pos.x <= W + 20.0 + 75.0);
                prop_assert!(s.pos.y >= -20.0 - 75.0 && s.pos.y <= H + 20.0 + 75.0);
            }
        }
    }
}
