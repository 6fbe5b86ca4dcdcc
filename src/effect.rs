//! Mounted particle field: simulation, surface and frame loop bundled
//!
//! Mounting starts a self-rescheduling frame task that ticks the field and
//! redraws it. Unmounting (or dropping) revokes the pending frame, so no
//! callback runs afterwards.

use std::cell::RefCell;
use std::rc::Rc;

use crate::renderer::{Surface, draw_field};
use crate::sched::{FrameHost, FrameLoop, LoopControl};
use crate::sim::{ParticleField, TickContext, TickReport};

struct Scene<S> {
    field: ParticleField,
    surface: S,
    frames: u64,
    last_report: TickReport,
}

pub struct FieldEffect<S: Surface + 'static> {
    scene: Rc<RefCell<Scene<S>>>,
    frame_loop: FrameLoop,
}

impl<S: Surface + 'static> FieldEffect<S> {
    pub fn mount(host: Rc<dyn FrameHost>, field: ParticleField, surface: S) -> Self {
        let scene = Rc::new(RefCell::new(Scene {
            field,
            surface,
            frames: 0,
            last_report: TickReport::default(),
        }));

        let stepped = Rc::clone(&scene);
        let frame_loop = FrameLoop::start(host, move |now_ms| {
            let mut guard = stepped.borrow_mut();
            let scene = &mut *guard;
            scene.last_report = scene.field.tick(TickContext { now_ms });
            if let Some(charge) = scene.last_report.release_charge {
                log::debug!("Release burst at charge {charge:.2}");
            }
            draw_field(&scene.field, &mut scene.surface, now_ms);
            scene.frames += 1;
            LoopControl::Continue
        });

        log::info!(
            "Particle field mounted ({} stars)",
            scene.borrow().field.particles().len()
        );
        Self { scene, frame_loop }
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Frames ticked and drawn so far
    pub fn frames(&self) -> u64 {
        self.scene.borrow().frames
    }

    pub fn last_report(&self) -> TickReport {
        self.scene.borrow().last_report
    }

    /// Run `f` against the field (pointer events, resize)
    pub fn with_field<R>(&self, f: impl FnOnce(&mut ParticleField) -> R) -> R {
        f(&mut self.scene.borrow_mut().field)
    }

    pub fn with_surface<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.scene.borrow_mut().surface)
    }

    /// Stop the loop; the field is dropped with the handle
    pub fn unmount(self) {
        self.frame_loop.cancel();
        log::info!("Particle field unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rect;
    use crate::renderer::RecordingSurface;
    use crate::sched::ManualFrames;
    use crate::tuning::FieldTuning;
    use glam::Vec2;

    fn mount(frames: &Rc<ManualFrames>) -> FieldEffect<RecordingSurface> {
        let field = ParticleField::new(Rect::new(0.0, 0.0, 1280.0, 720.0), FieldTuning::default(), 3);
        FieldEffect::mount(frames.clone(), field, RecordingSurface::new())
    }

    #[test]
    fn test_ticks_and_draws_each_frame() {
        let frames = ManualFrames::new();
        let effect = mount(&frames);
        for i in 1..=3 {
            frames.fire(f64::from(i) * 16.0);
        }
        assert_eq!(effect.frames(), 3);
        effect.with_surface(|s| assert!(s.circles() > 0));
        assert!(effect.is_running());
    }

    #[test]
    fn test_unmount_leaves_no_frame_callback() {
        let frames = ManualFrames::new();
        let effect = mount(&frames);
        frames.fire(16.0);
        effect.unmount();
        assert_eq!(frames.pending(), 0);
        assert_eq!(frames.fire(32.0), 0);
    }

    #[test]
    fn test_unmount_before_first_frame() {
        let frames = ManualFrames::new();
        drop(mount(&frames));
        assert_eq!(frames.fire(16.0), 0);
    }

    #[test]
    fn test_hold_then_release_bursts_once() {
        let frames = ManualFrames::new();
        let effect = mount(&frames);
        let p = Vec2::new(640.0, 360.0);
        effect.with_field(|f| {
            f.on_pointer_move(p);
            assert!(f.on_pointer_down(p, 0.0));
        });
        frames.fire(10_000.0);
        assert!(effect.last_report().attracted > 0);

        effect.with_field(|f| f.on_pointer_up());
        frames.fire(10_016.0);
        let burst = effect.last_report();
        assert_eq!(burst.release_charge, Some(1.0));
        assert!(burst.exploded > 0);

        frames.fire(10_032.0);
        assert_eq!(effect.last_report().release_charge, None);
        assert_eq!(effect.with_field(|f| f.pointer().charge), 0.0);
    }
}
