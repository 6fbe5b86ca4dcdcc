//! Void Folio entry point
//!
//! On the web this mounts every effect onto the page. Natively it runs a
//! headless demo of the particle field and boot sequence.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_page {
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;

    use void_folio::platform::page::{Page, PageContext};

    thread_local! {
        static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Void Folio starting...");

        match PageContext::detect() {
            Ok(ctx) => {
                let page = Page::mount(&ctx);
                PAGE.with(|slot| *slot.borrow_mut() = Some(page));
            }
            Err(e) => log::warn!("Effects disabled: {e}"),
        }
    }

    /// Tear every effect down (page navigation, hot reload)
    #[wasm_bindgen]
    pub fn unmount() {
        let page = PAGE.with(|slot| slot.borrow_mut().take());
        if let Some(page) = page {
            page.unmount();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_page::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Void Folio (native) starting...");
    log::info!("Native mode is a headless demo - build for wasm32 to run in the browser");

    demo_field();
    demo_boot();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Hold the pointer for ten seconds, release, and report the burst
#[cfg(not(target_arch = "wasm32"))]
fn demo_field() {
    use glam::Vec2;
    use void_folio::renderer::RecordingSurface;
    use void_folio::sched::ManualFrames;
    use void_folio::sim::ParticleField;
    use void_folio::{FieldEffect, FieldTuning, Rect};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let frames = ManualFrames::new();
    let field = ParticleField::new(Rect::new(0.0, 0.0, 1280.0, 720.0), FieldTuning::default(), 7);
    let effect = FieldEffect::mount(frames.clone(), field, RecordingSurface::new());

    let center = Vec2::new(640.0, 360.0);
    effect.with_field(|f| {
        f.on_pointer_move(center);
        f.on_pointer_down(center, 0.0);
    });

    let mut now = 0.0;
    while now < 10_000.0 {
        now += FRAME_MS;
        frames.fire(now);
    }
    let charge = effect.with_field(|f| f.pointer().charge);
    log::info!(
        "Held {:.1}s: charge {:.2}, {} stars attracted",
        now / 1000.0,
        charge,
        effect.last_report().attracted
    );

    effect.with_field(|f| f.on_pointer_up());
    now += FRAME_MS;
    frames.fire(now);
    let burst = effect.last_report();
    let fastest = effect.with_field(|f| {
        f.particles()
            .iter()
            .map(|p| p.vel.length())
            .fold(0.0_f32, f32::max)
    });
    log::info!(
        "Release: charge {:?}, {} stars exploded, fastest {:.1} px/frame",
        burst.release_charge,
        burst.exploded,
        fastest
    );

    let drawn = effect.with_surface(|s| s.circles());
    log::info!("{} frames drawn, {} circles recorded", effect.frames(), drawn);
    effect.unmount();
    println!("✓ Field demo finished ({} frame callbacks left)", frames.pending());
}

/// Run the boot overlay sequence to completion
#[cfg(not(target_arch = "wasm32"))]
fn demo_boot() {
    use void_folio::SiteContent;
    use void_folio::choreo::{BootConfig, BootSequence};

    let content = SiteContent::default();
    let mut boot = BootSequence::new(content.boot_lines.len(), &BootConfig::default(), false);
    let mut t = 0.0_f32;
    let dt = 1.0 / 60.0;
    let mut shown = 0;
    while !boot.advance(dt) {
        t += dt;
        let frame = boot.frame();
        while shown < frame.lines_shown {
            println!("{}", content.boot_lines[shown]);
            shown += 1;
        }
    }
    println!("✓ Boot sequence complete after {:.2}s", t + dt);
}
