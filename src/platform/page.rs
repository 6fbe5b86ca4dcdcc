//! Page shell: shared context and the set of mounted effects

use std::rc::Rc;

use web_sys::{Document, Window};

use super::boot::{BootMount, mount_boot};
use super::cursor::{CursorMount, mount_cursor};
use super::hero::{HeroMount, mount_hero};
use super::scroll::{NavMount, ScrollMount, mount_nav, mount_scroll};
use super::{BrowserFrames, BrowserTimers, document, load_content, window};
use crate::error::Result;
use crate::sched::{FrameHost, TimerHost};
use crate::{FieldTuning, Settings, SiteContent};

/// What every mount reads from
pub struct PageContext {
    pub window: Window,
    pub document: Document,
    pub frames: Rc<dyn FrameHost>,
    pub timers: Rc<dyn TimerHost>,
    pub settings: Settings,
    pub content: Rc<SiteContent>,
    pub tuning: FieldTuning,
}

impl PageContext {
    pub fn detect() -> Result<Self> {
        let window = window()?;
        let document = document()?;
        let content = load_content(&document);
        Ok(Self {
            frames: Rc::new(BrowserFrames::new(window.clone())),
            timers: Rc::new(BrowserTimers::new(window.clone())),
            settings: Settings::detect(),
            content: Rc::new(content),
            tuning: FieldTuning::default(),
            window,
            document,
        })
    }
}

/// Log a failed mount and carry on without it
fn optional<T>(what: &str, mounted: Result<T>) -> Option<T> {
    match mounted {
        Ok(m) => Some(m),
        Err(e) => {
            log::warn!("{what} not mounted: {e}");
            None
        }
    }
}

/// All mounted effects; dropping the page revokes every listener, frame
/// loop, observer and timer it started
pub struct Page {
    // Dropped in declaration order: boot before hero
    boot: Option<BootMount>,
    hero: Option<Rc<HeroMount>>,
    cursor: Option<CursorMount>,
    nav: Option<NavMount>,
    scroll: Option<ScrollMount>,
}

impl Page {
    pub fn mount(ctx: &PageContext) -> Self {
        let hero = optional("Hero", mount_hero(ctx)).map(Rc::new);
        let reduced = !ctx.settings.effective_animations();

        let weak_hero = hero.as_ref().map(Rc::downgrade);
        let boot = optional(
            "Boot overlay",
            mount_boot(ctx, move || {
                if let Some(hero) = weak_hero.and_then(|w| w.upgrade()) {
                    hero.play_entrance(reduced);
                }
            }),
        );
        if boot.is_none() {
            if let Some(hero) = &hero {
                hero.play_entrance(reduced);
            }
        }

        let page = Self {
            boot,
            hero,
            cursor: optional("Cursor", mount_cursor(ctx)),
            nav: optional("Navigation", mount_nav(ctx)),
            scroll: optional("Scroll animations", mount_scroll(ctx)),
        };
        log::info!("Page mounted");
        page
    }

    pub fn unmount(mut self) {
        self.boot.take();
        if let Some(hero) = self.hero.take().and_then(|h| Rc::try_unwrap(h).ok()) {
            hero.unmount();
        }
        self.cursor.take();
        self.nav.take();
        self.scroll.take();
        log::info!("Page unmounted");
    }
}
