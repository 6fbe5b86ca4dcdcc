//! Boot overlay mount

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::HtmlElement;

use super::page::PageContext;
use super::{html_element, js_err, set_style};
use crate::choreo::{BootConfig, BootSequence};
use crate::error::{MountError, Result};
use crate::sched::{FrameLoop, LoopControl};

const OVERLAY_ID: &str = "boot";
const LINES_ID: &str = "boot-lines";
const PROGRESS_ID: &str = "boot-progress";
const PROGRESS_BAR_ID: &str = "boot-progress-bar";

/// Running boot overlay. Dropping it mid-flight cancels the sequence and the
/// completion callback never runs.
pub struct BootMount {
    sequence: Rc<RefCell<BootSequence>>,
    _animation: FrameLoop,
}

impl Drop for BootMount {
    fn drop(&mut self) {
        self.sequence.borrow_mut().cancel();
    }
}

pub fn mount_boot(ctx: &PageContext, on_complete: impl FnOnce() + 'static) -> Result<BootMount> {
    let doc = &ctx.document;
    let overlay = doc
        .get_element_by_id(OVERLAY_ID)
        .and_then(html_element)
        .ok_or_else(|| MountError::MissingElement(format!("#{OVERLAY_ID}")))?;
    let container = doc
        .get_element_by_id(LINES_ID)
        .ok_or_else(|| MountError::MissingElement(format!("#{LINES_ID}")))?;

    let mut lines: Vec<HtmlElement> = Vec::with_capacity(ctx.content.boot_lines.len());
    for text in &ctx.content.boot_lines {
        let el = doc.create_element("div").map_err(js_err)?;
        el.set_class_name("boot-line");
        el.set_text_content(Some(text));
        container.append_child(&el).map_err(js_err)?;
        if let Some(el) = html_element(el) {
            set_style(&el, "opacity", "0");
            lines.push(el);
        }
    }
    let progress = doc.get_element_by_id(PROGRESS_ID).and_then(html_element);
    let bar = doc.get_element_by_id(PROGRESS_BAR_ID).and_then(html_element);

    let sequence = Rc::new(RefCell::new(BootSequence::new(
        lines.len(),
        &BootConfig::default(),
        !ctx.settings.effective_animations(),
    )));
    log::info!("Boot sequence started ({} lines)", lines.len());

    let seq = sequence.clone();
    let mut on_complete = Some(on_complete);
    let mut last_ms: Option<f64> = None;
    let animation = FrameLoop::start(ctx.frames.clone(), move |now| {
        let dt = last_ms.map_or(0.0, |last| ((now - last) / 1000.0) as f32);
        last_ms = Some(now);

        let mut seq = seq.borrow_mut();
        let completed = seq.advance(dt.max(0.0));
        let frame = seq.frame();
        for (i, el) in lines.iter().enumerate() {
            set_style(el, "opacity", if i < frame.lines_shown { "1" } else { "0" });
        }
        if let Some(el) = &progress {
            el.set_text_content(Some(&format!("{}%", frame.progress)));
        }
        if let Some(el) = &bar {
            set_style(el, "width", &format!("{}%", frame.progress));
        }
        set_style(&overlay, "opacity", &frame.opacity.to_string());

        if completed {
            set_style(&overlay, "display", "none");
            drop(seq);
            if let Some(done) = on_complete.take() {
                done();
            }
            return LoopControl::Stop;
        }
        LoopControl::Continue
    });

    Ok(BootMount {
        sequence,
        _animation: animation,
    })
}
