//! Revocable frame loop and timer handles
//!
//! The host (browser or a test driver) owns the actual scheduling. Effects
//! hold a [`FrameLoop`] or [`Timeout`] and revoke it on drop, so tearing down
//! an effect can never leave a callback behind.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// One-shot callback for the next animation frame (timestamp in ms)
pub type FrameCallback = Box<dyn FnOnce(f64)>;
/// One-shot timer callback
pub type TimerCallback = Box<dyn FnOnce()>;

/// Host-issued identifier for a pending frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub i64);

/// Host-issued identifier for a pending timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub i64);

/// Something that can run a callback on the next animation frame
pub trait FrameHost {
    /// Returns `None` when the request could not be registered
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameToken>;
    fn cancel_frame(&self, token: FrameToken);
}

/// Something that can run a callback after a delay
pub trait TimerHost {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Option<TimerToken>;
    fn clear_timeout(&self, token: TimerToken);
}

/// What a frame step wants next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

struct LoopInner {
    host: Rc<dyn FrameHost>,
    pending: Cell<Option<FrameToken>>,
    running: Cell<bool>,
    step: RefCell<Box<dyn FnMut(f64) -> LoopControl>>,
}

/// A frame task that re-registers itself every frame until stopped.
///
/// Dropping the handle cancels the pending frame request.
pub struct FrameLoop {
    inner: Rc<LoopInner>,
}

impl FrameLoop {
    /// Start the loop; the first step runs on the next frame
    pub fn start(
        host: Rc<dyn FrameHost>,
        step: impl FnMut(f64) -> LoopControl + 'static,
    ) -> Self {
        let inner = Rc::new(LoopInner {
            host,
            pending: Cell::new(None),
            running: Cell::new(true),
            step: RefCell::new(Box::new(step)),
        });
        schedule(&inner);
        Self { inner }
    }

    /// Stop the loop and revoke the pending frame request
    pub fn cancel(&self) {
        self.inner.running.set(false);
        if let Some(token) = self.inner.pending.take() {
            self.inner.host.cancel_frame(token);
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn schedule(inner: &Rc<LoopInner>) {
    let weak: Weak<LoopInner> = Rc::downgrade(inner);
    let token = inner.host.request_frame(Box::new(move |now| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        inner.pending.set(None);
        if !inner.running.get() {
            return;
        }
        let control = {
            let mut step = inner.step.borrow_mut();
            (*step)(now)
        };
        if control == LoopControl::Stop {
            inner.running.set(false);
        }
        if inner.running.get() {
            schedule(&inner);
        }
    }));
    if token.is_none() {
        log::warn!("Frame request rejected; loop stopped");
        inner.running.set(false);
    }
    inner.pending.set(token);
}

/// A one-shot timer, cleared on drop if it has not fired
pub struct Timeout {
    host: Rc<dyn TimerHost>,
    token: Rc<Cell<Option<TimerToken>>>,
}

impl Timeout {
    pub fn start(host: Rc<dyn TimerHost>, delay_ms: u32, callback: impl FnOnce() + 'static) -> Self {
        let token = Rc::new(Cell::new(None));
        let fired = Rc::downgrade(&token);
        let issued = host.set_timeout(
            delay_ms,
            Box::new(move || {
                if let Some(slot) = fired.upgrade() {
                    slot.set(None);
                    callback();
                }
            }),
        );
        token.set(issued);
        Self { host, token }
    }

    /// Whether the timer is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.token.get().is_some()
    }

    pub fn cancel(&self) {
        if let Some(token) = self.token.take() {
            self.host.clear_timeout(token);
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Frame host driven by hand: `fire` runs every queued frame callback
#[derive(Default)]
pub struct ManualFrames {
    next_id: Cell<i64>,
    queue: RefCell<Vec<(FrameToken, FrameCallback)>>,
}

impl ManualFrames {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of frame callbacks waiting
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run one frame; returns how many callbacks fired
    pub fn fire(&self, now_ms: f64) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let count = batch.len();
        for (_, callback) in batch {
            callback(now_ms);
        }
        count
    }
}

impl FrameHost for ManualFrames {
    fn request_frame(&self, callback: FrameCallback) -> Option<FrameToken> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let token = FrameToken(id);
        self.queue.borrow_mut().push((token, callback));
        Some(token)
    }

    fn cancel_frame(&self, token: FrameToken) {
        self.queue.borrow_mut().retain(|(t, _)| *t != token);
    }
}

/// Timer host driven by hand through a virtual clock
#[derive(Default)]
pub struct ManualTimers {
    now_ms: Cell<f64>,
    next_id: Cell<i64>,
    queue: RefCell<Vec<(TimerToken, f64, TimerCallback)>>,
}

impl ManualTimers {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Move the clock forward, firing due timers in deadline order
    pub fn advance(&self, dt_ms: f64) -> usize {
        let now = self.now_ms.get() + dt_ms;
        self.now_ms.set(now);
        let mut fired = 0;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let due = queue
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, at, _))| *at <= now)
                    .min_by(|a, b| a.1.1.total_cmp(&b.1.1))
                    .map(|(i, _)| i);
                due.map(|i| queue.remove(i))
            };
            match next {
                Some((_, _, callback)) => {
                    callback();
                    fired += 1;
                }
                None => break,
            }
        }
        fired
    }
}

impl TimerHost for ManualTimers {
    fn set_timeout(&self, delay_ms: u32, callback: TimerCallback) -> Option<TimerToken> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let token = TimerToken(id);
        let at = self.now_ms.get() + f64::from(delay_ms);
        self.queue.borrow_mut().push((token, at, callback));
        Some(token)
    }

    fn clear_timeout(&self, token: TimerToken) {
        self.queue.borrow_mut().retain(|(t, _, _)| *t != token);
    }
}
