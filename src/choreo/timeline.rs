//! Time-positioned sequences of calls and tweens
//!
//! A timeline is advanced by the host's frame delta. Calls fire once, in
//! position order, when the playhead passes them; tweens are sampled on
//! demand. `then_*` helpers append at the current end, like chaining in a
//! web animation timeline.

use super::ease::{Ease, lerp};

/// Handle to a tween inside a [`Timeline`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TweenId(usize);

#[derive(Debug, Clone, Copy, PartialEq)]
struct TweenSpec {
    start: f32,
    duration: f32,
    ease: Ease,
    from: f32,
    to: f32,
}

impl TweenSpec {
    fn end(&self) -> f32 {
        self.start + self.duration
    }

    fn sample(&self, t: f32) -> f32 {
        let progress = if self.duration <= 0.0 {
            if t >= self.start { 1.0 } else { 0.0 }
        } else {
            (t - self.start) / self.duration
        };
        lerp(self.from, self.to, self.ease.apply(progress))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineState {
    Running,
    Finished,
    Killed,
}

#[derive(Debug, Clone)]
pub struct Timeline<E> {
    elapsed: f32,
    cues: Vec<(f32, E)>,
    next_cue: usize,
    tweens: Vec<TweenSpec>,
    /// Explicit end marker set by `then_wait`
    tail: f32,
    state: TimelineState,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            cues: Vec::new(),
            next_cue: 0,
            tweens: Vec::new(),
            tail: 0.0,
            state: TimelineState::Running,
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at absolute position `at` (seconds)
    pub fn call_at(&mut self, at: f32, event: E) -> &mut Self {
        // Keep insertion order among cues sharing a position
        let idx = self.cues.partition_point(|(t, _)| *t <= at);
        self.cues.insert(idx, (at, event));
        self
    }

    /// Schedule `event` at the current end
    pub fn then_call(&mut self, event: E) -> &mut Self {
        let at = self.end();
        self.call_at(at, event)
    }

    /// Add a tween at absolute position `at`
    pub fn tween_at(&mut self, at: f32, duration: f32, ease: Ease, from: f32, to: f32) -> TweenId {
        self.tweens.push(TweenSpec {
            start: at.max(0.0),
            duration: duration.max(0.0),
            ease,
            from,
            to,
        });
        TweenId(self.tweens.len() - 1)
    }

    /// Add a tween starting at the current end
    pub fn then_tween(&mut self, duration: f32, ease: Ease, from: f32, to: f32) -> TweenId {
        let at = self.end();
        self.tween_at(at, duration, ease, from, to)
    }

    /// Extend the timeline by an idle stretch
    pub fn then_wait(&mut self, duration: f32) -> &mut Self {
        self.tail = self.end() + duration.max(0.0);
        self
    }

    /// Position of the last cue, tween end or wait
    pub fn end(&self) -> f32 {
        let cues = self.cues.last().map(|(t, _)| *t).unwrap_or(0.0);
        let tweens = self.tweens.iter().map(TweenSpec::end).fold(0.0, f32::max);
        cues.max(tweens).max(self.tail)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn state(&self) -> TimelineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == TimelineState::Finished
    }

    /// Stop permanently; no further calls fire and tweens freeze
    pub fn kill(&mut self) {
        self.state = TimelineState::Killed;
    }

    /// Move the playhead forward by `dt` seconds, returning the calls passed
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        if self.state != TimelineState::Running {
            return Vec::new();
        }
        self.elapsed += dt.max(0.0);

        let mut fired = Vec::new();
        while let Some((at, event)) = self.cues.get(self.next_cue) {
            if *at > self.elapsed {
                break;
            }
            fired.push(event.clone());
            self.next_cue += 1;
        }

        if self.elapsed >= self.end() {
            self.state = TimelineState::Finished;
        }
        fired
    }

    /// Current value of a tween
    pub fn value(&self, id: TweenId) -> f32 {
        self.tweens
            .get(id.0)
            .map(|t| t.sample(self.elapsed))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_fire_in_order_once() {
        let mut tl = Timeline::new();
        tl.call_at(0.6, 2).call_at(0.0, 1).call_at(1.2, 3);
        assert_eq!(tl.advance(0.0), vec![1]);
        assert_eq!(tl.advance(0.5), Vec::<i32>::new());
        assert_eq!(tl.advance(1.0), vec![2, 3]);
        assert_eq!(tl.advance(1.0), Vec::<i32>::new());
    }

    #[test]
    fn test_then_appends_after_end() {
        let mut tl: Timeline<&str> = Timeline::new();
        let a = tl.tween_at(0.0, 3.0, Ease::None, 0.0, 100.0);
        tl.then_wait(0.8);
        let b = tl.then_tween(0.8, Ease::None, 1.0, 0.0);
        tl.then_call("done");
        assert!((tl.end() - 4.6).abs() < 1e-5);

        tl.advance(1.5);
        assert!((tl.value(a) - 50.0).abs() < 1e-3);
        assert_eq!(tl.value(b), 1.0);
        tl.advance(2.7);
        assert!((tl.value(b) - 0.5).abs() < 1e-3);
        assert_eq!(tl.advance(1.0), vec!["done"]);
        assert!(tl.is_finished());
    }

    #[test]
    fn test_kill_stops_calls() {
        let mut tl = Timeline::new();
        tl.call_at(1.0, ());
        tl.advance(0.5);
        tl.kill();
        assert!(tl.advance(5.0).is_empty());
        assert_eq!(tl.state(), TimelineState::Killed);
    }
}
