//! Boot sequence
//!
//! Status lines appear one per `line_interval` while a progress counter runs
//! 0 → 100 over `progress_duration`. After a hold at 100% the overlay fades
//! out and completion is signalled exactly once. Cancelling mid-flight
//! suppresses completion.

use serde::{Deserialize, Serialize};

use super::ease::Ease;
use super::timeline::{Timeline, TweenId};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    /// Seconds between consecutive status lines
    pub line_interval: f32,
    /// Seconds for the progress counter to reach 100%
    pub progress_duration: f32,
    /// Hold at 100% before fading
    pub hold: f32,
    pub fade: f32,
    pub fade_ease: Ease,
    /// Completion delay when reduced motion is requested
    pub reduced_motion_delay: f32,
}

impl Default for BootConfig {
    fn default() -> Self {
        Self {
            line_interval: 0.6,
            progress_duration: 3.0,
            hold: 0.8,
            fade: 0.8,
            fade_ease: Ease::Power2InOut,
            reduced_motion_delay: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BootCue {
    ShowLines(usize),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStatus {
    Running,
    Completed,
    Cancelled,
}

/// What the overlay should show this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BootFrame {
    pub lines_shown: usize,
    /// Whole percent, 0..=100
    pub progress: u8,
    pub opacity: f32,
}

#[derive(Debug, Clone)]
pub struct BootSequence {
    line_count: usize,
    timeline: Timeline<BootCue>,
    progress: TweenId,
    fade: TweenId,
    lines_shown: usize,
    status: BootStatus,
}

impl BootSequence {
    pub fn new(line_count: usize, config: &BootConfig, reduced_motion: bool) -> Self {
        let mut timeline = Timeline::new();
        let (progress, fade, lines_shown) = if reduced_motion {
            let progress = timeline.tween_at(0.0, 0.0, Ease::None, 100.0, 100.0);
            let fade = timeline.tween_at(0.0, 0.0, Ease::None, 1.0, 1.0);
            timeline.call_at(config.reduced_motion_delay, BootCue::Complete);
            (progress, fade, line_count)
        } else {
            for i in 0..line_count {
                timeline.call_at(i as f32 * config.line_interval, BootCue::ShowLines(i + 1));
            }
            let progress = timeline.tween_at(0.0, config.progress_duration, Ease::None, 0.0, 100.0);
            timeline.then_wait(config.hold);
            let fade = timeline.then_tween(config.fade, config.fade_ease, 1.0, 0.0);
            timeline.then_call(BootCue::Complete);
            (progress, fade, 0)
        };

        Self {
            line_count,
            timeline,
            progress,
            fade,
            lines_shown,
            status: BootStatus::Running,
        }
    }

    pub fn status(&self) -> BootStatus {
        self.status
    }

    /// Seconds from start to completion
    pub fn duration(&self) -> f32 {
        self.timeline.end()
    }

    /// Advance by `dt` seconds; returns `true` on the one call that completes
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.status != BootStatus::Running {
            return false;
        }
        let mut completed = false;
        for cue in self.timeline.advance(dt) {
            match cue {
                BootCue::ShowLines(n) => self.lines_shown = self.lines_shown.max(n.min(self.line_count)),
                BootCue::Complete => {
                    self.status = BootStatus::Completed;
                    completed = true;
                }
            }
        }
        if completed {
            log::info!("Boot sequence complete after {:.2}s", self.timeline.elapsed());
        }
        completed
    }

    /// Abort without signalling completion
    pub fn cancel(&mut self) {
        if self.status == BootStatus::Running {
            self.timeline.kill();
            self.status = BootStatus::Cancelled;
            log::debug!("Boot sequence cancelled");
        }
    }

    pub fn frame(&self) -> BootFrame {
        BootFrame {
            lines_shown: self.lines_shown,
            progress: self.timeline.value(self.progress).round().clamp(0.0, 100.0) as u8,
            opacity: self.timeline.value(self.fade),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn run_until_complete(boot: &mut BootSequence, max_secs: f32) -> (usize, f32) {
        let mut completions = 0;
        let mut at = None;
        let mut t = 0.0;
        while t < max_secs {
            t += FRAME;
            if boot.advance(FRAME) {
                completions += 1;
                at.get_or_insert(t);
            }
        }
        (completions, at.unwrap_or(f32::NAN))
    }

    #[test]
    fn test_lines_appear_at_intervals() {
        let mut boot = BootSequence::new(5, &BootConfig::default(), false);
        boot.advance(0.0);
        assert_eq!(boot.frame().lines_shown, 1);
        boot.advance(0.65);
        assert_eq!(boot.frame().lines_shown, 2);
        boot.advance(1.8);
        assert_eq!(boot.frame().lines_shown, 5);
        assert_eq!(boot.frame().opacity, 1.0);
    }

    #[test]
    fn test_progress_runs_to_full_then_fades() {
        let mut boot = BootSequence::new(5, &BootConfig::default(), false);
        boot.advance(1.5);
        assert_eq!(boot.frame().progress, 50);
        boot.advance(1.6);
        assert_eq!(boot.frame().progress, 100);
        assert_eq!(boot.frame().opacity, 1.0);
        boot.advance(0.7 + 0.4);
        let f = boot.frame();
        assert!(f.opacity > 0.0 && f.opacity < 1.0);
        assert_eq!(boot.status(), BootStatus::Running);
    }

    #[test]
    fn test_completes_exactly_once() {
        let mut boot = BootSequence::new(5, &BootConfig::default(), false);
        assert!((boot.duration() - 4.6).abs() < 1e-5);
        let (count, at) = run_until_complete(&mut boot, 10.0);
        assert_eq!(count, 1);
        assert!(at >= 4.6 && at < 4.6 + 2.0 * FRAME);
        assert_eq!(boot.status(), BootStatus::Completed);
        assert_eq!(boot.frame().opacity, 0.0);
    }

    #[test]
    fn test_cancel_suppresses_completion() {
        let mut boot = BootSequence::new(5, &BootConfig::default(), false);
        boot.advance(2.0);
        boot.cancel();
        let (count, _) = run_until_complete(&mut boot, 10.0);
        assert_eq!(count, 0);
        assert_eq!(boot.status(), BootStatus::Cancelled);
    }

    #[test]
    fn test_reduced_motion_short_circuit() {
        let mut boot = BootSequence::new(5, &BootConfig::default(), true);
        let f = boot.frame();
        assert_eq!(f.lines_shown, 5);
        assert_eq!(f.progress, 100);
        assert!(!boot.advance(0.1));
        assert!(boot.advance(0.15));
        assert!(!boot.advance(1.0));
    }
}
