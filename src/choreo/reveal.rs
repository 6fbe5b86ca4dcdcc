//! Scroll-triggered entrance reveals
//!
//! A reveal owns a playhead over `duration + stagger × (items − 1)` seconds.
//! Crossing the trigger line plays it forward; under the default toggle
//! policy scrolling back above the line plays it backward to the exact
//! hidden state. Item `i` starts `i × stagger` into the playhead, so DOM order
//! is stagger order in both directions.

use serde::{Deserialize, Serialize};

use super::ease::{Ease, lerp};

/// What happens when the trigger line is crossed back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ToggleActions {
    /// Play on enter, reverse on leaving back ("play none none reverse")
    #[default]
    PlayReverse,
    /// Play on enter and stay revealed ("play none none none")
    PlayOnce,
}

/// Trigger when the element's top edge reaches a fraction of the viewport
/// height, measured from the viewport top ("top 85%").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerLine {
    pub viewport_fraction: f32,
}

impl TriggerLine {
    pub const fn top_at(viewport_fraction: f32) -> Self {
        Self { viewport_fraction }
    }

    /// Whether an element whose top edge is at `element_top` (client space)
    /// has crossed the line
    pub fn passed(&self, element_top: f32, viewport_height: f32) -> bool {
        element_top <= viewport_height * self.viewport_fraction
    }
}

impl Default for TriggerLine {
    fn default() -> Self {
        Self::top_at(0.85)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealConfig {
    /// Per-item animation length (seconds)
    pub duration: f32,
    /// Starting downward offset (px)
    pub slide_distance: f32,
    pub ease: Ease,
    /// Delay between consecutive items (seconds)
    pub stagger: f32,
    pub trigger: TriggerLine,
    pub toggle: ToggleActions,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration: 0.8,
            slide_distance: 60.0,
            ease: Ease::Power3Out,
            stagger: 0.1,
            trigger: TriggerLine::default(),
            toggle: ToggleActions::PlayReverse,
        }
    }
}

impl RevealConfig {
    /// Section header sliding in as its section approaches
    pub fn section_header() -> Self {
        Self {
            duration: 1.0,
            trigger: TriggerLine::top_at(0.8),
            ..Self::default()
        }
    }

    /// Content grid cards entering together as the section arrives
    pub fn content_grid() -> Self {
        Self {
            slide_distance: 40.0,
            stagger: 0.15,
            trigger: TriggerLine::top_at(0.8),
            ..Self::default()
        }
    }

    /// Per-character text reveal, played once
    pub fn text_chars() -> Self {
        Self {
            duration: 0.5,
            slide_distance: 20.0,
            stagger: 0.03,
            toggle: ToggleActions::PlayOnce,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    Hidden,
    Visible,
}

/// Visual state of one revealed item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    /// Downward translation in px
    pub offset_y: f32,
}

impl RevealStyle {
    pub const SHOWN: Self = Self {
        opacity: 1.0,
        offset_y: 0.0,
    };

    /// CSS transform for the offset
    pub fn transform(&self) -> String {
        format!("translate3d(0, {:.2}px, 0)", self.offset_y)
    }
}

/// A single element or a same-parent group revealed together
#[derive(Debug, Clone)]
pub struct Reveal {
    config: RevealConfig,
    items: usize,
    phase: RevealPhase,
    /// Playhead position in seconds
    time: f32,
    reduced_motion: bool,
}

impl Reveal {
    /// A reveal of a single element
    pub fn single(config: RevealConfig) -> Self {
        Self::staggered(config, 1)
    }

    /// A reveal of `items` elements in order
    pub fn staggered(config: RevealConfig, items: usize) -> Self {
        Self {
            config,
            items: items.max(1),
            phase: RevealPhase::Hidden,
            time: 0.0,
            reduced_motion: false,
        }
    }

    /// Reduced motion pins every item to its final state
    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn items(&self) -> usize {
        self.items
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Total playhead length
    pub fn total_duration(&self) -> f32 {
        self.config.duration + self.config.stagger * (self.items - 1) as f32
    }

    /// Feed the current trigger state; returns the new phase on a transition
    pub fn update(&mut self, trigger_passed: bool) -> Option<RevealPhase> {
        let next = match (self.phase, trigger_passed) {
            (RevealPhase::Hidden, true) => RevealPhase::Visible,
            (RevealPhase::Visible, false) if self.config.toggle == ToggleActions::PlayReverse => {
                RevealPhase::Hidden
            }
            _ => return None,
        };
        self.phase = next;
        Some(next)
    }

    /// Convenience: evaluate the trigger line for an element position
    pub fn update_position(&mut self, element_top: f32, viewport_height: f32) -> Option<RevealPhase> {
        let passed = self.config.trigger.passed(element_top, viewport_height);
        self.update(passed)
    }

    /// Move the playhead toward the end (visible) or start (hidden)
    pub fn advance(&mut self, dt: f32) {
        if self.reduced_motion {
            return;
        }
        self.time = match self.phase {
            RevealPhase::Visible => (self.time + dt).min(self.total_duration()),
            RevealPhase::Hidden => (self.time - dt).max(0.0),
        };
    }

    /// Whether the playhead rests at the end matching the phase
    pub fn is_settled(&self) -> bool {
        match self.phase {
            RevealPhase::Visible => self.time >= self.total_duration(),
            RevealPhase::Hidden => self.time <= 0.0,
        }
    }

    /// Style of item `index`
    pub fn item_style(&self, index: usize) -> RevealStyle {
        if self.reduced_motion {
            return RevealStyle::SHOWN;
        }
        let cfg = &self.config;
        let local = if cfg.duration > 0.0 {
            (self.time - cfg.stagger * index as f32) / cfg.duration
        } else if self.time > 0.0 {
            1.0
        } else {
            0.0
        };
        let eased = cfg.ease.apply(local);
        RevealStyle {
            opacity: eased,
            offset_y: lerp(cfg.slide_distance, 0.0, eased),
        }
    }

    /// Style of the first (or only) item
    pub fn style(&self) -> RevealStyle {
        self.item_style(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    fn run(reveal: &mut Reveal, secs: f32) {
        let frames = (secs / FRAME).ceil() as usize;
        for _ in 0..frames {
            reveal.advance(FRAME);
        }
    }

    #[test]
    fn test_starts_hidden() {
        let r = Reveal::single(RevealConfig::default());
        assert_eq!(r.phase(), RevealPhase::Hidden);
        assert_eq!(
            r.style(),
            RevealStyle {
                opacity: 0.0,
                offset_y: 60.0
            }
        );
    }

    #[test]
    fn test_trigger_line() {
        let line = TriggerLine::default();
        assert!(!line.passed(700.0, 800.0));
        assert!(line.passed(680.0, 800.0));
    }

    #[test]
    fn test_reverse_returns_to_exact_hidden_state() {
        let mut r = Reveal::single(RevealConfig::default());
        let hidden = r.style();

        assert_eq!(r.update_position(500.0, 800.0), Some(RevealPhase::Visible));
        run(&mut r, 1.0);
        assert!(r.is_settled());
        assert_eq!(r.style(), RevealStyle::SHOWN);

        assert_eq!(r.update_position(750.0, 800.0), Some(RevealPhase::Hidden));
        run(&mut r, 1.0);
        assert_eq!(r.style(), hidden);
    }

    #[test]
    fn test_replay_reproduces_animation() {
        let mut r = Reveal::single(RevealConfig::default());
        r.update(true);
        let mut first = Vec::new();
        for _ in 0..30 {
            r.advance(FRAME);
            first.push(r.style());
        }
        r.update(false);
        run(&mut r, 2.0);
        r.update(true);
        let mut second = Vec::new();
        for _ in 0..30 {
            r.advance(FRAME);
            second.push(r.style());
        }
        assert_eq!(first, second);
    }

    #[test]
    fn test_repeated_signal_is_no_transition() {
        let mut r = Reveal::single(RevealConfig::default());
        assert!(r.update(true).is_some());
        assert!(r.update(true).is_none());
    }

    #[test]
    fn test_play_once_never_reverses() {
        let mut r = Reveal::single(RevealConfig::text_chars());
        r.update(true);
        run(&mut r, 2.0);
        assert_eq!(r.update(false), None);
        run(&mut r, 2.0);
        assert_eq!(r.style(), RevealStyle::SHOWN);
    }

    #[test]
    fn test_stagger_preserves_order() {
        let cfg = RevealConfig::default();
        let mut r = Reveal::staggered(cfg, 4);
        assert!((r.total_duration() - 1.1).abs() < 1e-6);
        r.update(true);
        r.advance(0.25);
        let styles: Vec<f32> = (0..4).map(|i| r.item_style(i).opacity).collect();
        assert!(styles.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(styles[3], 0.0);
    }

    #[test]
    fn test_content_grid_variant() {
        let mut r = Reveal::staggered(RevealConfig::content_grid(), 3);
        assert!((r.total_duration() - 1.1).abs() < 1e-6);
        assert_eq!(r.item_style(2).offset_y, 40.0);
        // The 80% line of an 800px viewport sits at 640px
        assert_eq!(r.update_position(660.0, 800.0), None);
        assert_eq!(r.update_position(630.0, 800.0), Some(RevealPhase::Visible));
    }

    #[test]
    fn test_reduced_motion_is_final_state() {
        let mut r = Reveal::staggered(RevealConfig::default(), 3);
        r.set_reduced_motion(true);
        for i in 0..3 {
            assert_eq!(r.item_style(i), RevealStyle::SHOWN);
        }
    }
}
