//! Rotating tagline typewriter
//!
//! Types a text one character per `type_ms`, pauses, deletes at twice the
//! speed, then moves to the next text. The caret blinks on its own clock.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub type_ms: u32,
    /// Hold on the full text before deleting
    pub pause_ms: u32,
    pub blink_ms: u32,
    /// Start over after the last text; otherwise stop once it is typed
    pub looping: bool,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            type_ms: 80,
            pause_ms: 2500,
            blink_ms: 530,
            looping: true,
        }
    }
}

impl TypewriterConfig {
    pub fn delete_ms(&self) -> u32 {
        self.type_ms / 2
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypewriterPhase {
    Typing,
    Paused,
    Deleting,
    Done,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    texts: Vec<String>,
    index: usize,
    /// Characters of the current text on screen
    shown: usize,
    phase: TypewriterPhase,
    pending_ms: f64,
    blink_ms: f64,
    caret_visible: bool,
}

impl Typewriter {
    pub fn new(texts: Vec<String>, config: TypewriterConfig) -> Self {
        let phase = if texts.is_empty() {
            TypewriterPhase::Done
        } else {
            TypewriterPhase::Typing
        };
        Self {
            config,
            texts,
            index: 0,
            shown: 0,
            phase,
            pending_ms: 0.0,
            blink_ms: 0.0,
            caret_visible: true,
        }
    }

    /// The first text shown in full with a steady caret, for reduced motion
    pub fn still(texts: Vec<String>, config: TypewriterConfig) -> Self {
        let mut tw = Self::new(
            texts,
            TypewriterConfig {
                blink_ms: 0,
                ..config
            },
        );
        tw.shown = tw.current_len();
        tw.phase = TypewriterPhase::Done;
        tw
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    /// Index of the text being typed or deleted
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn caret_visible(&self) -> bool {
        self.caret_visible
    }

    /// Visible portion of the current text
    pub fn text(&self) -> String {
        self.texts
            .get(self.index)
            .map(|t| t.chars().take(self.shown).collect())
            .unwrap_or_default()
    }

    fn current_len(&self) -> usize {
        self.texts.get(self.index).map_or(0, |t| t.chars().count())
    }

    fn step_ms(&self) -> Option<f64> {
        let ms = match self.phase {
            TypewriterPhase::Typing => self.config.type_ms,
            TypewriterPhase::Deleting => self.config.delete_ms(),
            TypewriterPhase::Paused => self.config.pause_ms,
            TypewriterPhase::Done => return None,
        };
        Some(f64::from(ms.max(1)))
    }

    /// Advance the clock; returns `true` when the visible text changed
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if self.config.blink_ms > 0 {
            let blink = f64::from(self.config.blink_ms);
            self.blink_ms += dt_ms;
            while self.blink_ms >= blink {
                self.blink_ms -= blink;
                self.caret_visible = !self.caret_visible;
            }
        }

        self.pending_ms += dt_ms;
        let mut changed = false;
        while let Some(step) = self.step_ms() {
            if self.pending_ms < step {
                break;
            }
            self.pending_ms -= step;
            changed |= self.step();
        }
        changed
    }

    fn step(&mut self) -> bool {
        match self.phase {
            TypewriterPhase::Typing => {
                let len = self.current_len();
                let typed = self.shown < len;
                if typed {
                    self.shown += 1;
                }
                if self.shown >= len {
                    let last = self.index + 1 == self.texts.len();
                    self.phase = if last && !self.config.looping {
                        TypewriterPhase::Done
                    } else {
                        TypewriterPhase::Paused
                    };
                }
                typed
            }
            TypewriterPhase::Paused => {
                self.phase = TypewriterPhase::Deleting;
                false
            }
            TypewriterPhase::Deleting => {
                let deleted = self.shown > 0;
                if deleted {
                    self.shown -= 1;
                }
                if self.shown == 0 {
                    self.index = (self.index + 1) % self.texts.len();
                    self.phase = TypewriterPhase::Typing;
                }
                deleted
            }
            TypewriterPhase::Done => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn writer(texts: &[&str], looping: bool) -> Typewriter {
        Typewriter::new(
            texts.iter().map(|t| t.to_string()).collect(),
            TypewriterConfig {
                looping,
                ..TypewriterConfig::default()
            },
        )
    }

    #[test]
    fn test_types_one_char_per_interval() {
        let mut tw = writer(&["Dev", "Ops"], true);
        assert_eq!(tw.text(), "");
        assert!(!tw.advance(79.0));
        assert!(tw.advance(1.0));
        assert_eq!(tw.text(), "D");
        tw.advance(160.0);
        assert_eq!(tw.text(), "Dev");
        assert_eq!(tw.phase(), TypewriterPhase::Paused);
    }

    #[test]
    fn test_pause_then_delete_at_double_speed() {
        let mut tw = writer(&["Dev", "Ops"], true);
        tw.advance(240.0);
        tw.advance(2500.0);
        assert_eq!(tw.phase(), TypewriterPhase::Deleting);
        assert_eq!(tw.text(), "Dev");
        tw.advance(40.0);
        assert_eq!(tw.text(), "De");
        tw.advance(80.0);
        assert_eq!(tw.index(), 1);
        assert_eq!(tw.phase(), TypewriterPhase::Typing);
        tw.advance(80.0);
        assert_eq!(tw.text(), "O");
    }

    #[test]
    fn test_loops_back_to_first() {
        let mut tw = writer(&["a", "b"], true);
        // type, pause, delete for each text
        let cycle = 80.0 + 2500.0 + 40.0;
        tw.advance(cycle * 2.0);
        assert_eq!(tw.index(), 0);
    }

    #[test]
    fn test_non_looping_stops_on_last() {
        let mut tw = writer(&["a", "bc"], false);
        tw.advance(10_000.0);
        assert_eq!(tw.phase(), TypewriterPhase::Done);
        assert_eq!(tw.text(), "bc");
    }

    #[test]
    fn test_multibyte_text() {
        let mut tw = writer(&["Atılım"], true);
        tw.advance(80.0 * 3.0);
        assert_eq!(tw.text(), "Atı");
    }

    #[test]
    fn test_caret_blinks() {
        let mut tw = writer(&["x"], true);
        assert!(tw.caret_visible());
        tw.advance(530.0);
        assert!(!tw.caret_visible());
        tw.advance(530.0);
        assert!(tw.caret_visible());
    }

    #[test]
    fn test_still_shows_first_text_without_motion() {
        let mut tw = Typewriter::still(
            vec!["Dev".into(), "Ops".into()],
            TypewriterConfig::default(),
        );
        assert_eq!(tw.text(), "Dev");
        assert_eq!(tw.phase(), TypewriterPhase::Done);
        assert!(!tw.advance(60_000.0));
        assert_eq!(tw.text(), "Dev");
        assert!(tw.caret_visible());
    }

    #[test]
    fn test_empty_texts_are_inert() {
        let mut tw = writer(&[], true);
        assert!(!tw.advance(10_000.0));
        assert_eq!(tw.text(), "");
    }
}
