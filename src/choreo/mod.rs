//! Scroll choreography
//!
//! Everything here is pure state advanced by frame deltas and fed with
//! measured geometry, so it runs the same in the browser and in tests:
//! - `timeline`/`ease`: positioned calls and tweens
//! - `reveal`: trigger-line reveals with toggle policies and stagger
//! - `pinned`: pinned horizontal scroll
//! - `boot`: boot overlay sequence
//! - `sections`: active section, scroll direction, visibility band
//! - `hero`: hero entrance and coordinates readout

pub mod boot;
pub mod ease;
pub mod hero;
pub mod pinned;
pub mod reveal;
pub mod sections;
pub mod timeline;

pub use boot::{BootConfig, BootFrame, BootSequence, BootStatus};
pub use ease::Ease;
pub use hero::{GeoPoint, HeroEntrance, hero_coordinates};
pub use pinned::{PinConfig, PinFrame, PinnedScroll, ProjectsLayout};
pub use reveal::{Reveal, RevealConfig, RevealPhase, RevealStyle, ToggleActions, TriggerLine};
pub use sections::{ActiveSection, ScrollDirection, ScrollTracker, VisibilityBand};
pub use timeline::{Timeline, TimelineState, TweenId};
