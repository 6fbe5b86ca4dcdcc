//! Starfield particle simulation
//!
//! Pure and deterministic given a seed and a sequence of pointer events:
//! - Seeded RNG only
//! - Constant pool size, stars reborn in place
//! - No rendering or platform dependencies

pub mod field;
pub mod particle;
pub mod pointer;

pub use field::{ParticleField, TickContext, TickReport};
pub use particle::Particle;
pub use pointer::PointerState;
