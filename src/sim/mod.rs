//! Frame simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One `tick` per rendered frame, driven by the caller's dt
//! - Seeded RNG only (AI rolls, effect scatter)
//! - No rendering, file or platform dependencies

pub mod brawl;
pub mod collision;
pub mod fighter;
pub mod particles;
pub mod precision;

pub use brawl::{BrawlInput, BrawlState, MatchPhase, OpponentPolicy, Outcome};
pub use collision::{Rect, distance_to_polyline};
pub use fighter::{Archetype, Fighter, FighterState};
pub use particles::{Burst, Particle, ParticleSet, Shockwave};
pub use precision::{PrecisionInput, PrecisionPhase, PrecisionState, TargetZone};
