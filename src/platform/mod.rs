//! Platform abstraction layer
//!
//! Handles the boundary with the window/input system:
//! - Frame pacing and per-frame dt
//! - Semantic input (movement axes, actions, typed text)

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Action, FrameInput};
