//! Cut-Throat Arcade - barbershop-themed arcade mini-games
//!
//! Core modules:
//! - `sim`: Frame simulation (particles, precision timing, fight simulation)
//! - `highscores`: Ranked top-10 boards per game mode
//! - `persistence`: JSON score store on disk
//! - `platform`: Frame clock and semantic input
//! - `scene`: Scene controller (menu, mini-games, score gate, board)
//! - `settings`: User preferences

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;

pub use highscores::{GameMode, HighScores, ScoreEntry, ScoreLedger};
pub use scene::{App, AppContext, Scene, SceneView};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Logical screen dimensions (all simulation coordinates are in these pixels)
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Default frame rate the loop is paced to
    pub const TARGET_FPS: u32 = 60;
    /// Frame delta cap so a stalled frame can't teleport fighters through each other
    pub const MAX_FRAME_DT: f32 = 0.1;
}

/// RGB colors used by effects. Drawing itself lives outside this crate.
pub mod palette {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Color(pub u8, pub u8, pub u8);

    pub const WHITE: Color = Color(240, 240, 240);
    pub const ELECTRIC_BLUE: Color = Color(20, 200, 255);
    pub const NEON_RED: Color = Color(255, 36, 64);
}
