//! Game settings and preferences
//!
//! Persisted as `settings.json` in the run directory, separately from scores.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::consts::TARGET_FPS;
use crate::persistence::DEFAULT_SCORE_FILE;
use crate::sim::OpponentPolicy;

/// Default settings file, relative to the run directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles per mini-game for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Target the clippers are judged against in Precision Cut
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PrecisionTarget {
    /// Horizontal sweet band
    #[default]
    Band,
    /// Curved fade line
    FadeLine,
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (sparks, foam, shockwave debris)
    pub particles: bool,
    /// Frame rate the loop is paced to
    pub target_fps: u32,
    /// Where the high score file lives
    pub highscore_path: PathBuf,
    pub precision_target: PrecisionTarget,
    /// Street Brawl opponent; `Dummy` turns the round into practice
    pub opponent: OpponentPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            target_fps: TARGET_FPS,
            highscore_path: PathBuf::from(DEFAULT_SCORE_FILE),
            precision_target: PrecisionTarget::Band,
            opponent: OpponentPolicy::Reactive,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle soft cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Frame rate with nonsense values replaced by the default
    pub fn effective_fps(&self) -> u32 {
        if (1..=1000).contains(&self.target_fps) {
            self.target_fps
        } else {
            TARGET_FPS
        }
    }

    /// Load settings, using defaults if the file is missing or malformed
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings file: {:#}", e);
                Self::default()
            }
        }
    }

    /// Load settings from a path. `Ok(None)` if the file doesn't exist.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(settings))
    }

    /// Save settings to a path
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_values() {
        let settings = Settings::default();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(settings.max_particles(), 500);
        assert_eq!(settings.target_fps, 60);
        assert_eq!(settings.highscore_path, PathBuf::from("highscores.json"));
    }

    #[test]
    fn test_particles_off_means_zero_cap() {
        let mut settings = Settings::from_preset(QualityPreset::High);
        assert_eq!(settings.max_particles(), 2000);
        settings.particles = false;
        assert_eq!(settings.max_particles(), 0);
    }

    #[test]
    fn test_practice_opponent_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"opponent":"Dummy"}"#).unwrap();
        let settings = Settings::load_or_default(&path);
        assert_eq!(settings.opponent, OpponentPolicy::Dummy);
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert_eq!(Settings::default().opponent, OpponentPolicy::Reactive);
    }

    #[test]
    fn test_effective_fps() {
        let mut settings = Settings::default();
        settings.target_fps = 0;
        assert_eq!(settings.effective_fps(), TARGET_FPS);
        settings.target_fps = 144;
        assert_eq!(settings.effective_fps(), 144);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let mut settings = Settings::from_preset(QualityPreset::Low);
        settings.precision_target = PrecisionTarget::FadeLine;
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_or_default(&path), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{"quality":"High"}"#).unwrap();
        let settings = Settings::load_or_default(&path);
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.particles);
        assert_eq!(settings.target_fps, 60);
    }

    #[test]
    fn test_missing_and_malformed_fall_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert!(Settings::load_from(&path).unwrap().is_none());
        assert_eq!(Settings::load_or_default(&path), Settings::default());

        fs::write(&path, "quality = high").unwrap();
        assert!(Settings::load_from(&path).is_err());
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
