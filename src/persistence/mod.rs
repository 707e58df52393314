//! High score file persistence
//!
//! Features:
//! - Plain JSON, one array of `{name, score}` per game mode
//! - Missing file reads as empty boards
//! - A malformed board is reset on its own; the other mode's board survives
//! - Atomic replace on save (write tmp, then rename over the old file)

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;

use crate::highscores::{GameMode, HighScores, ScoreBoard, ScoreEntry};

/// Default score file, relative to the run directory
pub const DEFAULT_SCORE_FILE: &str = "highscores.json";

/// The on-disk score file
#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the boards. A missing file is not an error.
    pub fn load(&self) -> Result<HighScores> {
        if !self.path.exists() {
            log::info!("No high score file at {}, starting fresh", self.path.display());
            return Ok(HighScores::default());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        let Value::Object(boards) = value else {
            bail!("parsing {}: expected an object of boards", self.path.display());
        };

        let mut scores = HighScores::new();
        for mode in GameMode::ALL {
            let Some(board) = boards.get(mode.as_str()) else {
                continue;
            };
            match read_board(board) {
                Some(board) => *scores.board_mut(mode) = board,
                None => log::warn!(
                    "{} board in {} is not a list, resetting it",
                    mode.as_str(),
                    self.path.display()
                ),
            }
        }
        Ok(scores)
    }

    /// Write the boards, replacing the old file only once the new one is complete
    pub fn save(&self, scores: &HighScores) -> Result<()> {
        let content = serde_json::to_string_pretty(scores).context("serializing high scores")?;
        let tmp = self.tmp_path();
        fs::write(&tmp, content).with_context(|| format!("writing {}", tmp.display()))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(e).with_context(|| format!("replacing {}", self.path.display()));
        }
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Decode one board, skipping entries that can't be read. `None` if the
/// board itself isn't a list.
fn read_board(value: &Value) -> Option<ScoreBoard> {
    let items = value.as_array()?;
    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        match read_entry(item) {
            Some(entry) => entries.push(entry),
            None => log::warn!("Skipping unreadable score entry: {}", item),
        }
    }
    Some(ScoreBoard::from_entries(entries))
}

/// `{name, score}` with a missing name as `---`, a missing score as 0 and
/// fractional scores rounded
fn read_entry(value: &Value) -> Option<ScoreEntry> {
    let obj = value.as_object()?;
    let name = match obj.get("name") {
        None | Some(Value::Null) => "---".to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(_) => return None,
    };
    let score = match obj.get("score") {
        None | Some(Value::Null) => 0,
        Some(Value::Number(n)) => match n.as_i64() {
            Some(score) => score,
            None => {
                let score = n.as_f64().filter(|s| s.is_finite())?;
                score.round() as i64
            }
        },
        Some(_) => return None,
    };
    Some(ScoreEntry { name, score })
}

impl Default for ScoreStore {
    fn default() -> Self {
        Self::new(DEFAULT_SCORE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::GameMode;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("nope.json"));
        let scores = store.load().unwrap();
        assert_eq!(scores, HighScores::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("highscores.json"));
        let mut scores = HighScores::new();
        scores.board_mut(GameMode::Precision).insert("Ada", 512);
        scores.board_mut(GameMode::Brawl).insert("Tank", 93);

        store.save(&scores).unwrap();
        assert!(!dir.path().join("highscores.json.tmp").exists());
        assert_eq!(store.load().unwrap(), scores);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = ScoreStore::new(&path).load().unwrap_err();
        assert!(format!("{:#}", err).contains("parsing"));
    }

    #[test]
    fn test_bad_board_does_not_reset_the_other() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs::write(&path, r#"{"precision":5,"brawl":[{"name":"Tank","score":93}]}"#).unwrap();

        let scores = ScoreStore::new(&path).load().unwrap();
        assert!(scores.precision.is_empty());
        assert_eq!(scores.brawl.entries()[0].name, "Tank");
        assert_eq!(scores.brawl.top_score(), Some(93));
    }

    #[test]
    fn test_entries_are_read_one_by_one() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("highscores.json");
        fs::write(
            &path,
            r#"{
                "precision": [{"name":"Ada","score":12.0}, {"name":"Bo","score":"lots"}, 7, {"score":3.6}],
                "brawl": [{"name":"Tank","score":93}]
            }"#,
        )
        .unwrap();

        let scores = ScoreStore::new(&path).load().unwrap();
        let precision: Vec<(&str, i64)> = scores
            .precision
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.score))
            .collect();
        assert_eq!(precision, vec![("Ada", 12), ("---", 4)]);
        assert_eq!(scores.brawl.top_score(), Some(93));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = ScoreStore::new(dir.path().join("missing").join("highscores.json"));
        assert!(store.save(&HighScores::new()).is_err());
    }
}
