//! High score leaderboards
//!
//! One top-10 board per game mode, persisted as JSON after every submission.

use serde::{Deserialize, Serialize};

use crate::palette::{self, Color};
use crate::persistence::ScoreStore;

/// Maximum number of high scores to keep per mode
pub const MAX_HIGH_SCORES: usize = 10;
/// Longest name a player can enter
pub const MAX_NAME_LEN: usize = 12;
/// Name recorded when the player confirms an empty name
pub const ANONYMOUS: &str = "ANON";

/// Which mini-game a board belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Precision,
    Brawl,
}

impl GameMode {
    pub const ALL: [GameMode; 2] = [GameMode::Precision, GameMode::Brawl];

    /// Key used in the score file
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Precision => "precision",
            GameMode::Brawl => "brawl",
        }
    }

    /// Display title
    pub fn title(&self) -> &'static str {
        match self {
            GameMode::Precision => "PRECISION CUT",
            GameMode::Brawl => "STREET BRAWL",
        }
    }

    /// Title and highlight color for this mode's screens
    pub fn accent(&self) -> Color {
        match self {
            GameMode::Precision => palette::ELECTRIC_BLUE,
            GameMode::Brawl => palette::NEON_RED,
        }
    }
}

/// Whether a typed character may appear in a player name
pub fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '_' | '-')
}

/// Bound a name to `MAX_NAME_LEN` characters, falling back to `ANONYMOUS`
pub fn sanitize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(MAX_NAME_LEN).collect();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default = "anonymous")]
    pub name: String,
    #[serde(default)]
    pub score: i64,
}

fn anonymous() -> String {
    "---".to_string()
}

/// Top-10 list for one mode, sorted descending by score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board from entries in any order, names bounded, trimmed to the top 10
    pub fn from_entries(entries: Vec<ScoreEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    /// Check if a score qualifies for the board
    pub fn qualifies(&self, score: i64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: i64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add an entry below any equal scores and trim to the top 10.
    ///
    /// Same result as append + stable descending sort, since the board is
    /// always kept sorted. Returns the rank achieved (1-indexed) or None if
    /// the entry fell off the board.
    pub fn insert(&mut self, name: &str, score: i64) -> Option<usize> {
        let entry = ScoreEntry {
            name: sanitize_name(name),
            score,
        };
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Restore the board invariants after loading untrusted data
    pub fn normalize(&mut self) {
        for entry in &mut self.entries {
            entry.name = sanitize_name(&entry.name);
        }
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Entries in rank order (at most 10)
    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<i64> {
        self.entries.first().map(|e| e.score)
    }
}

/// All boards, as stored in the score file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HighScores {
    #[serde(default)]
    pub precision: ScoreBoard,
    #[serde(default)]
    pub brawl: ScoreBoard,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn board(&self, mode: GameMode) -> &ScoreBoard {
        match mode {
            GameMode::Precision => &self.precision,
            GameMode::Brawl => &self.brawl,
        }
    }

    pub fn board_mut(&mut self, mode: GameMode) -> &mut ScoreBoard {
        match mode {
            GameMode::Precision => &mut self.precision,
            GameMode::Brawl => &mut self.brawl,
        }
    }

    pub fn normalize(&mut self) {
        for mode in GameMode::ALL {
            self.board_mut(mode).normalize();
        }
    }
}

/// Boards plus the store they persist to.
///
/// Storage problems never interrupt play: a failed load starts empty, a
/// failed save is logged and the in-memory boards stay authoritative.
#[derive(Debug)]
pub struct ScoreLedger {
    scores: HighScores,
    store: ScoreStore,
}

impl ScoreLedger {
    /// Load from the store, falling back to empty boards
    pub fn load(store: ScoreStore) -> Self {
        let scores = match store.load() {
            Ok(mut scores) => {
                scores.normalize();
                log::info!(
                    "Loaded high scores from {} ({} precision, {} brawl)",
                    store.path().display(),
                    scores.precision.len(),
                    scores.brawl.len()
                );
                scores
            }
            Err(e) => {
                log::warn!("Could not read high scores, starting fresh: {:#}", e);
                HighScores::new()
            }
        };
        Self { scores, store }
    }

    pub fn qualifies(&self, mode: GameMode, score: i64) -> bool {
        self.scores.board(mode).qualifies(score)
    }

    pub fn potential_rank(&self, mode: GameMode, score: i64) -> Option<usize> {
        self.scores.board(mode).potential_rank(score)
    }

    /// Record a score and persist. Returns the rank achieved, if any.
    pub fn submit(&mut self, mode: GameMode, name: &str, score: i64) -> Option<usize> {
        let name = sanitize_name(name);
        let rank = self.scores.board_mut(mode).insert(&name, score);
        match rank {
            Some(r) => log::info!("{} scored {} on {}: rank #{}", name, score, mode.as_str(), r),
            None => log::info!("{} scored {} on {}: off the board", name, score, mode.as_str()),
        }
        self.save();
        rank
    }

    pub fn top(&self, mode: GameMode) -> &[ScoreEntry] {
        self.scores.board(mode).entries()
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    /// Write the boards out; failures are reported, not returned
    pub fn save(&self) {
        match self.store.save(&self.scores) {
            Ok(()) => log::debug!("High scores saved to {}", self.store.path().display()),
            Err(e) => log::error!("Could not save high scores: {:#}", e),
        }
    }
}
