//! Cut-Throat Arcade entry point
//!
//! The window/input layer lives outside this crate. Natively the binary runs
//! headless in attract mode: a scripted player works through both mini-games,
//! signs the board, and the scores are saved on the way out.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use glam::Vec2;

use cutthroat_arcade::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use cutthroat_arcade::persistence::ScoreStore;
use cutthroat_arcade::platform::{Action, FrameClock, FrameInput};
use cutthroat_arcade::settings::SETTINGS_FILE;
use cutthroat_arcade::sim::BrawlState;
use cutthroat_arcade::{App, AppContext, GameMode, SceneView, ScoreLedger, Settings};

/// Scripted player for attract mode
#[derive(Debug, Default)]
struct AttractPilot {
    played: Vec<GameMode>,
    time: f32,
}

impl AttractPilot {
    fn next_input(&mut self, app: &App, dt: f32) -> FrameInput {
        self.time += dt;
        match app.view() {
            SceneView::Menu { .. } => match self.next_game() {
                Some(GameMode::Precision) => FrameInput::new()
                    .press(Action::Left)
                    .press(Action::Confirm),
                Some(GameMode::Brawl) => FrameInput::new()
                    .press(Action::Right)
                    .press(Action::Confirm),
                None => FrameInput::new().press(Action::Cancel),
            },
            SceneView::PrecisionCut(_) => {
                self.mark_played(GameMode::Precision);
                // Slow sweep across the sweet band, easing off now and then
                let pointer = Vec2::new(
                    SCREEN_WIDTH / 2.0 + (self.time * 0.8).sin() * 120.0,
                    SCREEN_HEIGHT / 2.0 + (self.time * 0.5).sin() * 50.0,
                );
                let input = FrameInput::new().with_pointer(pointer);
                if self.time % 6.0 < 5.0 {
                    input.holding_primary()
                } else {
                    input
                }
            }
            SceneView::StreetBrawl(state) => {
                self.mark_played(GameMode::Brawl);
                brawl_input(state)
            }
            SceneView::ScoreGate(_) => FrameInput::new().press(Action::Confirm),
            SceneView::NameEntry(entry) if entry.name.is_empty() => FrameInput::new().typed("CPU"),
            SceneView::NameEntry(_) => FrameInput::new().press(Action::Confirm),
            SceneView::HighScoreBoard { mode, entries, .. } => {
                log::info!("{} top {}:", mode.title(), entries.len());
                for (i, entry) in entries.iter().enumerate() {
                    log::info!("{:2}. {:<12} {:>6}", i + 1, entry.name, entry.score);
                }
                FrameInput::new().press(Action::Confirm)
            }
        }
    }

    fn next_game(&self) -> Option<GameMode> {
        GameMode::ALL.into_iter().find(|m| !self.played.contains(m))
    }

    fn mark_played(&mut self, mode: GameMode) {
        if !self.played.contains(&mode) {
            self.played.push(mode);
        }
    }
}

/// Walk in, swing, and fire the super whenever it's ready
fn brawl_input(state: &BrawlState) -> FrameInput {
    let gap = state.opponent.pos.x - state.player.pos.x;
    let mut input = FrameInput::new();
    if gap.abs() > 70.0 {
        input = input.with_axis(gap.signum(), 0.0);
    } else if gap.signum() != state.player.facing {
        // Turn around without walking through
        input = input.with_axis(gap.signum() * 0.1, 0.0);
    }
    if gap.abs() < 110.0 {
        input = input.holding_primary();
    }
    if state.player.meter_full() {
        input = input.holding_secondary();
    }
    input
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cut-Throat Arcade (headless attract mode) starting...");

    let settings = Settings::load_or_default(SETTINGS_FILE);
    if !Path::new(SETTINGS_FILE).exists() {
        if let Err(e) = settings.save_to(SETTINGS_FILE) {
            log::warn!("Could not write default settings: {:#}", e);
        }
    }

    let ledger = ScoreLedger::load(ScoreStore::new(&settings.highscore_path));
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut clock = FrameClock::new(settings.effective_fps());
    let mut app = App::new(AppContext::new(settings, ledger, seed));
    let mut pilot = AttractPilot::default();

    while app.is_running() {
        let dt = clock.tick();
        let input = pilot.next_input(&app, dt);
        app.frame(&input, dt);
    }

    app.shutdown();
    log::info!("Ran {} frames", clock.frames());
}
