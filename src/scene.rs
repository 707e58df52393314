//! Scene controller
//!
//! Menu → {Precision Cut, Street Brawl} → score gate → {name entry →} board → menu.
//! The controller only owns "which scene is current", forwards input and
//! updates to it, and hands final scores to the ledger. Drawing happens
//! outside the crate from `SceneView`.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::SCREEN_WIDTH;
use crate::highscores::{GameMode, MAX_NAME_LEN, ScoreEntry, ScoreLedger, is_name_char};
use crate::palette::Color;
use crate::platform::{Action, FrameInput};
use crate::settings::{PrecisionTarget, Settings};
use crate::sim::brawl::{self, BrawlInput, BrawlState};
use crate::sim::precision::{self, PrecisionInput, PrecisionState, TargetZone};

/// Everything that outlives a single scene
#[derive(Debug)]
pub struct AppContext {
    pub settings: Settings,
    pub ledger: ScoreLedger,
    seeds: Pcg32,
}

impl AppContext {
    pub fn new(settings: Settings, ledger: ScoreLedger, seed: u64) -> Self {
        Self {
            settings,
            ledger,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed for the next round's RNG
    pub fn next_seed(&mut self) -> u64 {
        self.seeds.random()
    }

    fn start(&mut self, mode: GameMode) -> Scene {
        let seed = self.next_seed();
        let cap = self.settings.max_particles();
        match mode {
            GameMode::Precision => {
                let zone = match self.settings.precision_target {
                    PrecisionTarget::Band => TargetZone::default(),
                    PrecisionTarget::FadeLine => TargetZone::fade_line(),
                };
                Scene::PrecisionCut {
                    state: PrecisionState::new(seed)
                        .with_zone(zone)
                        .with_particle_cap(cap),
                    input: PrecisionInput::default(),
                }
            }
            GameMode::Brawl => Scene::StreetBrawl {
                state: BrawlState::new(seed)
                    .with_policy(self.settings.opponent)
                    .with_particle_cap(cap),
                input: BrawlInput::default(),
            },
        }
    }

    /// Route a final score to the gate
    fn gate(&self, mode: GameMode, score: i64) -> Scene {
        Scene::ScoreGate(ScoreGate {
            mode,
            score,
            qualifies: self.ledger.qualifies(mode, score),
            rank: self.ledger.potential_rank(mode, score),
        })
    }
}

/// Main menu: pick a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub selected: GameMode,
}

impl Default for Menu {
    fn default() -> Self {
        Self {
            selected: GameMode::Precision,
        }
    }
}

/// Shown when a round ends: the score and whether it made the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreGate {
    pub mode: GameMode,
    pub score: i64,
    pub qualifies: bool,
    /// Rank the score would take (1-indexed)
    pub rank: Option<usize>,
}

/// Typing a name for a qualifying score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub mode: GameMode,
    pub score: i64,
    pub name: String,
}

impl NameEntry {
    /// Append a character; anything not allowed, or past the length limit, is dropped
    pub fn type_char(&mut self, c: char) {
        if is_name_char(c) && self.name.chars().count() < MAX_NAME_LEN {
            self.name.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.name.pop();
    }
}

/// The current scene
#[derive(Debug)]
pub enum Scene {
    Menu(Menu),
    PrecisionCut {
        state: PrecisionState,
        input: PrecisionInput,
    },
    StreetBrawl {
        state: BrawlState,
        input: BrawlInput,
    },
    ScoreGate(ScoreGate),
    NameEntry(NameEntry),
    HighScoreBoard {
        mode: GameMode,
    },
}

/// What the controller should do after a scene call
#[derive(Debug)]
enum Transition {
    To(Scene),
    Quit,
}

impl Scene {
    pub fn name(&self) -> &'static str {
        match self {
            Scene::Menu(_) => "Menu",
            Scene::PrecisionCut { .. } => "PrecisionCut",
            Scene::StreetBrawl { .. } => "StreetBrawl",
            Scene::ScoreGate(_) => "ScoreGate",
            Scene::NameEntry(_) => "NameEntry",
            Scene::HighScoreBoard { .. } => "HighScoreBoard",
        }
    }

    fn handle_input(&mut self, ctx: &mut AppContext, frame: &FrameInput) -> Option<Transition> {
        match self {
            Scene::Menu(menu) => {
                if frame.was_pressed(Action::Cancel) {
                    return Some(Transition::Quit);
                }
                if frame.was_pressed(Action::Left) {
                    menu.selected = GameMode::Precision;
                }
                if frame.was_pressed(Action::Right) {
                    menu.selected = GameMode::Brawl;
                }
                // Clicking a half of the screen starts that game
                if let Some(pointer) = frame.pointer.filter(|_| frame.was_pressed(Action::Primary)) {
                    menu.selected = if pointer.x < SCREEN_WIDTH / 2.0 {
                        GameMode::Precision
                    } else {
                        GameMode::Brawl
                    };
                    return Some(Transition::To(ctx.start(menu.selected)));
                }
                if frame.was_pressed(Action::Confirm) {
                    return Some(Transition::To(ctx.start(menu.selected)));
                }
                None
            }
            Scene::PrecisionCut { input, .. } => {
                if frame.was_pressed(Action::Cancel) {
                    return Some(Transition::To(Scene::Menu(Menu {
                        selected: GameMode::Precision,
                    })));
                }
                *input = PrecisionInput {
                    pointer: frame.pointer,
                    direction: frame.axis,
                    cutting: frame.primary,
                };
                None
            }
            Scene::StreetBrawl { input, .. } => {
                if frame.was_pressed(Action::Cancel) {
                    return Some(Transition::To(Scene::Menu(Menu {
                        selected: GameMode::Brawl,
                    })));
                }
                *input = BrawlInput {
                    move_x: frame.axis.x,
                    jump: frame.axis.y < -0.5 || frame.was_pressed(Action::Up),
                    attack: frame.primary,
                    super_attack: frame.secondary,
                };
                None
            }
            Scene::ScoreGate(gate) => {
                if frame.was_pressed(Action::Confirm) && gate.qualifies {
                    return Some(Transition::To(Scene::NameEntry(NameEntry {
                        mode: gate.mode,
                        score: gate.score,
                        name: String::new(),
                    })));
                }
                if frame.was_pressed(Action::Confirm) || frame.was_pressed(Action::Cancel) {
                    return Some(Transition::To(Scene::HighScoreBoard { mode: gate.mode }));
                }
                None
            }
            Scene::NameEntry(entry) => {
                for c in frame.text.chars() {
                    entry.type_char(c);
                }
                for action in &frame.pressed {
                    match action {
                        Action::Backspace => entry.backspace(),
                        Action::Confirm => {
                            ctx.ledger.submit(entry.mode, &entry.name, entry.score);
                            return Some(Transition::To(Scene::HighScoreBoard { mode: entry.mode }));
                        }
                        Action::Cancel => {
                            log::info!("Name entry cancelled, score {} not recorded", entry.score);
                            return Some(Transition::To(Scene::HighScoreBoard { mode: entry.mode }));
                        }
                        _ => {}
                    }
                }
                None
            }
            Scene::HighScoreBoard { mode } => {
                if frame.any_pressed() {
                    return Some(Transition::To(Scene::Menu(Menu { selected: *mode })));
                }
                None
            }
        }
    }

    fn update(&mut self, ctx: &mut AppContext, dt: f32) -> Option<Transition> {
        match self {
            Scene::PrecisionCut { state, input } => {
                precision::tick(state, input, dt);
                state
                    .final_score()
                    .map(|score| Transition::To(ctx.gate(GameMode::Precision, score)))
            }
            Scene::StreetBrawl { state, input } => {
                brawl::tick(state, input, dt);
                state
                    .final_score()
                    .map(|score| Transition::To(ctx.gate(GameMode::Brawl, score)))
            }
            _ => None,
        }
    }
}

/// Read-only state for drawing the current scene
#[derive(Debug)]
pub enum SceneView<'a> {
    Menu { selected: GameMode },
    PrecisionCut(&'a PrecisionState),
    StreetBrawl(&'a BrawlState),
    ScoreGate(&'a ScoreGate),
    NameEntry(&'a NameEntry),
    /// `entries` may be empty; the renderer shows a placeholder row
    HighScoreBoard {
        mode: GameMode,
        accent: Color,
        entries: &'a [ScoreEntry],
    },
}

/// The application: context plus the current scene
#[derive(Debug)]
pub struct App {
    ctx: AppContext,
    scene: Scene,
    running: bool,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            scene: Scene::Menu(Menu::default()),
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn handle_input(&mut self, input: &FrameInput) {
        if !self.running {
            return;
        }
        let transition = self.scene.handle_input(&mut self.ctx, input);
        self.apply(transition);
    }

    pub fn update(&mut self, dt: f32) {
        if !self.running {
            return;
        }
        let transition = self.scene.update(&mut self.ctx, dt);
        self.apply(transition);
    }

    /// One frame: input, then simulation
    pub fn frame(&mut self, input: &FrameInput, dt: f32) {
        self.handle_input(input);
        self.update(dt);
    }

    pub fn view(&self) -> SceneView<'_> {
        match &self.scene {
            Scene::Menu(menu) => SceneView::Menu {
                selected: menu.selected,
            },
            Scene::PrecisionCut { state, .. } => SceneView::PrecisionCut(state),
            Scene::StreetBrawl { state, .. } => SceneView::StreetBrawl(state),
            Scene::ScoreGate(gate) => SceneView::ScoreGate(gate),
            Scene::NameEntry(entry) => SceneView::NameEntry(entry),
            Scene::HighScoreBoard { mode } => SceneView::HighScoreBoard {
                mode: *mode,
                accent: mode.accent(),
                entries: self.ctx.ledger.top(*mode),
            },
        }
    }

    /// Persist the boards and stop
    pub fn shutdown(&mut self) {
        self.ctx.ledger.save();
        self.running = false;
        log::info!("Shut down from {}", self.scene.name());
    }

    fn apply(&mut self, transition: Option<Transition>) {
        match transition {
            Some(Transition::To(next)) => {
                log::info!("Scene: {} -> {}", self.scene.name(), next.name());
                self.scene = next;
            }
            Some(Transition::Quit) => {
                log::info!("Quit requested");
                self.running = false;
            }
            None => {}
        }
    }
}
