//! Precision Cut: hold the clippers steady inside the fade zone
//!
//! While the clippers are engaged inside the target zone and the hand is
//! steady, the precision meter fills, the combo grows and score accrues with a
//! combo multiplier. Anything else bleeds the meter and eventually the combo.
//! The round ends when the time budget runs out.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::distance_to_polyline;
use super::particles::{Burst, ParticleSet};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::palette;

/// Default round length in seconds
pub const PRECISION_TIME_LIMIT: f32 = 40.0;

/// Sweet band (screen y range) where a cut counts
pub const SWEET_BAND_TOP: f32 = SCREEN_HEIGHT / 2.0 - 80.0;
pub const SWEET_BAND_BOTTOM: f32 = SCREEN_HEIGHT / 2.0 + 60.0;

/// Meter gain per second while cutting in zone
pub const ACCUMULATE_RATE: f32 = 0.8;
/// Meter loss per second while cutting outside the zone (or shaking)
pub const MISS_DECAY_RATE: f32 = 0.6;
/// Meter loss per second while the clippers are off
pub const IDLE_DECAY_RATE: f32 = 0.4;
/// Seconds a combo survives without a clean cut before it starts to drop
pub const COMBO_GRACE: f32 = 1.0;
/// Base points per second of clean cutting
pub const SCORE_RATE: f32 = 5.0;
/// Extra multiplier per combo step
pub const COMBO_BONUS: f32 = 0.02;
/// Max per-frame motion (|dx| + |dy|, pixels) that still counts as steady
pub const STEADY_JITTER: f32 = 4.0;
/// Meter level that triggers the "PERFECT" flash
pub const PERFECT_THRESHOLD: f32 = 0.95;
const PERFECT_FADE_RATE: f32 = 1.2;
/// Clipper speed when driven by directional keys (pixels/s)
pub const TOOL_SPEED: f32 = 420.0;

/// Sparks thrown off the clippers on every clean frame
pub const CUT_SPARKS: Burst = Burst {
    count: 3,
    speed: (120.0, 320.0),
    life: (0.4, 0.8),
    radius: (2.0, 5.0),
    primary: palette::ELECTRIC_BLUE,
    secondary: palette::WHITE,
    primary_chance: 0.7,
    gravity: 0.0,
};

/// Region the clippers must stay in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TargetZone {
    /// Horizontal band between two screen y values
    Band { top: f32, bottom: f32 },
    /// Fade line: within `threshold` pixels of the polyline
    Path { points: Vec<Vec2>, threshold: f32 },
}

impl Default for TargetZone {
    fn default() -> Self {
        TargetZone::Band {
            top: SWEET_BAND_TOP,
            bottom: SWEET_BAND_BOTTOM,
        }
    }
}

impl TargetZone {
    /// A gently curving fade line across the side of the head
    pub fn fade_line() -> Self {
        let mid = SCREEN_HEIGHT / 2.0;
        let points = (0..=8)
            .map(|i| {
                let t = i as f32 / 8.0;
                let x = SCREEN_WIDTH * (0.25 + 0.5 * t);
                let y = mid - 20.0 + (t * std::f32::consts::PI).sin() * 40.0;
                Vec2::new(x, y)
            })
            .collect();
        TargetZone::Path {
            points,
            threshold: 24.0,
        }
    }

    pub fn contains(&self, pos: Vec2) -> bool {
        match self {
            TargetZone::Band { top, bottom } => pos.y >= *top && pos.y <= *bottom,
            TargetZone::Path { points, threshold } => distance_to_polyline(pos, points) < *threshold,
        }
    }
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrecisionPhase {
    Running,
    /// Time is up; the final score is locked
    Finished,
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct PrecisionInput {
    /// Pointer position, if a pointer drives the clippers
    pub pointer: Option<Vec2>,
    /// Directional keys (-1..1 per axis), used when there is no pointer
    pub direction: Vec2,
    /// Clippers engaged (button/trigger held)
    pub cutting: bool,
}

/// Complete Precision Cut round state
#[derive(Debug, Clone)]
pub struct PrecisionState {
    pub phase: PrecisionPhase,
    pub zone: TargetZone,
    /// Clipper position
    pub tool: Vec2,
    /// Motion of the clippers during the last frame (|dx| + |dy|)
    pub jitter: f32,
    pub cutting: bool,
    /// Whether the last frame was a clean cut
    pub in_zone: bool,
    pub time_limit: f32,
    pub time_left: f32,
    /// Precision meter, always within [0, 1]
    pub precision: f32,
    pub combo: u32,
    pub combo_timer: f32,
    /// Cumulative (unscaled) score
    pub score: f32,
    /// "PERFECT" text opacity
    pub perfect_flash: f32,
    pub particles: ParticleSet,
    pub particle_cap: usize,
    rng: Pcg32,
    final_score: Option<i64>,
}

impl PrecisionState {
    pub fn new(seed: u64) -> Self {
        Self::with_time_limit(seed, PRECISION_TIME_LIMIT)
    }

    pub fn with_time_limit(seed: u64, time_limit: f32) -> Self {
        Self {
            phase: PrecisionPhase::Running,
            zone: TargetZone::default(),
            tool: Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            jitter: 0.0,
            cutting: false,
            in_zone: false,
            time_limit,
            time_left: time_limit,
            precision: 0.0,
            combo: 0,
            combo_timer: 0.0,
            score: 0.0,
            perfect_flash: 0.0,
            particles: ParticleSet::new(),
            particle_cap: usize::MAX,
            rng: Pcg32::seed_from_u64(seed),
            final_score: None,
        }
    }

    pub fn with_zone(mut self, zone: TargetZone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_particle_cap(mut self, cap: usize) -> Self {
        self.particle_cap = cap;
        self
    }

    pub fn is_finished(&self) -> bool {
        self.phase == PrecisionPhase::Finished
    }

    /// Locked final score, available once the round has finished
    pub fn final_score(&self) -> Option<i64> {
        self.final_score
    }

    /// Score the round would lock in right now
    pub fn projected_score(&self) -> i64 {
        final_score_for(self.score, self.precision)
    }
}

/// Final score from cumulative score and the ending precision meter
pub fn final_score_for(cumulative: f32, precision: f32) -> i64 {
    (cumulative * 10.0 + precision * 100.0).round() as i64
}

/// Advance the round by one frame
pub fn tick(state: &mut PrecisionState, input: &PrecisionInput, dt: f32) {
    if state.phase == PrecisionPhase::Finished {
        return;
    }

    let previous = state.tool;
    let target = match input.pointer {
        Some(p) => p,
        None => state.tool + input.direction.clamp_length_max(1.0) * TOOL_SPEED * dt,
    };
    state.tool = target.clamp(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let delta = state.tool - previous;
    state.jitter = delta.x.abs() + delta.y.abs();
    state.cutting = input.cutting;

    let steady = state.jitter < STEADY_JITTER;
    let clean = input.cutting && steady && state.zone.contains(state.tool);
    state.in_zone = clean;

    if clean {
        state.precision = (state.precision + ACCUMULATE_RATE * dt).clamp(0.0, 1.0);
        state.combo += 1;
        state.combo_timer = COMBO_GRACE;
        state.score += SCORE_RATE * dt * (1.0 + state.combo as f32 * COMBO_BONUS);
        if state.precision > PERFECT_THRESHOLD {
            state.perfect_flash = 1.0;
        }
        let origin = state.tool;
        state.particles.burst(&mut state.rng, origin, &CUT_SPARKS);
    } else {
        let decay = if input.cutting {
            MISS_DECAY_RATE
        } else {
            IDLE_DECAY_RATE
        };
        state.precision = (state.precision - decay * dt).clamp(0.0, 1.0);
        state.combo_timer = (state.combo_timer - dt).max(0.0);
        if state.combo_timer <= 0.0 {
            state.combo = state.combo.saturating_sub(1);
        }
    }

    state.particles.advance(dt);
    state.particles.trim_oldest(state.particle_cap);
    state.perfect_flash = (state.perfect_flash - dt * PERFECT_FADE_RATE).max(0.0);

    state.time_left -= dt;
    if state.time_left <= 0.0 {
        state.time_left = 0.0;
        state.phase = PrecisionPhase::Finished;
        let score = final_score_for(state.score, state.precision);
        state.final_score = Some(score);
        log::info!(
            "Precision Cut finished: score {} (precision {:.2}, combo {})",
            score,
            state.precision,
            state.combo
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn in_zone_input() -> PrecisionInput {
        PrecisionInput {
            pointer: Some(Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0)),
            direction: Vec2::ZERO,
            cutting: true,
        }
    }

    #[test]
    fn test_clean_cut_fills_meter_and_combo() {
        let mut state = PrecisionState::new(1);
        let input = in_zone_input();
        tick(&mut state, &input, DT);
        tick(&mut state, &input, DT);
        assert!(state.in_zone);
        assert_eq!(state.combo, 2);
        assert!(state.precision > 0.0);
        assert!(state.score > 0.0);
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_outside_zone_decays() {
        let mut state = PrecisionState::new(1);
        state.precision = 0.5;
        state.combo = 10;
        state.combo_timer = 0.0;
        state.tool = Vec2::new(640.0, 100.0);
        let input = PrecisionInput {
            pointer: Some(Vec2::new(640.0, 100.0)),
            cutting: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(!state.in_zone);
        assert!((state.precision - (0.5 - MISS_DECAY_RATE * DT)).abs() < 1e-6);
        assert_eq!(state.combo, 9);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_combo_survives_grace_period() {
        let mut state = PrecisionState::new(1);
        let input = in_zone_input();
        for _ in 0..10 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.combo, 10);

        // Release the clippers for half a second: combo held by grace timer
        let idle = PrecisionInput {
            pointer: input.pointer,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &idle, DT);
        }
        assert_eq!(state.combo, 10);

        // Past the grace period it drains
        for _ in 0..40 {
            tick(&mut state, &idle, DT);
        }
        assert!(state.combo < 10);
    }

    #[test]
    fn test_shaky_hand_does_not_count() {
        let mut state = PrecisionState::new(1);
        state.tool = Vec2::new(640.0, 350.0);
        let input = PrecisionInput {
            pointer: Some(Vec2::new(660.0, 350.0)),
            cutting: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);
        assert!(state.jitter >= STEADY_JITTER);
        assert!(!state.in_zone);
        assert_eq!(state.precision, 0.0);
    }

    #[test]
    fn test_keys_drive_clippers_within_screen() {
        let mut state = PrecisionState::new(1);
        let input = PrecisionInput {
            direction: Vec2::new(-1.0, 0.0),
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, DT);
        }
        assert_eq!(state.tool.x, 0.0);
    }

    #[test]
    fn test_fade_line_zone() {
        let zone = TargetZone::fade_line();
        if let TargetZone::Path { points, .. } = &zone {
            assert!(zone.contains(points[3]));
            assert!(!zone.contains(points[3] + Vec2::new(0.0, 100.0)));
        } else {
            panic!("expected a path zone");
        }
    }

    #[test]
    fn test_finished_round_ignores_input() {
        let mut state = PrecisionState::with_time_limit(1, 0.05);
        let input = in_zone_input();
        for _ in 0..5 {
            tick(&mut state, &input, DT);
        }
        assert!(state.is_finished());
        let locked = state.final_score();
        let score = state.score;
        tick(&mut state, &input, DT);
        assert_eq!(state.final_score(), locked);
        assert_eq!(state.score, score);
        assert_eq!(state.time_left, 0.0);
    }

    #[test]
    fn test_full_clean_round_maxes_meter() {
        let mut state = PrecisionState::with_time_limit(42, 10.0);
        let input = in_zone_input();
        let mut frames = 0u32;
        while !state.is_finished() && frames < 1000 {
            tick(&mut state, &input, DT);
            frames += 1;
            if frames as f32 * DT > 1.0 / ACCUMULATE_RATE + 0.1 {
                assert_eq!(state.precision, 1.0);
            }
        }
        assert!(state.is_finished());
        assert_eq!(state.precision, 1.0);
        assert_eq!(state.combo, frames);

        // Every frame was clean: sum of 5*dt*(1 + 0.02*n) for n = 1..=frames
        let n = frames as f32;
        let expected = SCORE_RATE * DT * (n + COMBO_BONUS * n * (n + 1.0) / 2.0);
        assert!((state.score - expected).abs() / expected < 1e-3);
        assert_eq!(
            state.final_score(),
            Some((state.score * 10.0 + 100.0).round() as i64)
        );
    }

    #[test]
    fn test_particle_cap_applies() {
        let mut state = PrecisionState::new(3).with_particle_cap(4);
        let input = in_zone_input();
        for _ in 0..10 {
            tick(&mut state, &input, DT);
        }
        assert!(state.particles.len() <= 4);
    }

    proptest! {
        #[test]
        fn prop_meter_rises_only_on_clean_frames(
            holds in proptest::collection::vec(
                (0.0f32..1280.0, 240.0f32..460.0, any::<bool>(), 1usize..30),
                1..20,
            ),
            dt in 0.001f32..0.05,
        ) {
            let mut state = PrecisionState::with_time_limit(9, 5.0);
            for (x, y, cutting, frames) in holds {
                let input = PrecisionInput {
                    pointer: Some(Vec2::new(x, y)),
                    direction: Vec2::ZERO,
                    cutting,
                };
                for frame in 0..frames {
                    let before = state.precision;
                    let was_running = !state.is_finished();
                    tick(&mut state, &input, dt);
                    prop_assert!((0.0..=1.0).contains(&state.precision));
                    prop_assert!(state.score >= 0.0);
                    if !was_running {
                        continue;
                    }
                    if state.in_zone {
                        prop_assert!(state.precision > before || state.precision == 1.0);
                    } else {
                        prop_assert!(state.precision <= before);
                    }
                    if frame > 0 {
                        // Held pointer: clean exactly when cutting inside the band
                        let in_band = (SWEET_BAND_TOP..=SWEET_BAND_BOTTOM).contains(&y);
                        prop_assert_eq!(state.in_zone, cutting && in_band);
                    }
                }
            }
        }
    }
}
