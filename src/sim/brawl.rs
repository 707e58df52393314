//! Street Brawl: one round, player vs. AI
//!
//! Per frame: player intent, gravity, AI reaction, state timers, effects,
//! arena clamp, then the knock-out / time-up check.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::fighter::{Archetype, Fighter, FighterState};
use super::particles::{Burst, Particle, ParticleSet, Shockwave, advance_shockwaves};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::palette;

/// Round length in seconds
pub const MATCH_TIME: f32 = 99.0;
/// Feet height of a grounded fighter
pub const FLOOR_Y: f32 = SCREEN_HEIGHT - 180.0;
pub const ARENA_LEFT: f32 = 100.0;
pub const ARENA_RIGHT: f32 = SCREEN_WIDTH - 100.0;

pub const WALK_SPEED: f32 = 160.0;
pub const JUMP_VELOCITY: f32 = -320.0;
pub const GRAVITY: f32 = 800.0;

/// Hit-stun duration
pub const HIT_STUN: f32 = 0.3;
/// Upward pop on the defender when hit
pub const HIT_POP_VELOCITY: f32 = -120.0;
/// Fraction of an attack's impulse applied as horizontal knockback
pub const KNOCKBACK_SCALE: f32 = 0.05;
/// Meter the attacker earns for a landed basic attack
pub const METER_PER_HIT: f32 = 8.0;

/// AI keeps at least this much horizontal distance
pub const AI_KEEP_DISTANCE: f32 = 180.0;
pub const AI_RETREAT_SPEED: f32 = 120.0;
pub const AI_DODGE_CHANCE: f64 = 0.02;
pub const AI_DODGE_TIME: f32 = 0.2;
/// A dodge covers this many frames' worth of retreat in one step
const AI_DODGE_STEPS: f32 = 6.0;
pub const AI_HOP_CHANCE: f64 = 0.01;
pub const AI_HOP_VELOCITY: f32 = -260.0;
pub const AI_HOP_DISTANCE: f32 = 80.0;

/// An attack's numbers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attack {
    pub damage: i32,
    pub impulse: f32,
    /// How long the attacker stays in the attack state
    pub duration: f32,
    /// Hitbox offset from the body center, in the facing direction
    pub reach: f32,
    pub size: Vec2,
}

pub const BASIC_ATTACK: Attack = Attack {
    damage: 6,
    impulse: 140.0,
    duration: 0.25,
    reach: 20.0,
    size: Vec2::new(60.0, 60.0),
};

/// Flaming-fist super with a shaving-foam shockwave
pub const SUPER_ATTACK: Attack = Attack {
    damage: 18,
    impulse: 240.0,
    duration: 0.8,
    reach: 0.0,
    size: Vec2::new(220.0, 90.0),
};

const SUPER_BURST: Burst = Burst {
    count: 24,
    speed: (200.0, 460.0),
    life: (0.6, 1.2),
    radius: (3.0, 3.0),
    primary: palette::WHITE,
    secondary: palette::ELECTRIC_BLUE,
    primary_chance: 0.5,
    gravity: 30.0,
};

const FOAM_PARTICLES: usize = 8;

/// Who drives the opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpponentPolicy {
    /// Keeps its distance, dodges and hops back at random
    #[default]
    Reactive,
    /// Stands still (practice dummy)
    Dummy,
}

/// How the round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The opponent was knocked out
    KnockOut,
    /// The player was knocked out
    Defeated,
    /// The clock ran out
    TimeUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    Fighting,
    Over(Outcome),
}

/// Player intent for a single frame
#[derive(Debug, Clone, Default)]
pub struct BrawlInput {
    /// Horizontal movement (-1..1)
    pub move_x: f32,
    pub jump: bool,
    pub attack: bool,
    pub super_attack: bool,
}

/// Complete Street Brawl round state
#[derive(Debug, Clone)]
pub struct BrawlState {
    pub phase: MatchPhase,
    /// Countdown in seconds
    pub timer: f32,
    pub player: Fighter,
    pub opponent: Fighter,
    pub policy: OpponentPolicy,
    pub particles: ParticleSet,
    pub shockwaves: Vec<Shockwave>,
    pub particle_cap: usize,
    rng: Pcg32,
    final_score: Option<i64>,
}

impl BrawlState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: MatchPhase::Fighting,
            timer: MATCH_TIME,
            player: Fighter::new(
                Archetype::Tank,
                Vec2::new(SCREEN_WIDTH * 0.35, FLOOR_Y),
                1.0,
            ),
            opponent: Fighter::new(
                Archetype::Technician,
                Vec2::new(SCREEN_WIDTH * 0.65, FLOOR_Y),
                -1.0,
            ),
            policy: OpponentPolicy::Reactive,
            particles: ParticleSet::new(),
            shockwaves: Vec::new(),
            particle_cap: usize::MAX,
            rng: Pcg32::seed_from_u64(seed),
            final_score: None,
        }
    }

    pub fn with_policy(mut self, policy: OpponentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_particle_cap(mut self, cap: usize) -> Self {
        self.particle_cap = cap;
        self
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, MatchPhase::Over(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            MatchPhase::Over(outcome) => Some(outcome),
            MatchPhase::Fighting => None,
        }
    }

    /// Locked final score, available once the round is over
    pub fn final_score(&self) -> Option<i64> {
        self.final_score
    }
}

/// Final score: outcome bonus plus health difference and time left
pub fn final_score_for(outcome: Outcome, player_hp: i32, opponent_hp: i32, time_left: f32) -> i64 {
    let base = match outcome {
        Outcome::KnockOut => 100,
        _ if player_hp > opponent_hp => 60,
        _ => 30,
    };
    let swing = opponent_hp as f32 * -0.5 + player_hp as f32 * 0.8 + time_left;
    (base + swing.round() as i64).max(0)
}

/// Advance the round by one frame
pub fn tick(state: &mut BrawlState, input: &BrawlInput, dt: f32) {
    if state.is_over() {
        return;
    }

    state.timer = (state.timer - dt).max(0.0);

    player_update(state, input, dt);

    state.player.apply_gravity(GRAVITY, FLOOR_Y, dt);
    state.opponent.apply_gravity(GRAVITY, FLOOR_Y, dt);

    if state.policy == OpponentPolicy::Reactive {
        ai_update(&mut state.opponent, &state.player, &mut state.rng, dt);
    }

    state.player.tick_state(dt);
    state.opponent.tick_state(dt);

    advance_shockwaves(&mut state.shockwaves, dt);
    state.particles.advance(dt);
    state.particles.trim_oldest(state.particle_cap);

    for fighter in [&mut state.player, &mut state.opponent] {
        fighter.pos.x = fighter.pos.x.clamp(ARENA_LEFT, ARENA_RIGHT);
    }

    let outcome = if state.opponent.is_knocked_out() {
        Some(Outcome::KnockOut)
    } else if state.player.is_knocked_out() {
        Some(Outcome::Defeated)
    } else if state.timer <= 0.0 {
        Some(Outcome::TimeUp)
    } else {
        None
    };

    if let Some(outcome) = outcome {
        let score = final_score_for(
            outcome,
            state.player.health(),
            state.opponent.health(),
            state.timer,
        );
        state.phase = MatchPhase::Over(outcome);
        state.final_score = Some(score);
        log::info!(
            "Street Brawl over: {:?}, score {} ({} {} hp vs {} {} hp, {:.1}s left)",
            outcome,
            score,
            state.player.archetype.name(),
            state.player.health(),
            state.opponent.archetype.name(),
            state.opponent.health(),
            state.timer
        );
    }
}

fn player_update(state: &mut BrawlState, input: &BrawlInput, dt: f32) {
    let player = &mut state.player;
    if !player.can_act() {
        return;
    }

    let move_x = input.move_x.clamp(-1.0, 1.0);
    if move_x != 0.0 {
        player.pos.x += move_x * WALK_SPEED * dt;
        player.facing = move_x.signum();
        if matches!(player.state, FighterState::Idle | FighterState::Walk) {
            player.state = FighterState::Walk;
        }
    } else if player.state == FighterState::Walk {
        player.state = FighterState::Idle;
    }

    if input.jump && player.grounded {
        player.launch(JUMP_VELOCITY);
    }

    if input.attack && player.can_attack() {
        player.enter(FighterState::Attack, BASIC_ATTACK.duration);
        let landed = try_hit(
            &state.player,
            &mut state.opponent,
            &BASIC_ATTACK,
            &mut state.particles,
            &mut state.rng,
        );
        if landed {
            state.player.gain_meter(METER_PER_HIT);
        }
    }

    let player = &mut state.player;
    if input.super_attack && player.can_super() && player.consume_meter() {
        player.enter(FighterState::Super, SUPER_ATTACK.duration);
        let origin = Vec2::new(player.pos.x + player.facing * 40.0, player.pos.y - 60.0);
        state.shockwaves.push(Shockwave::new(origin));
        state.particles.burst(&mut state.rng, origin, &SUPER_BURST);
        try_hit(
            &state.player,
            &mut state.opponent,
            &SUPER_ATTACK,
            &mut state.particles,
            &mut state.rng,
        );
    }
}

/// Resolve an attack's hitbox against the defender's body.
///
/// Returns true if it landed.
pub fn try_hit<R: Rng>(
    attacker: &Fighter,
    defender: &mut Fighter,
    attack: &Attack,
    particles: &mut ParticleSet,
    rng: &mut R,
) -> bool {
    let hitbox = attacker.hitbox(attack.reach, attack.size);
    if !hitbox.overlaps(&defender.body()) {
        return false;
    }

    defender.take_damage(attack.damage);
    defender.enter(FighterState::Hit, HIT_STUN);
    defender.launch(HIT_POP_VELOCITY);
    defender.pos.x += attacker.facing * attack.impulse * KNOCKBACK_SCALE;

    // Shaving-foam splash
    let center = hitbox.center();
    for _ in 0..FOAM_PARTICLES {
        let vel = Vec2::new(rng.random_range(-80.0..80.0), rng.random_range(-180.0..-20.0));
        particles.spawn(Particle::new(center, vel, 0.4, 3.0, palette::WHITE).with_gravity(200.0));
    }
    true
}

/// Reactive AI: back off when crowded, occasionally dodge or hop away.
/// No memory, no look-ahead.
pub fn ai_update<R: Rng>(me: &mut Fighter, target: &Fighter, rng: &mut R, dt: f32) {
    if !me.can_act() {
        return;
    }

    let dist = target.pos.x - me.pos.x;
    me.facing = if dist > 0.0 { 1.0 } else { -1.0 };

    if dist.abs() < AI_KEEP_DISTANCE {
        me.pos.x -= me.facing * AI_RETREAT_SPEED * dt;
        if matches!(me.state, FighterState::Idle | FighterState::Walk) {
            me.state = FighterState::Walk;
        }
        if me.state != FighterState::Dodge && rng.random_bool(AI_DODGE_CHANCE) {
            me.enter(FighterState::Dodge, AI_DODGE_TIME);
            me.pos.x -= me.facing * AI_RETREAT_SPEED * dt * AI_DODGE_STEPS;
        }
    } else if me.state == FighterState::Walk {
        me.state = FighterState::Idle;
    }

    if me.grounded && rng.random_bool(AI_HOP_CHANCE) {
        me.launch(AI_HOP_VELOCITY);
        me.pos.x -= me.facing * AI_HOP_DISTANCE;
    }
}
