//! Transient visual effects: sparks, shaving-foam bursts, shockwaves
//!
//! Particles never affect gameplay. Each mini-game owns its own `ParticleSet`;
//! nothing here is shared between scenes.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::palette::Color;

/// Velocity retained per reference frame (60 Hz)
pub const PARTICLE_DRAG: f32 = 0.98;
const DRAG_REFERENCE_FPS: f32 = 60.0;

/// Shockwave expansion speed (pixels/s)
pub const SHOCKWAVE_GROWTH: f32 = 600.0;

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Total lifetime in seconds
    pub lifetime: f32,
    /// Seconds since spawn, never decreases
    pub elapsed: f32,
    pub radius: f32,
    pub color: Color,
    /// Downward acceleration (pixels/s², screen y grows downward)
    pub gravity: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, lifetime: f32, radius: f32, color: Color) -> Self {
        Self {
            pos,
            vel,
            lifetime,
            elapsed: 0.0,
            radius,
            color,
            gravity: 0.0,
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.elapsed < self.lifetime
    }

    /// Seconds left before expiry
    pub fn remaining(&self) -> f32 {
        (self.lifetime - self.elapsed).max(0.0)
    }

    /// Opacity for drawing: fades over the final second
    pub fn alpha(&self) -> f32 {
        self.remaining().clamp(0.0, 1.0)
    }

    fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        self.vel.y += self.gravity * dt;
        self.vel *= PARTICLE_DRAG.powf(dt * DRAG_REFERENCE_FPS);
        self.pos += self.vel * dt;
    }
}

/// The particles owned by one mini-game
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    particles: Vec<Particle>,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Advance every particle by `dt` and drop the ones whose lifetime has elapsed
    pub fn advance(&mut self, dt: f32) {
        for particle in self.particles.iter_mut() {
            particle.advance(dt);
        }
        self.particles.retain(Particle::is_alive);
    }

    /// Soft cap: remove oldest particles until at most `cap` remain
    pub fn trim_oldest(&mut self, cap: usize) {
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spray particles in random directions from `origin`
    pub fn burst<R: Rng>(&mut self, rng: &mut R, origin: Vec2, burst: &Burst) {
        for _ in 0..burst.count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let speed = lerp_range(burst.speed, rng.random());
            let lifetime = lerp_range(burst.life, rng.random());
            let radius = lerp_range(burst.radius, rng.random());
            let color = if rng.random_bool(burst.primary_chance) {
                burst.primary
            } else {
                burst.secondary
            };
            let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
            self.spawn(Particle::new(origin, vel, lifetime, radius, color).with_gravity(burst.gravity));
        }
    }
}

/// Shape of a radial particle burst. Ranges are (min, max).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Burst {
    pub count: usize,
    pub speed: (f32, f32),
    pub life: (f32, f32),
    pub radius: (f32, f32),
    pub primary: Color,
    pub secondary: Color,
    /// Chance each particle uses `primary`
    pub primary_chance: f64,
    pub gravity: f32,
}

#[inline]
fn lerp_range((lo, hi): (f32, f32), t: f32) -> f32 {
    lo + (hi - lo) * t
}

/// An expanding ring left by a super attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shockwave {
    pub pos: Vec2,
    pub radius: f32,
    /// Seconds left
    pub life: f32,
}

impl Shockwave {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            radius: 10.0,
            life: 0.5,
        }
    }
}

/// Grow and age shockwaves, dropping the expired ones
pub fn advance_shockwaves(waves: &mut Vec<Shockwave>, dt: f32) {
    for wave in waves.iter_mut() {
        wave.radius += SHOCKWAVE_GROWTH * dt;
        wave.life -= dt;
    }
    waves.retain(|w| w.life > 0.0);
}
