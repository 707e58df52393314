//! Street Brawl fighter entity and its action state machine

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// Starting (and maximum) health
pub const MAX_HEALTH: i32 = 100;
/// Super meter capacity
pub const MAX_METER: f32 = 100.0;

/// Body box size, anchored at the feet
pub const BODY_WIDTH: f32 = 80.0;
pub const BODY_HEIGHT: f32 = 110.0;

/// Discrete action state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FighterState {
    #[default]
    Idle,
    Walk,
    Attack,
    Super,
    Dodge,
    /// Hit-stun: can't act until the timer runs out
    Hit,
}

impl FighterState {
    /// States that end on their own when the state timer expires
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            FighterState::Attack | FighterState::Super | FighterState::Hit | FighterState::Dodge
        )
    }
}

/// Character archetype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Heavy barber, player side
    Tank,
    /// Nimble clipper technician, AI side
    Technician,
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Tank => "Tank",
            Archetype::Technician => "Technicus",
        }
    }
}

/// A fighter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fighter {
    pub archetype: Archetype,
    /// Feet position (x center, y at the feet)
    pub pos: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    health: i32,
    meter: f32,
    pub state: FighterState,
    pub state_timer: f32,
}

impl Fighter {
    pub fn new(archetype: Archetype, pos: Vec2, facing: f32) -> Self {
        Self {
            archetype,
            pos,
            vel_y: 0.0,
            grounded: true,
            facing: facing.signum(),
            health: MAX_HEALTH,
            meter: 0.0,
            state: FighterState::Idle,
            state_timer: 0.0,
        }
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn meter(&self) -> f32 {
        self.meter
    }

    pub fn is_knocked_out(&self) -> bool {
        self.health == 0
    }

    pub fn meter_full(&self) -> bool {
        self.meter >= MAX_METER
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health = (self.health - amount.max(0)).clamp(0, MAX_HEALTH);
    }

    pub fn gain_meter(&mut self, amount: f32) {
        self.meter = (self.meter + amount).clamp(0.0, MAX_METER);
    }

    /// Spend the whole meter; returns false if it wasn't full
    pub fn consume_meter(&mut self) -> bool {
        if !self.meter_full() {
            return false;
        }
        self.meter = 0.0;
        true
    }

    /// Body hurtbox
    pub fn body(&self) -> Rect {
        Rect::new(
            self.pos.x - BODY_WIDTH / 2.0,
            self.pos.y - BODY_HEIGHT,
            BODY_WIDTH,
            BODY_HEIGHT,
        )
    }

    /// Hitbox of `size` starting `reach` pixels in front of the body center,
    /// 10 pixels below the top of the head
    pub fn hitbox(&self, reach: f32, size: Vec2) -> Rect {
        let body = self.body();
        let cx = body.center().x;
        let x = if self.facing > 0.0 {
            cx + reach
        } else {
            cx - reach - size.x
        };
        Rect::new(x, body.top() + 10.0, size.x, size.y)
    }

    /// Whether the fighter may start a basic attack
    pub fn can_attack(&self) -> bool {
        !matches!(
            self.state,
            FighterState::Attack | FighterState::Super | FighterState::Hit
        )
    }

    /// Whether the fighter may start a super
    pub fn can_super(&self) -> bool {
        self.meter_full() && self.can_attack()
    }

    /// Hit-stunned fighters ignore movement and actions
    pub fn can_act(&self) -> bool {
        self.state != FighterState::Hit
    }

    pub fn enter(&mut self, state: FighterState, timer: f32) {
        self.state = state;
        self.state_timer = timer;
    }

    /// Leave the ground with the given (negative = upward) velocity
    pub fn launch(&mut self, vel_y: f32) {
        self.vel_y = vel_y;
        self.grounded = false;
    }

    /// Gravity and landing
    pub fn apply_gravity(&mut self, gravity: f32, floor_y: f32, dt: f32) {
        if self.grounded {
            return;
        }
        self.vel_y += gravity * dt;
        self.pos.y += self.vel_y * dt;
        if self.pos.y >= floor_y {
            self.pos.y = floor_y;
            self.vel_y = 0.0;
            self.grounded = true;
        }
    }

    /// Count down the state timer, reverting timed states to idle
    pub fn tick_state(&mut self, dt: f32) {
        if self.state_timer > 0.0 {
            self.state_timer -= dt;
            if self.state_timer <= 0.0 {
                self.state_timer = 0.0;
                if self.state.is_timed() {
                    self.state = FighterState::Idle;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> Fighter {
        Fighter::new(Archetype::Tank, Vec2::new(400.0, 540.0), 1.0)
    }

    #[test]
    fn test_health_clamps() {
        let mut f = tank();
        f.take_damage(30);
        assert_eq!(f.health(), 70);
        f.take_damage(500);
        assert_eq!(f.health(), 0);
        assert!(f.is_knocked_out());
        f.take_damage(-20);
        assert_eq!(f.health(), 0);
    }

    #[test]
    fn test_meter_clamps_and_consumes() {
        let mut f = tank();
        assert!(!f.consume_meter());
        f.gain_meter(250.0);
        assert_eq!(f.meter(), MAX_METER);
        assert!(f.can_super());
        assert!(f.consume_meter());
        assert_eq!(f.meter(), 0.0);
        f.gain_meter(-5.0);
        assert_eq!(f.meter(), 0.0);
    }

    #[test]
    fn test_body_anchored_at_feet() {
        let f = tank();
        let body = f.body();
        assert_eq!(body.bottom(), 540.0);
        assert_eq!(body.left(), 360.0);
        assert_eq!(body.right(), 440.0);
    }

    #[test]
    fn test_hitbox_follows_facing() {
        let mut f = tank();
        let right = f.hitbox(20.0, Vec2::new(60.0, 60.0));
        assert_eq!(right.left(), 420.0);
        assert_eq!(right.top(), 540.0 - 110.0 + 10.0);

        f.facing = -1.0;
        let left = f.hitbox(20.0, Vec2::new(60.0, 60.0));
        assert_eq!(left.right(), 380.0);
    }

    #[test]
    fn test_busy_states_block_attacks() {
        let mut f = tank();
        f.gain_meter(MAX_METER);
        for state in [FighterState::Attack, FighterState::Super, FighterState::Hit] {
            f.enter(state, 0.5);
            assert!(!f.can_attack());
            assert!(!f.can_super());
        }
        f.enter(FighterState::Dodge, 0.2);
        assert!(f.can_attack());
    }

    #[test]
    fn test_gravity_lands_on_floor() {
        let mut f = tank();
        f.launch(-320.0);
        for _ in 0..120 {
            f.apply_gravity(800.0, 540.0, 1.0 / 60.0);
        }
        assert!(f.grounded);
        assert_eq!(f.pos.y, 540.0);
        assert_eq!(f.vel_y, 0.0);
    }

    #[test]
    fn test_timed_state_reverts_to_idle() {
        let mut f = tank();
        f.enter(FighterState::Attack, 0.25);
        f.tick_state(0.1);
        assert_eq!(f.state, FighterState::Attack);
        f.tick_state(0.2);
        assert_eq!(f.state, FighterState::Idle);
    }
}
