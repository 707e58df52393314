//! Semantic input for one frame
//!
//! Key bindings belong to the windowing layer; the game only sees these
//! actions, held state and typed text.

use glam::Vec2;

/// Discrete actions that fire once when pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    /// Cut / punch
    Primary,
    /// Super (only does anything with a full meter)
    Secondary,
    Confirm,
    Cancel,
    Backspace,
}

/// Everything the player did this frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Held directional input, each axis in -1..1 (y grows downward)
    pub axis: Vec2,
    /// Pointer position in screen space, if there is a pointer
    pub pointer: Option<Vec2>,
    /// Primary action held
    pub primary: bool,
    /// Secondary action held
    pub secondary: bool,
    /// Actions pressed this frame, in order
    pub pressed: Vec<Action>,
    /// Text typed this frame
    pub text: String,
}

impl FrameInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_axis(mut self, x: f32, y: f32) -> Self {
        self.axis = Vec2::new(x, y).clamp(Vec2::splat(-1.0), Vec2::splat(1.0));
        self
    }

    pub fn with_pointer(mut self, pos: Vec2) -> Self {
        self.pointer = Some(pos);
        self
    }

    pub fn holding_primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn holding_secondary(mut self) -> Self {
        self.secondary = true;
        self
    }

    pub fn press(mut self, action: Action) -> Self {
        self.pressed.push(action);
        self
    }

    pub fn typed(mut self, text: &str) -> Self {
        self.text.push_str(text);
        self
    }

    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Anything at all was pressed or typed this frame
    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty() || !self.text.is_empty()
    }
}
