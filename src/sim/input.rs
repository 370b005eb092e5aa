//! Held-key snapshot read by the human controllers

use serde::{Deserialize, Serialize};

/// Logical keys the host reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    W,
    A,
    S,
    D,
    Shift,
    Space,
    /// Debug overlay toggle
    T,
}

/// Which logical keys are currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub w: bool,
    pub a: bool,
    pub s: bool,
    pub d: bool,
    pub shift: bool,
    pub space: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, key: Key) -> Option<&mut bool> {
        match key {
            Key::Left => Some(&mut self.left),
            Key::Right => Some(&mut self.right),
            Key::Up => Some(&mut self.up),
            Key::Down => Some(&mut self.down),
            Key::W => Some(&mut self.w),
            Key::A => Some(&mut self.a),
            Key::S => Some(&mut self.s),
            Key::D => Some(&mut self.d),
            Key::Shift => Some(&mut self.shift),
            Key::Space => Some(&mut self.space),
            Key::T => None,
        }
    }

    /// Record a key as held or released. The toggle key is not tracked.
    pub fn set(&mut self, key: Key, held: bool) {
        if let Some(slot) = self.slot(key) {
            *slot = held;
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        match key {
            Key::Left => self.left,
            Key::Right => self.right,
            Key::Up => self.up,
            Key::Down => self.down,
            Key::W => self.w,
            Key::A => self.a,
            Key::S => self.s,
            Key::D => self.d,
            Key::Shift => self.shift,
            Key::Space => self.space,
            Key::T => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_release() {
        let mut input = InputState::new();
        input.set(Key::Up, true);
        input.set(Key::Shift, true);
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Shift));
        assert!(!input.is_held(Key::Down));

        input.set(Key::Up, false);
        input.set(Key::Shift, false);
        assert!(!input.is_held(Key::Up));
        assert_eq!(input, InputState::default());
    }

    #[test]
    fn test_toggle_key_not_held() {
        let mut input = InputState::new();
        input.set(Key::T, true);
        assert!(!input.is_held(Key::T));
        assert_eq!(input, InputState::default());
    }
}
