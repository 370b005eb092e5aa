//! Simulation context: the process-wide state the entities read and write
//!
//! Owned by the game driver and passed into every world update. Writers:
//! - `input`: the host, through [`SimContext::key_event`]
//! - `score`: ball goal handling only
//! - clock: [`SimContext::advance`], called by the world once per tick

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::input::{InputState, Key};

/// Goal counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player1: u32,
    pub player2: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_player1(&mut self) {
        self.player1 += 1;
    }

    pub fn increment_player2(&mut self) {
        self.player2 += 1;
    }

    pub fn total(&self) -> u32 {
        self.player1 + self.player2
    }
}

/// Playfield dimensions (the canvas size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether `x` lies in the left half
    #[inline]
    pub fn is_left_half(&self, x: f32) -> bool {
        x < self.width / 2.0
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(800.0, 480.0)
    }
}

/// Shared state for one running match
#[derive(Debug, Clone)]
pub struct SimContext {
    pub input: InputState,
    pub score: Score,
    pub arena: Arena,
    /// Debug overlay visibility
    pub show_fps: bool,
    /// Ball that leaves through the left goal is served by this paddle
    pub player1: Option<EntityId>,
    /// Ball that leaves through the right goal is served by this paddle
    pub player2: Option<EntityId>,
    now_ms: f64,
    rng: Pcg32,
}

impl SimContext {
    pub fn new(arena: Arena, seed: u64) -> Self {
        Self {
            input: InputState::new(),
            score: Score::new(),
            arena,
            show_fps: false,
            player1: None,
            player2: None,
            now_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Simulation time in milliseconds
    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Move the clock forward by one tick
    pub fn advance(&mut self, dt_ms: f32) {
        self.now_ms += f64::from(dt_ms.max(0.0));
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Host key event. Pressing the toggle key flips the FPS overlay.
    pub fn key_event(&mut self, key: Key, pressed: bool) {
        if key == Key::T {
            if pressed {
                self.show_fps = !self.show_fps;
                log::debug!("FPS overlay: {}", self.show_fps);
            }
            return;
        }
        self.input.set(key, pressed);
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new(Arena::default(), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_increments() {
        let mut score = Score::new();
        score.increment_player1();
        score.increment_player2();
        score.increment_player2();
        assert_eq!(score.player1, 1);
        assert_eq!(score.player2, 2);
        assert_eq!(score.total(), 3);
    }

    #[test]
    fn test_clock_advances() {
        let mut ctx = SimContext::default();
        ctx.advance(16.0);
        ctx.advance(4.0);
        assert!((ctx.now_ms() - 20.0).abs() < 1e-9);
        ctx.advance(-5.0);
        assert!((ctx.now_ms() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_key_flips_overlay() {
        let mut ctx = SimContext::default();
        ctx.key_event(Key::T, true);
        assert!(ctx.show_fps);
        ctx.key_event(Key::T, false);
        assert!(ctx.show_fps);
        ctx.key_event(Key::T, true);
        assert!(!ctx.show_fps);

        ctx.key_event(Key::Space, true);
        assert!(ctx.input.space);
    }

    #[test]
    fn test_arena_halves() {
        let arena = Arena::new(800.0, 480.0);
        assert!(arena.is_left_half(20.0));
        assert!(!arena.is_left_half(764.0));
    }
}
