//! Rebound Pong - a two-paddle arcade simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, entities, collisions, controllers)
//! - `renderer`: Render-facing frame description (shapes, score, FPS overlay)
//! - `fps`: Frame rate instrumentation
//! - `settings`: Host configuration (arena size, seed, opponent)

pub mod fps;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{Opponent, Settings};
pub use sim::{Game, SimContext, World};

/// Game configuration constants
pub mod consts {
    /// Launch speed of a served ball (units/s)
    pub const BALL_SPEED: f32 = 800.0;
    /// Above this speed a paddle rebound no longer speeds the ball up
    pub const BALL_MAX_SPEED: f32 = 2400.0;
    /// Balls in play once the spawner has finished
    pub const MAX_BALL_COUNT: usize = 3;
    /// Vertical paddle speed while a move key is held (units/s)
    pub const PADDLE_SPEED: f32 = 550.0;
    /// Horizontal kick a paddle takes from a side hit (units/s)
    pub const PADDLE_BOUNCE_SPEED: f32 = 100.0;
    /// Ball x-velocity gain per paddle side hit
    pub const REBOUND_MULTIPLIER: f32 = 1.05;

    /// Paddle box
    pub const PADDLE_WIDTH: f32 = 16.0;
    pub const PADDLE_HEIGHT: f32 = 90.0;
    /// Ball box (rendered as a circle of radius `BALL_SIZE`)
    pub const BALL_SIZE: f32 = 8.0;

    /// Paddle spring: `vx += PADDLE_SPRING * dt_ms * displacement²`
    pub const PADDLE_SPRING: f32 = 0.001;
    /// Per-tick horizontal damping factor
    pub const PADDLE_DAMPING: f32 = 0.8;
    /// Snap to rest when closer than this...
    pub const PADDLE_SNAP_DISTANCE: f32 = 2.0;
    /// ...and slower than this
    pub const PADDLE_SNAP_SPEED: f32 = 1.0;

    /// Gap between a waiting ball and its owning paddle
    pub const BALL_ALIGN_GAP: f32 = 20.0;
    /// Half-width of the random launch cone (30 degrees)
    pub const LAUNCH_SPREAD: f32 = std::f32::consts::FRAC_PI_6;

    /// Delay before a scored ball returns to its new owner (ms)
    pub const SCORE_RESET_DELAY_MS: f64 = 200.0;
    /// Pause before the computer serves (ms)
    pub const AI_LAUNCH_DELAY_MS: f64 = 300.0;
    /// Vertical tolerance before the computer paddle moves
    pub const AI_DEAD_ZONE: f32 = 20.0;

    /// Interval between extra ball spawns (ms)
    pub const BALL_SPAWN_INTERVAL_MS: f64 = 30_000.0;

    /// Sweep attempts per axis per tick before giving up
    pub const MAX_SWEEP_STEPS: u32 = 1024;
    /// Longest tick the game driver will simulate in one go (ms)
    pub const MAX_TICK_MS: f32 = 100.0;
}
