//! Bricked Up - Breakout-style arcade simulation core
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (swept collisions, entity pools, game state)
//! - `tuning`: Gameplay balance parameters
//! - `settings`: Driver/presentation preferences
//!
//! Windowing, drawing, audio and input polling live outside this crate. The
//! core consumes [`sim::TickInput`] and [`sim::FrameTime`] and hands back a
//! [`sim::RenderSnapshot`] plus screen changes.

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Reference frame length in milliseconds; velocities are pixels per reference frame
    pub const FRAME_MS: f32 = 16.0;
    /// Maximum ticks the driver runs per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Contact resolutions allowed per ball per tick
    pub const MAX_CONTACTS_PER_TICK: usize = 16;
    /// Collision times closer than this are simultaneous
    pub const TIE_EPSILON: f32 = 1e-5;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// Thickness of the static wall boxes surrounding the field
    pub const WALL_THICKNESS: f32 = 50.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    /// Gap between the paddle and the bottom edge
    pub const PADDLE_BOTTOM_GAP: f32 = 10.0;
    /// Width change per size level
    pub const PADDLE_WIDTH_STEP: f32 = 20.0;
    pub const PADDLE_MIN_LEVEL: i8 = -3;
    pub const PADDLE_MAX_LEVEL: i8 = 3;
    /// Target paddle speed while a direction is held (pixels/frame)
    pub const PADDLE_SPEED: f32 = 6.0;
    /// Fraction of the gap to target velocity closed per reference frame
    pub const PADDLE_ACCEL: f32 = 0.35;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 15.0;
    pub const BALL_LAUNCH_SPEED: f32 = 5.0;
    /// Minimum |vy| enforced every tick
    pub const BALL_MIN_VERTICAL_SPEED: f32 = 1.0;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.025;
    /// Ignore repeat paddle contacts for this long (ms)
    pub const PADDLE_COOLDOWN_MS: u64 = 200;

    /// Brick grid
    pub const BRICK_ROWS: usize = 5;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_WIDTH: f32 = 60.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_GAP: f32 = 10.0;
    pub const BRICK_OFFSET: f32 = 35.0;
    /// Destruction animation cadence (ms per frame)
    pub const BRICK_FRAME_MS: f32 = 40.0;
    /// Animation frame at which the brick disappears
    pub const BRICK_TERMINAL_FRAME: u8 = 6;

    /// Pool capacities
    pub const MAX_BALLS: usize = 5;
    pub const MAX_POWERUPS: usize = 10;
    pub const MAX_PARTICLES: usize = 200;

    /// Power-up defaults
    pub const POWERUP_WIDTH: f32 = 20.0;
    pub const POWERUP_HEIGHT: f32 = 12.0;
    pub const POWERUP_FALL_SPEED: f32 = 2.0;
    /// Same-kind spawns closer together than this are suppressed (ms)
    pub const POWERUP_COOLDOWN_MS: u64 = 1000;
    pub const STICKY_DURATION_MS: f32 = 10_000.0;

    /// Lives
    pub const INITIAL_LIVES: u8 = 3;
    pub const MAX_LIVES: u8 = 9;

    /// Debug game speed bounds
    pub const MIN_GAME_SPEED: f32 = 0.125;
    pub const MAX_GAME_SPEED: f32 = 8.0;
}

/// Number of reference frames covered by `elapsed_ms` at the given game speed
#[inline]
pub fn frames_from_ms(elapsed_ms: f32, game_speed: f32) -> f32 {
    (elapsed_ms / consts::FRAME_MS) * game_speed
}
