//! Gameplay balance parameters
//!
//! Defaults come from [`crate::consts`]. Tuning is configured in code; the
//! core never reads it from disk.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Reasons a [`Tuning`] is rejected
#[derive(Debug, Clone, PartialEq)]
pub enum TuningError {
    /// A speed or multiplier is zero, negative, NaN or infinite
    NotPositive { field: &'static str, value: f32 },
    /// Paddle acceleration must lie in (0, 1]
    AccelOutOfRange(f32),
    /// The speed cap would slow the ball below its launch speed
    CapBelowLaunch { cap: f32, launch: f32 },
    /// A game must start with at least one life, and no more than the maximum
    InitialLives(u8),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TuningError::NotPositive { field, value } => {
                write!(f, "{field} must be finite and positive, got {value}")
            }
            TuningError::AccelOutOfRange(accel) => {
                write!(f, "paddle_accel must be in (0, 1], got {accel}")
            }
            TuningError::CapBelowLaunch { cap, launch } => {
                write!(f, "max_ball_speed {cap} is below launch speed {launch}")
            }
            TuningError::InitialLives(lives) => {
                write!(f, "initial_lives must be in 1..={MAX_LIVES}, got {lives}")
            }
        }
    }
}

impl std::error::Error for TuningError {}

/// Balance knobs for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Ball launch speed (pixels/frame)
    pub launch_speed: f32,
    /// Speed multiplier per paddle bounce
    pub paddle_bounce_multiplier: f32,
    /// Optional ball speed ceiling; `None` lets speed grow every bounce
    pub max_ball_speed: Option<f32>,
    /// Target paddle speed (pixels/frame)
    pub paddle_speed: f32,
    /// Exponential approach factor per reference frame
    pub paddle_accel: f32,
    /// Power-up fall speed (pixels/frame)
    pub powerup_fall_speed: f32,
    /// Sticky paddle duration (real ms)
    pub sticky_duration_ms: f32,
    /// Per-ball paddle contact cooldown (ms)
    pub paddle_cooldown_ms: u64,
    /// Per-kind power-up spawn cooldown (ms)
    pub powerup_cooldown_ms: u64,
    pub initial_lives: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            launch_speed: BALL_LAUNCH_SPEED,
            paddle_bounce_multiplier: PADDLE_BOOST,
            max_ball_speed: None,
            paddle_speed: PADDLE_SPEED,
            paddle_accel: PADDLE_ACCEL,
            powerup_fall_speed: POWERUP_FALL_SPEED,
            sticky_duration_ms: STICKY_DURATION_MS,
            paddle_cooldown_ms: PADDLE_COOLDOWN_MS,
            powerup_cooldown_ms: POWERUP_COOLDOWN_MS,
            initial_lives: INITIAL_LIVES,
        }
    }
}

impl Tuning {
    /// Cap ball speed growth at `cap` pixels/frame
    pub fn with_speed_cap(mut self, cap: f32) -> Self {
        self.max_ball_speed = Some(cap);
        self
    }

    /// Check every field, returning the first problem found
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("launch_speed", self.launch_speed),
            ("paddle_bounce_multiplier", self.paddle_bounce_multiplier),
            ("paddle_speed", self.paddle_speed),
            ("powerup_fall_speed", self.powerup_fall_speed),
            ("sticky_duration_ms", self.sticky_duration_ms),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        if !(self.paddle_accel > 0.0 && self.paddle_accel <= 1.0) {
            return Err(TuningError::AccelOutOfRange(self.paddle_accel));
        }

        if let Some(cap) = self.max_ball_speed {
            if !cap.is_finite() || cap <= 0.0 {
                return Err(TuningError::NotPositive {
                    field: "max_ball_speed",
                    value: cap,
                });
            }
            if cap < self.launch_speed {
                return Err(TuningError::CapBelowLaunch {
                    cap,
                    launch: self.launch_speed,
                });
            }
        }

        if self.initial_lives == 0 || self.initial_lives > MAX_LIVES {
            return Err(TuningError::InitialLives(self.initial_lives));
        }

        Ok(())
    }

    /// Apply the bounce multiplier and optional cap to a speed
    #[inline]
    pub fn bounced_speed(&self, speed: f32) -> f32 {
        let boosted = speed * self.paddle_bounce_multiplier;
        match self.max_ball_speed {
            Some(cap) => boosted.min(cap),
            None => boosted,
        }
    }
}
