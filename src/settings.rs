//! Driver settings and preferences
//!
//! Nothing here changes the rules of the game; these control how a driver
//! runs the core. The headless binary reads them from `BRICKED_UP_*`
//! environment variables.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_GAME_SPEED, MIN_GAME_SPEED};
use crate::sim::GameState;

/// Driver settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // === Visual Effects ===
    /// Particle effects (sticky paddle spray)
    pub particles: bool,
    /// Start with the collision overlay on
    pub collision_overlay: bool,

    // === Timing ===
    /// Starting debug game speed
    pub game_speed: f32,
    /// Display refresh rate the driver paces frames at
    pub display_hz: f32,

    // === Headless run ===
    /// Frames to run before printing the final snapshot
    pub frames: u32,
    /// Seed for power-up rolls
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            collision_overlay: false,
            game_speed: 1.0,
            display_hz: 60.0,
            frames: 3_600,
            seed: 0x5EED,
        }
    }
}

impl Settings {
    const PREFIX: &'static str = "BRICKED_UP_";

    /// Read settings from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from a key lookup; unset keys keep their defaults and
    /// unparsable ones are logged and ignored
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut settings = Self::default();
        let read = |name: &str| lookup(&format!("{}{}", Self::PREFIX, name));

        if let Some(v) = read("PARTICLES") {
            parse_into(&mut settings.particles, "PARTICLES", &v, parse_flag);
        }
        if let Some(v) = read("OVERLAY") {
            parse_into(&mut settings.collision_overlay, "OVERLAY", &v, parse_flag);
        }
        if let Some(v) = read("SPEED") {
            parse_into(&mut settings.game_speed, "SPEED", &v, |s| s.parse().ok());
        }
        if let Some(v) = read("DISPLAY_HZ") {
            parse_into(&mut settings.display_hz, "DISPLAY_HZ", &v, |s| {
                s.parse().ok().filter(|hz: &f32| *hz > 0.0)
            });
        }
        if let Some(v) = read("FRAMES") {
            parse_into(&mut settings.frames, "FRAMES", &v, |s| s.parse().ok());
        }
        if let Some(v) = read("SEED") {
            parse_into(&mut settings.seed, "SEED", &v, |s| s.parse().ok());
        }

        settings.game_speed = settings.game_speed.clamp(MIN_GAME_SPEED, MAX_GAME_SPEED);
        settings
    }

    /// Milliseconds between driver frames
    pub fn frame_interval_ms(&self) -> f32 {
        1000.0 / self.display_hz
    }

    /// Copy the presentation flags into a game state
    pub fn apply(&self, state: &mut GameState) {
        state.particles_enabled = self.particles;
        state.show_collision_overlay = self.collision_overlay;
        state.game_speed = self.game_speed;
        if !self.particles {
            state.particles.clear();
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

fn parse_into<T>(slot: &mut T, name: &str, value: &str, parse: impl Fn(&str) -> Option<T>) {
    match parse(value.trim()) {
        Some(parsed) => *slot = parsed,
        None => log::warn!("Ignoring {}{}={:?}", Settings::PREFIX, name, value),
    }
}
