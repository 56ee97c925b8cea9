//! Decorative particles
//!
//! Particles never affect gameplay. Spread uses a hash of the clock rather
//! than the drop RNG so turning them off leaves the simulation unchanged.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::pool::{Pool, Slot};
use super::state::GameState;

/// Particles emitted per tick while the paddle is sticky
const STICKY_EMIT_PER_TICK: u32 = 2;
const STICKY_COLOR: [u8; 3] = [120, 255, 160];
const STICKY_LIFE_MS: f32 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub color: [u8; 3],
    /// 1.0 when emitted, fades to 0.0
    pub alpha: f32,
    pub life_ms: f32,
    pub max_life_ms: f32,
}

impl Slot for Particle {
    fn is_active(&self) -> bool {
        self.life_ms > 0.0
    }
}

/// Spray along the top edge of a sticky paddle
pub fn emit_sticky(state: &mut GameState) {
    if state.sticky_remaining_ms <= 0.0 {
        return;
    }
    let paddle = state.paddle.rect;
    let seed = state.now_ms as u32;
    for i in 0..STICKY_EMIT_PER_TICK {
        let hash = seed.wrapping_mul(2654435761).wrapping_add(i * 7919);
        let along = (hash % 1000) as f32 / 1000.0;
        let drift = ((hash >> 10) % 1000) as f32 / 1000.0 - 0.5;
        let rise = ((hash >> 20) % 1000) as f32 / 1000.0;
        let particle = Particle {
            pos: Vec2::new(paddle.left() + along * paddle.width(), paddle.top()),
            vel: Vec2::new(drift, -(0.5 + rise)),
            color: STICKY_COLOR,
            alpha: 1.0,
            life_ms: STICKY_LIFE_MS,
            max_life_ms: STICKY_LIFE_MS,
        };
        // Full pool: drop the rest of this burst
        if state.particles.allocate(particle).is_none() {
            break;
        }
    }
}

/// Integrate, age and fade every live particle
pub fn advance(particles: &mut Pool<Particle>, elapsed_ms: f32, frames: f32) {
    for p in particles.iter_active_mut() {
        p.pos += p.vel * frames;
        p.life_ms = (p.life_ms - elapsed_ms).max(0.0);
        p.alpha = if p.max_life_ms > 0.0 {
            p.life_ms / p.max_life_ms
        } else {
            0.0
        };
    }
}
