//! Power-ups: falling pickups released by breaking bricks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::rotate_deg;
use super::pool::Slot;
use super::rect::Rect;
use super::rng::PercentRoll;
use super::state::{Ball, GameEvent, GameState, Screen};
use crate::consts::*;

/// Rotation applied to a vertical ball when it is split
const SPLIT_ROTATION_DEG: f32 = 20.0;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerUpKind {
    #[default]
    ExtraLife,
    RemoveLife,
    WidenPaddle,
    NarrowPaddle,
    SplitBall,
    StickyPaddle,
}

impl PowerUpKind {
    pub const COUNT: usize = 6;
    pub const ALL: [PowerUpKind; Self::COUNT] = [
        PowerUpKind::ExtraLife,
        PowerUpKind::RemoveLife,
        PowerUpKind::WidenPaddle,
        PowerUpKind::NarrowPaddle,
        PowerUpKind::SplitBall,
        PowerUpKind::StickyPaddle,
    ];

    /// Stable index for per-kind tables
    pub fn index(self) -> usize {
        match self {
            PowerUpKind::ExtraLife => 0,
            PowerUpKind::RemoveLife => 1,
            PowerUpKind::WidenPaddle => 2,
            PowerUpKind::NarrowPaddle => 3,
            PowerUpKind::SplitBall => 4,
            PowerUpKind::StickyPaddle => 5,
        }
    }

    /// Map a percent roll in [0, 100) to a drop; 70% of rolls drop nothing
    pub fn from_roll(roll: u32) -> Option<Self> {
        match roll {
            0..70 => None,
            70..75 => Some(PowerUpKind::ExtraLife),
            75..79 => Some(PowerUpKind::RemoveLife),
            79..86 => Some(PowerUpKind::WidenPaddle),
            86..91 => Some(PowerUpKind::NarrowPaddle),
            91..96 => Some(PowerUpKind::SplitBall),
            96..100 => Some(PowerUpKind::StickyPaddle),
            _ => None,
        }
    }
}

/// A falling power-up
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerUp {
    pub rect: Rect,
    pub active: bool,
    pub kind: PowerUpKind,
}

impl Slot for PowerUp {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, center: Vec2) -> Self {
        Self {
            rect: Rect::from_center(center, Vec2::new(POWERUP_WIDTH, POWERUP_HEIGHT)),
            active: true,
            kind,
        }
    }
}

/// Roll for a drop at `center`, usually a brick that just started breaking
pub fn roll_drop<R: PercentRoll + ?Sized>(state: &mut GameState, rng: &mut R, center: Vec2) {
    if let Some(kind) = PowerUpKind::from_roll(rng.roll_percent()) {
        try_spawn(state, kind, center);
    }
}

/// Spawn a power-up unless its kind is cooling down or the pool is full
pub fn try_spawn(state: &mut GameState, kind: PowerUpKind, center: Vec2) -> bool {
    let now = state.now_ms;
    let cooldown = state.tuning.powerup_cooldown_ms;
    if let Some(last) = state.powerup_spawned_ms[kind.index()] {
        if now.saturating_sub(last) < cooldown {
            return false;
        }
    }
    if state.powerups.allocate(PowerUp::new(kind, center)).is_none() {
        return false;
    }
    state.powerup_spawned_ms[kind.index()] = Some(now);
    state.push_event(GameEvent::PowerUpSpawned(kind));
    log::debug!("Spawned {:?} at ({:.0}, {:.0})", kind, center.x, center.y);
    true
}

/// Move power-ups down; apply the ones the paddle catches
pub fn advance_powerups(state: &mut GameState, frames: f32) {
    let drop = Vec2::new(0.0, state.tuning.powerup_fall_speed * frames);
    let paddle = state.paddle.rect;
    let mut caught = Vec::new();

    for powerup in state.powerups.iter_active_mut() {
        powerup.rect = powerup.rect.translated(drop);
        if powerup.rect.intersects(&paddle) {
            powerup.active = false;
            caught.push(powerup.kind);
        } else if powerup.rect.top() > FIELD_HEIGHT {
            powerup.active = false;
        }
    }

    for kind in caught {
        state.push_event(GameEvent::PowerUpCollected(kind));
        apply(state, kind);
    }
}

/// Apply a power-up's effect
pub fn apply(state: &mut GameState, kind: PowerUpKind) {
    log::debug!("Applying {:?}", kind);
    match kind {
        PowerUpKind::ExtraLife => extra_life(state),
        PowerUpKind::RemoveLife => remove_life(state),
        PowerUpKind::WidenPaddle => resize_paddle(state, 1),
        PowerUpKind::NarrowPaddle => resize_paddle(state, -1),
        PowerUpKind::SplitBall => split_balls(state),
        PowerUpKind::StickyPaddle => sticky_paddle(state),
    }
}

fn extra_life(state: &mut GameState) {
    state.lives = (state.lives + 1).min(MAX_LIVES);
}

fn remove_life(state: &mut GameState) {
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::LifeLost {
        remaining: state.lives,
    });
    if state.lives == 0 && state.screen == Screen::Gameplay {
        log::info!("Game over: last life taken by a power-up");
        state.screen = Screen::GameOver;
        state.push_event(GameEvent::GameOver);
    }
}

fn resize_paddle(state: &mut GameState, delta: i8) {
    if state.paddle.resize(delta) {
        state.sync_stuck_balls();
    }
}

fn split_balls(state: &mut GameState) {
    let clones: Vec<Ball> = state
        .balls
        .iter_active()
        .map(|ball| {
            let vel = if ball.vel.x == 0.0 {
                rotate_deg(ball.vel, SPLIT_ROTATION_DEG)
            } else {
                Vec2::new(-ball.vel.x, ball.vel.y)
            };
            Ball { vel, ..*ball }
        })
        .collect();

    for clone in clones {
        if state.balls.allocate(clone).is_none() {
            break;
        }
    }
}

fn sticky_paddle(state: &mut GameState) {
    state.sticky_remaining_ms = state.tuning.sticky_duration_ms;
}
