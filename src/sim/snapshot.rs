//! Read-only view of the state for renderers

use serde::Serialize;

use super::particles::Particle;
use super::powerup::PowerUpKind;
use super::rect::Rect;
use super::state::{GameState, Screen};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrickView {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub active: bool,
    pub anim_frame: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerUpView {
    pub rect: Rect,
    pub kind: PowerUpKind,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub screen: Screen,
    pub paddle: Rect,
    pub paddle_size_level: i8,
    pub balls: Vec<Rect>,
    /// Full grid, row-major, inactive cells included
    pub bricks: Vec<BrickView>,
    pub powerups: Vec<PowerUpView>,
    pub particles: Vec<Particle>,
    pub lives: u8,
    pub rounds_cleared: u32,
    pub sticky: bool,
    pub paused: bool,
    pub game_speed: f32,
    pub show_collision_overlay: bool,
}

impl GameState {
    pub fn snapshot(&self) -> RenderSnapshot {
        let bricks = self
            .bricks
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                cells.iter().enumerate().map(move |(col, brick)| BrickView {
                    row,
                    col,
                    rect: brick.rect,
                    active: brick.active,
                    anim_frame: brick.anim_frame,
                })
            })
            .collect();

        RenderSnapshot {
            screen: self.screen,
            paddle: self.paddle.rect,
            paddle_size_level: self.paddle.size_level,
            balls: self.balls.iter_active().map(|b| b.rect).collect(),
            bricks,
            powerups: self
                .powerups
                .iter_active()
                .map(|p| PowerUpView {
                    rect: p.rect,
                    kind: p.kind,
                })
                .collect(),
            particles: self.particles.iter_active().copied().collect(),
            lives: self.lives,
            rounds_cleared: self.rounds_cleared,
            sticky: self.sticky_remaining_ms > 0.0,
            paused: self.paused,
            game_speed: self.game_speed,
            show_collision_overlay: self.show_collision_overlay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BRICK_COLS, BRICK_ROWS};

    #[test]
    fn test_snapshot_lists_active_entities() {
        let mut state = GameState::new();
        state.bricks[1][3].active = false;
        let snap = state.snapshot();
        assert_eq!(snap.screen, Screen::Title);
        assert_eq!(snap.balls.len(), 1);
        assert_eq!(snap.bricks.len(), BRICK_ROWS * BRICK_COLS);
        assert!(!snap.bricks[BRICK_COLS + 3].active);
        assert!(snap.powerups.is_empty());
        assert!(snap.particles.is_empty());
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let snap = GameState::new().snapshot();
        let json = serde_json::to_value(&snap).unwrap_or_default();
        assert_eq!(json["screen"], "Title");
        assert_eq!(json["lives"], 3);
        assert_eq!(json["bricks"].as_array().map(Vec::len), Some(50));
    }
}
