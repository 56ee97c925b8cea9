//! Game state and core simulation types
//!
//! `GameState` owns every entity. The update loop is the only writer;
//! rendering reads a [`super::RenderSnapshot`] and input arrives as
//! [`super::TickInput`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::particles::Particle;
use super::pool::{Pool, Slot};
use super::powerup::{PowerUp, PowerUpKind};
use super::rect::Rect;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Screen {
    /// Waiting for confirm to start
    #[default]
    Title,
    /// Simulation running
    Gameplay,
    /// Lives exhausted; confirm returns to the title
    GameOver,
}

/// Something that happened during a frame, for audio and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PaddleBounce,
    WallBounce,
    BrickHit { row: usize, col: usize },
    PowerUpSpawned(PowerUpKind),
    PowerUpCollected(PowerUpKind),
    BallStuck,
    BallLost,
    LifeLost { remaining: u8 },
    LevelCleared,
    GameOver,
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ball {
    pub rect: Rect,
    /// Pixels per reference frame
    pub vel: Vec2,
    pub active: bool,
    /// Riding on the paddle until launched
    pub stuck: bool,
    /// Distance from the paddle's left edge to the ball's left edge while stuck
    pub stuck_offset: f32,
    /// Clock value of the last paddle bounce
    pub last_paddle_hit_ms: Option<u64>,
}

impl Slot for Ball {
    fn is_active(&self) -> bool {
        self.active
    }
}

impl Ball {
    /// A ball riding on the paddle, `offset` pixels from its left edge
    pub fn stuck_to(paddle: &Paddle, offset: f32, vel: Vec2) -> Self {
        let mut ball = Self {
            rect: Rect::new(0.0, 0.0, BALL_SIZE, BALL_SIZE),
            vel,
            active: true,
            stuck: true,
            stuck_offset: offset,
            last_paddle_hit_ms: None,
        };
        ball.follow_paddle(paddle);
        ball
    }

    /// Seat a stuck ball on top of the paddle
    pub fn follow_paddle(&mut self, paddle: &Paddle) {
        if !self.stuck {
            return;
        }
        let max_offset = (paddle.rect.width() - self.rect.width()).max(0.0);
        self.stuck_offset = self.stuck_offset.clamp(0.0, max_offset);
        self.rect.pos = Vec2::new(
            paddle.rect.left() + self.stuck_offset,
            paddle.rect.top() - self.rect.height(),
        );
    }

    /// Release from the paddle with the stored velocity
    pub fn launch(&mut self, now_ms: u64, launch_speed: f32) {
        if !self.stuck {
            return;
        }
        self.stuck = false;
        if self.vel == Vec2::ZERO {
            self.vel = Vec2::new(0.0, -launch_speed);
        }
        self.last_paddle_hit_ms = Some(now_ms);
    }

    /// Whether the paddle cooldown has elapsed
    pub fn paddle_ready(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        match self.last_paddle_hit_ms {
            Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
            None => true,
        }
    }
}

/// Paddle width for a size level
pub fn paddle_width_for_level(level: i8) -> f32 {
    let level = level.clamp(PADDLE_MIN_LEVEL, PADDLE_MAX_LEVEL);
    PADDLE_WIDTH + level as f32 * PADDLE_WIDTH_STEP
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
    /// Horizontal velocity (pixels/frame)
    pub vel_x: f32,
    /// Size level in [-3, 3]
    pub size_level: i8,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (FIELD_WIDTH - PADDLE_WIDTH) / 2.0,
                FIELD_HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_GAP,
                PADDLE_WIDTH,
                PADDLE_HEIGHT,
            ),
            vel_x: 0.0,
            size_level: 0,
        }
    }
}

impl Paddle {
    /// Change size level by `delta`, keeping the paddle centred where it was
    ///
    /// Returns false when already at the limit.
    pub fn resize(&mut self, delta: i8) -> bool {
        let level = (self.size_level + delta).clamp(PADDLE_MIN_LEVEL, PADDLE_MAX_LEVEL);
        if level == self.size_level {
            return false;
        }
        self.size_level = level;
        let center_x = self.rect.center().x;
        let width = paddle_width_for_level(level);
        self.rect.size.x = width;
        self.rect.pos.x = center_x - width / 2.0;
        self.clamp_to_field();
        true
    }

    /// Steer toward `direction` (-1, 0, 1), integrate and clamp
    pub fn steer(&mut self, direction: f32, tuning: &Tuning, frames: f32) {
        let target = direction * tuning.paddle_speed;
        self.vel_x = super::physics::smooth_toward(self.vel_x, target, tuning.paddle_accel, frames);
        self.rect.pos.x += self.vel_x * frames;
        if self.clamp_to_field() {
            self.vel_x = 0.0;
        }
    }

    /// Keep the paddle inside the field, returning true if it was moved
    pub fn clamp_to_field(&mut self) -> bool {
        let max_x = FIELD_WIDTH - self.rect.width();
        let clamped = self.rect.pos.x.clamp(0.0, max_x);
        let moved = clamped != self.rect.pos.x;
        self.rect.pos.x = clamped;
        moved
    }
}

/// One cell of the brick grid
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub active: bool,
    /// 0 = intact; 1..terminal = breaking, no longer solid
    pub anim_frame: u8,
    /// Milliseconds accumulated toward the next animation frame
    pub anim_timer_ms: f32,
}

impl Brick {
    pub fn at(row: usize, col: usize) -> Self {
        Self {
            rect: Rect::new(
                col as f32 * (BRICK_WIDTH + BRICK_GAP) + BRICK_OFFSET,
                row as f32 * (BRICK_HEIGHT + BRICK_GAP) + BRICK_OFFSET,
                BRICK_WIDTH,
                BRICK_HEIGHT,
            ),
            active: true,
            anim_frame: 0,
            anim_timer_ms: 0.0,
        }
    }

    /// Solid bricks take part in collision
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.active && self.anim_frame == 0
    }

    /// Begin the destruction animation; false if it was not intact
    pub fn start_destruction(&mut self) -> bool {
        if !self.is_collidable() {
            return false;
        }
        self.anim_frame = 1;
        self.anim_timer_ms = 0.0;
        true
    }

    /// Accumulate `elapsed_ms` and step frames; returns true when the brick
    /// disappears during this call
    pub fn advance_animation(&mut self, elapsed_ms: f32) -> bool {
        if !self.active || self.anim_frame == 0 {
            return false;
        }
        self.anim_timer_ms += elapsed_ms;
        while self.anim_timer_ms >= BRICK_FRAME_MS {
            self.anim_timer_ms -= BRICK_FRAME_MS;
            self.anim_frame += 1;
            if self.anim_frame >= BRICK_TERMINAL_FRAME {
                self.active = false;
                return true;
            }
        }
        false
    }
}

/// Dense row-major brick grid
pub type BrickGrid = [[Brick; BRICK_COLS]; BRICK_ROWS];

/// A fresh grid with every brick intact
pub fn build_brick_grid() -> BrickGrid {
    let mut grid = [[Brick::default(); BRICK_COLS]; BRICK_ROWS];
    for (row, cells) in grid.iter_mut().enumerate() {
        for (col, brick) in cells.iter_mut().enumerate() {
            *brick = Brick::at(row, col);
        }
    }
    grid
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance parameters in effect
    pub tuning: Tuning,
    /// Current screen
    pub screen: Screen,
    /// Player lives
    pub lives: u8,
    /// Rounds cleared since the title screen
    pub rounds_cleared: u32,
    pub paddle: Paddle,
    pub balls: Pool<Ball>,
    pub bricks: BrickGrid,
    pub powerups: Pool<PowerUp>,
    /// Decorative only
    pub particles: Pool<Particle>,
    /// Last spawn time per power-up kind, indexed by [`PowerUpKind::index`]
    pub powerup_spawned_ms: [Option<u64>; PowerUpKind::COUNT],
    /// Sticky paddle time left (real ms)
    pub sticky_remaining_ms: f32,
    pub paused: bool,
    /// Debug time multiplier
    pub game_speed: f32,
    /// Debug collision overlay (rendering only)
    pub show_collision_overlay: bool,
    /// Emit and advance particles
    pub particles_enabled: bool,
    /// Last monotonic clock value seen
    pub now_ms: u64,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// A state on the title screen with default tuning
    pub fn new() -> Self {
        let tuning = Tuning::default();
        let mut state = Self {
            lives: tuning.initial_lives,
            tuning,
            screen: Screen::Title,
            rounds_cleared: 0,
            paddle: Paddle::default(),
            balls: Pool::with_capacity(MAX_BALLS),
            bricks: build_brick_grid(),
            powerups: Pool::with_capacity(MAX_POWERUPS),
            particles: Pool::with_capacity(MAX_PARTICLES),
            powerup_spawned_ms: [None; PowerUpKind::COUNT],
            sticky_remaining_ms: 0.0,
            paused: false,
            game_speed: 1.0,
            show_collision_overlay: false,
            particles_enabled: true,
            now_ms: 0,
            events: Vec::new(),
        };
        state.reset_game();
        state
    }

    /// A title-screen state with custom tuning
    pub fn with_tuning(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut state = Self::new();
        state.tuning = tuning;
        state.reset_game();
        Ok(state)
    }

    /// Rebuild the level: lives, paddle, bricks, pools and timers
    pub fn reset_game(&mut self) {
        self.lives = self.tuning.initial_lives;
        self.paddle = Paddle::default();
        self.bricks = build_brick_grid();
        self.particles.clear();
        self.powerup_spawned_ms = [None; PowerUpKind::COUNT];
        self.sticky_remaining_ms = 0.0;
        self.paused = false;
        self.reset_ball();
        log::info!("Level reset: {} lives", self.lives);
    }

    /// Clear balls and power-ups and seat one ball on the paddle
    pub fn reset_ball(&mut self) {
        self.balls.clear();
        self.powerups.clear();
        self.spawn_stuck_ball();
    }

    /// Seat a new unlaunched ball on the paddle centre
    pub fn spawn_stuck_ball(&mut self) -> Option<usize> {
        let offset = (self.paddle.rect.width() - BALL_SIZE) / 2.0;
        let vel = Vec2::new(0.0, -self.tuning.launch_speed);
        self.balls
            .allocate(Ball::stuck_to(&self.paddle, offset, vel))
    }

    /// Release every stuck ball
    pub fn launch_stuck_balls(&mut self) {
        let now = self.now_ms;
        let speed = self.tuning.launch_speed;
        for ball in self.balls.iter_active_mut() {
            ball.launch(now, speed);
        }
    }

    /// Re-seat stuck balls after the paddle moved or resized
    pub fn sync_stuck_balls(&mut self) {
        let paddle = self.paddle;
        for ball in self.balls.iter_active_mut() {
            ball.follow_paddle(&paddle);
        }
    }

    /// Bricks still present (intact or breaking)
    pub fn active_brick_count(&self) -> usize {
        self.bricks.iter().flatten().filter(|b| b.active).count()
    }

    /// Bricks that still block the ball
    pub fn intact_brick_count(&self) -> usize {
        self.bricks.iter().flatten().filter(|b| b.is_collidable()).count()
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events gathered since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_layout() {
        let state = GameState::new();
        assert_eq!(state.screen, Screen::Title);
        assert_eq!(state.lives, INITIAL_LIVES);
        assert_eq!(state.active_brick_count(), BRICK_ROWS * BRICK_COLS);
        assert_eq!(state.balls.capacity(), MAX_BALLS);
        assert_eq!(state.powerups.capacity(), MAX_POWERUPS);
        assert_eq!(state.particles.capacity(), MAX_PARTICLES);
        assert_eq!(state.balls.active_count(), 1);

        let ball = state.balls.iter_active().next().copied().unwrap_or_default();
        assert!(ball.stuck);
        assert_eq!(ball.rect.bottom(), state.paddle.rect.top());
        assert_eq!(ball.rect.center().x, state.paddle.rect.center().x);
        assert_eq!(ball.vel, Vec2::new(0.0, -BALL_LAUNCH_SPEED));
    }

    #[test]
    fn test_brick_grid_positions() {
        let grid = build_brick_grid();
        assert_eq!(grid[0][0].rect, Rect::new(35.0, 35.0, 60.0, 20.0));
        assert_eq!(grid[4][9].rect, Rect::new(665.0, 155.0, 60.0, 20.0));
        assert!(grid.iter().flatten().all(|b| b.rect.right() <= FIELD_WIDTH));
    }

    #[test]
    fn test_brick_animation_cadence() {
        let mut brick = Brick::at(0, 0);
        assert!(brick.start_destruction());
        assert!(!brick.is_collidable());
        assert!(!brick.start_destruction());

        // 30ms: not yet a new frame
        assert!(!brick.advance_animation(30.0));
        assert_eq!(brick.anim_frame, 1);
        // 10ms more crosses the first threshold
        assert!(!brick.advance_animation(10.0));
        assert_eq!(brick.anim_frame, 2);

        // One large step advances several frames and finishes the brick
        assert!(brick.advance_animation(1000.0));
        assert!(!brick.active);
        assert_eq!(brick.anim_frame, BRICK_TERMINAL_FRAME);
        assert!(!brick.advance_animation(40.0));
    }

    #[test]
    fn test_animation_frame_count_independent_of_tick_rate() {
        let mut coarse = Brick::at(0, 0);
        let mut fine = Brick::at(0, 1);
        coarse.start_destruction();
        fine.start_destruction();
        for _ in 0..5 {
            coarse.advance_animation(32.0);
        }
        for _ in 0..20 {
            fine.advance_animation(8.0);
        }
        assert_eq!(coarse.anim_frame, fine.anim_frame);
    }

    #[test]
    fn test_paddle_resize_keeps_center_and_clamps() {
        let mut paddle = Paddle::default();
        let center = paddle.rect.center().x;
        assert!(paddle.resize(1));
        assert_eq!(paddle.rect.width(), 120.0);
        assert_eq!(paddle.rect.center().x, center);

        assert!(paddle.resize(2));
        assert!(!paddle.resize(1));
        assert_eq!(paddle.size_level, PADDLE_MAX_LEVEL);
        assert_eq!(paddle.rect.width(), 160.0);

        for _ in 0..10 {
            paddle.resize(-1);
        }
        assert_eq!(paddle.size_level, PADDLE_MIN_LEVEL);
        assert_eq!(paddle.rect.width(), 40.0);

        // Widening against the wall stays inside the field
        let mut paddle = Paddle::default();
        paddle.rect.pos.x = FIELD_WIDTH - paddle.rect.width();
        paddle.resize(3);
        assert_eq!(paddle.rect.right(), FIELD_WIDTH);
    }

    #[test]
    fn test_paddle_steer_accelerates_and_clamps() {
        let tuning = Tuning::default();
        let mut paddle = Paddle::default();
        let start = paddle.rect.left();
        paddle.steer(1.0, &tuning, 1.0);
        assert!(paddle.vel_x > 0.0 && paddle.vel_x < tuning.paddle_speed);
        assert!(paddle.rect.left() > start);

        for _ in 0..500 {
            paddle.steer(1.0, &tuning, 1.0);
        }
        assert_eq!(paddle.rect.right(), FIELD_WIDTH);
        assert_eq!(paddle.vel_x, 0.0);

        // Both directions held means no target velocity
        let mut paddle = Paddle::default();
        paddle.vel_x = 4.0;
        paddle.steer(0.0, &tuning, 1.0);
        assert!(paddle.vel_x < 4.0);
    }

    #[test]
    fn test_stuck_ball_follows_paddle() {
        let mut state = GameState::new();
        state.paddle.rect.pos.x = 100.0;
        state.sync_stuck_balls();
        let ball = state.balls.get(0).copied().unwrap_or_default();
        assert_eq!(ball.rect.left(), 100.0 + ball.stuck_offset);

        // Narrowing pulls an edge-riding ball back onto the paddle
        if let Some(ball) = state.balls.get_mut(0) {
            ball.stuck_offset = 85.0;
        }
        state.paddle.resize(-3);
        state.sync_stuck_balls();
        let ball = state.balls.get(0).copied().unwrap_or_default();
        assert!(ball.rect.right() <= state.paddle.rect.right());
    }

    #[test]
    fn test_launch_and_cooldown() {
        let mut state = GameState::new();
        state.now_ms = 1_000;
        state.launch_stuck_balls();
        let ball = state.balls.get(0).copied().unwrap_or_default();
        assert!(!ball.stuck);
        assert_eq!(ball.last_paddle_hit_ms, Some(1_000));
        assert!(!ball.paddle_ready(1_100, PADDLE_COOLDOWN_MS));
        assert!(ball.paddle_ready(1_200, PADDLE_COOLDOWN_MS));
    }

    #[test]
    fn test_with_tuning_validates() {
        let bad = Tuning {
            initial_lives: 0,
            ..Default::default()
        };
        assert!(GameState::with_tuning(bad).is_err());

        let five = Tuning {
            initial_lives: 5,
            ..Default::default()
        };
        let state = GameState::with_tuning(five);
        assert_eq!(state.map(|s| s.lives).ok(), Some(5));
    }

    #[test]
    fn test_reset_ball_keeps_bricks_and_lives() {
        let mut state = GameState::new();
        state.lives = 2;
        state.bricks[0][0].active = false;
        state.reset_ball();
        assert_eq!(state.lives, 2);
        assert!(!state.bricks[0][0].active);
        assert_eq!(state.balls.active_count(), 1);
        assert_eq!(state.powerups.active_count(), 0);

        state.reset_game();
        assert_eq!(state.lives, INITIAL_LIVES);
        assert!(state.bricks[0][0].active);
    }
}
