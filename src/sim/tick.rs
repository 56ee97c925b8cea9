//! Gameplay tick
//!
//! Advances one frame of real time in a fixed order: paddle, balls, life
//! check, win check, power-ups, brick animations, timers, particles.

use glam::Vec2;

use super::collision::{
    CollisionEvent, Contact, EarliestContacts, Wall, earliest_contacts, swept_rect_vs_rect,
};
use super::particles;
use super::physics::{enforce_min_vertical_speed, paddle_bounce, reflect_along_normal, reflect_by_overlap};
use super::powerup;
use super::rng::PercentRoll;
use super::state::{Ball, GameEvent, GameState, Screen};
use crate::consts::*;
use crate::frames_from_ms;

/// Input for a single tick: held directions plus debounced edges
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held
    pub move_left: bool,
    /// Held
    pub move_right: bool,
    /// Edge: start, launch, or leave game over
    pub confirm: bool,
    /// Edge
    pub toggle_pause: bool,
    /// Edge: double game speed
    pub speed_up: bool,
    /// Edge: halve game speed
    pub speed_down: bool,
    /// Edge: back to 1x
    pub speed_reset: bool,
    /// Edge: collision overlay on/off
    pub toggle_overlay: bool,
}

impl TickInput {
    /// Paddle direction; both or neither held means no movement
    pub fn direction(&self) -> f32 {
        match (self.move_left, self.move_right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Clock readings for a tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Real milliseconds since the previous tick
    pub elapsed_ms: f32,
    /// Monotonic clock in milliseconds
    pub now_ms: u64,
}

impl FrameTime {
    pub fn new(elapsed_ms: f32, now_ms: u64) -> Self {
        Self { elapsed_ms, now_ms }
    }
}

/// Advance gameplay by one tick
pub fn tick<R: PercentRoll + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    time: FrameTime,
    rng: &mut R,
) {
    state.now_ms = time.now_ms;

    if input.toggle_pause {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }
    if state.paused {
        return;
    }

    if input.confirm {
        state.launch_stuck_balls();
    }

    let elapsed_ms = time.elapsed_ms.max(0.0);
    let frames = frames_from_ms(elapsed_ms, state.game_speed);
    let scaled_ms = elapsed_ms * state.game_speed;

    // Paddle, then stuck balls ride along
    let direction = input.direction();
    state.paddle.steer(direction, &state.tuning, frames);
    state.sync_stuck_balls();

    for index in state.balls.active_indices() {
        step_ball(state, index, frames, rng);
    }

    remove_lost_balls(state);
    if !check_lives(state) {
        return;
    }

    if state.active_brick_count() == 0 {
        state.rounds_cleared += 1;
        log::info!("Level cleared ({} so far)", state.rounds_cleared);
        state.push_event(GameEvent::LevelCleared);
        state.reset_game();
        return;
    }

    powerup::advance_powerups(state, frames);
    if state.screen != Screen::Gameplay {
        return;
    }

    for brick in state.bricks.iter_mut().flatten() {
        brick.advance_animation(scaled_ms);
    }

    advance_sticky_timer(state, elapsed_ms);

    if state.particles_enabled {
        particles::emit_sticky(state);
        particles::advance(&mut state.particles, scaled_ms, frames);
    }
}

/// Move one ball through `frames` of travel, resolving every contact on the way
fn step_ball<R: PercentRoll + ?Sized>(state: &mut GameState, index: usize, frames: f32, rng: &mut R) {
    let Some(mut ball) = state.balls.get(index).copied() else {
        return;
    };
    if !ball.active || ball.stuck {
        return;
    }

    ball.vel = enforce_min_vertical_speed(ball.vel);

    let mut remaining = frames;
    let mut contacts = 0;
    while remaining > 0.0 {
        if contacts >= MAX_CONTACTS_PER_TICK {
            log::warn!(
                "Ball {} hit {} contacts in one tick; dropping {:.3} frames of travel",
                index,
                contacts,
                remaining
            );
            break;
        }

        if resolve_overlap(state, &mut ball, rng) {
            contacts += 1;
            if ball.stuck {
                break;
            }
            continue;
        }

        let motion = ball.vel * remaining;
        let set = find_contacts(state, &ball, motion);
        let Some(toi) = set.time() else {
            ball.rect = ball.rect.translated(motion);
            break;
        };

        ball.rect = ball.rect.translated(motion * toi);
        remaining *= 1.0 - toi;
        contacts += 1;

        if set.has_paddle() {
            if bounce_off_paddle(state, &mut ball) {
                break;
            }
            continue;
        }

        for (row, col) in set.bricks() {
            hit_brick(state, row, col, rng);
        }
        if set.walls().next().is_some() {
            state.push_event(GameEvent::WallBounce);
        }
        ball.vel = reflect_along_normal(ball.vel, set.normal());
        log::debug!(
            "Ball {} contact at t={:.3}: {} event(s), vel ({:.2}, {:.2})",
            index,
            toi,
            set.events.len(),
            ball.vel.x,
            ball.vel.y
        );
    }

    if let Some(slot) = state.balls.get_mut(index) {
        *slot = ball;
    }
}

/// Earliest contacts for `ball` travelling by `motion`
fn find_contacts(state: &GameState, ball: &Ball, motion: Vec2) -> EarliestContacts {
    let bricks = state.bricks.iter().enumerate().flat_map(|(row, cells)| {
        cells
            .iter()
            .enumerate()
            .filter(|(_, brick)| brick.is_collidable())
            .filter_map(move |(col, brick)| {
                CollisionEvent::from_sweep(
                    swept_rect_vs_rect(&ball.rect, motion, &brick.rect),
                    Contact::Brick { row, col },
                )
            })
    });

    let paddle = ball
        .paddle_ready(state.now_ms, state.tuning.paddle_cooldown_ms)
        .then(|| swept_rect_vs_rect(&ball.rect, motion, &state.paddle.rect))
        .and_then(|hit| CollisionEvent::from_sweep(hit, Contact::Paddle));

    let walls = Wall::ALL.into_iter().filter_map(|wall| {
        CollisionEvent::from_sweep(
            swept_rect_vs_rect(&ball.rect, motion, &wall.rect()),
            Contact::Wall(wall),
        )
    });

    earliest_contacts(bricks.chain(paddle).chain(walls))
}

/// Bounce off the paddle; returns true if the ball stuck to it
fn bounce_off_paddle(state: &mut GameState, ball: &mut Ball) -> bool {
    let paddle = state.paddle;
    ball.vel = paddle_bounce(
        ball.vel,
        ball.rect.center().x,
        &paddle.rect,
        paddle.vel_x,
        &state.tuning,
    );
    ball.last_paddle_hit_ms = Some(state.now_ms);
    state.push_event(GameEvent::PaddleBounce);

    if state.sticky_remaining_ms > 0.0 {
        ball.stuck = true;
        ball.stuck_offset = ball.rect.left() - paddle.rect.left();
        ball.follow_paddle(&paddle);
        state.push_event(GameEvent::BallStuck);
        return true;
    }
    false
}

/// Handle a ball that already overlaps solid bricks or a ready paddle;
/// returns true if it did
///
/// The paddle moves before the balls, so it can slide into a ball from the
/// side where no sweep would report an entry.
fn resolve_overlap<R: PercentRoll + ?Sized>(state: &mut GameState, ball: &mut Ball, rng: &mut R) -> bool {
    let overlapping: Vec<(usize, usize)> = state
        .bricks
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| cells.iter().enumerate().map(move |(col, b)| (row, col, b)))
        .filter(|(_, _, brick)| brick.is_collidable() && brick.rect.intersects(&ball.rect))
        .map(|(row, col, _)| (row, col))
        .collect();

    if let Some(&(row, col)) = overlapping.first() {
        ball.vel = reflect_by_overlap(ball.vel, &ball.rect, &state.bricks[row][col].rect);
        for (row, col) in overlapping {
            hit_brick(state, row, col, rng);
        }
        return true;
    }

    let ready = ball.paddle_ready(state.now_ms, state.tuning.paddle_cooldown_ms);
    if ready && state.paddle.rect.intersects(&ball.rect) {
        bounce_off_paddle(state, ball);
        return true;
    }
    false
}

/// Start a brick breaking and roll for a drop
fn hit_brick<R: PercentRoll + ?Sized>(state: &mut GameState, row: usize, col: usize, rng: &mut R) {
    let Some(brick) = state.bricks.get_mut(row).and_then(|cells| cells.get_mut(col)) else {
        return;
    };
    if !brick.start_destruction() {
        return;
    }
    let center = brick.rect.center();
    state.push_event(GameEvent::BrickHit { row, col });
    powerup::roll_drop(state, rng, center);
}

/// Deactivate balls that fell out of the bottom of the field
fn remove_lost_balls(state: &mut GameState) {
    let mut lost = 0;
    for ball in state.balls.iter_active_mut() {
        if ball.rect.top() > FIELD_HEIGHT {
            ball.active = false;
            lost += 1;
        }
    }
    for _ in 0..lost {
        state.push_event(GameEvent::BallLost);
    }
}

/// Take a life when no ball is left; returns false on game over
fn check_lives(state: &mut GameState) -> bool {
    if state.balls.active_count() > 0 {
        return true;
    }
    state.lives = state.lives.saturating_sub(1);
    state.push_event(GameEvent::LifeLost {
        remaining: state.lives,
    });
    if state.lives == 0 {
        log::info!("Game over after {} cleared round(s)", state.rounds_cleared);
        state.screen = Screen::GameOver;
        state.push_event(GameEvent::GameOver);
        return false;
    }
    log::info!("Life lost, {} remaining", state.lives);
    state.reset_ball();
    true
}

/// Count down the sticky paddle on unscaled time
fn advance_sticky_timer(state: &mut GameState, elapsed_ms: f32) {
    if state.sticky_remaining_ms <= 0.0 {
        return;
    }
    state.sticky_remaining_ms -= elapsed_ms;
    if state.sticky_remaining_ms <= 0.0 {
        state.sticky_remaining_ms = 0.0;
        state.launch_stuck_balls();
        log::debug!("Sticky paddle expired");
    }
}
