//! Bricked Up - headless driver
//!
//! Runs the simulation core with an autopilot at a fixed display rate and
//! prints the final render snapshot as JSON. Windowing and audio are out of
//! scope for this binary.

use std::process::ExitCode;

use bricked_up::consts::{FRAME_MS, MAX_SUBSTEPS};
use bricked_up::sim::{FrameTime, GameEvent, GameState, Screen, SeededRoll, TickInput, run_frame};
use bricked_up::{Settings, Tuning};

/// Autopilot aims to strike the ball this far from the paddle centre
const AIM_OFFSET: f32 = 18.0;
/// Dead band around the aim point
const AIM_SLACK: f32 = 4.0;

/// Fixed-step driver, the same accumulator scheme a windowed build would use
struct Driver {
    state: GameState,
    rng: SeededRoll,
    accumulator: f32,
    clock_ms: u64,
    stats: RunStats,
}

#[derive(Debug, Default)]
struct RunStats {
    ticks: u64,
    bricks_hit: u32,
    powerups_collected: u32,
    lives_lost: u32,
    levels_cleared: u32,
    games_over: u32,
}

impl Driver {
    fn new(settings: &Settings) -> Result<Self, bricked_up::TuningError> {
        let mut state = GameState::with_tuning(Tuning::default())?;
        settings.apply(&mut state);
        Ok(Self {
            state,
            rng: SeededRoll::new(settings.seed),
            accumulator: 0.0,
            clock_ms: 0,
            stats: RunStats::default(),
        })
    }

    /// One display frame: consume elapsed time in fixed ticks
    fn frame(&mut self, dt_ms: f32) {
        self.accumulator += dt_ms;

        let mut substeps = 0;
        while self.accumulator >= FRAME_MS && substeps < MAX_SUBSTEPS {
            self.accumulator -= FRAME_MS;
            substeps += 1;
            self.step();
        }

        // Drop backlog rather than spiral
        if substeps == MAX_SUBSTEPS && self.accumulator >= FRAME_MS {
            log::warn!("Simulation behind by {:.1}ms; skipping", self.accumulator);
            self.accumulator = 0.0;
        }
    }

    fn step(&mut self) {
        self.clock_ms += FRAME_MS as u64;
        let input = autopilot(&self.state);
        let time = FrameTime::new(FRAME_MS, self.clock_ms);
        run_frame(&mut self.state, &input, time, &mut self.rng);
        self.stats.ticks += 1;

        for event in self.state.drain_events() {
            log::debug!("{:?}", event);
            match event {
                GameEvent::BrickHit { .. } => self.stats.bricks_hit += 1,
                GameEvent::PowerUpCollected(_) => self.stats.powerups_collected += 1,
                GameEvent::LifeLost { .. } => self.stats.lives_lost += 1,
                GameEvent::LevelCleared => self.stats.levels_cleared += 1,
                GameEvent::GameOver => self.stats.games_over += 1,
                _ => {}
            }
        }
    }
}

/// Inputs for a simple player: start games, launch, and chase the lowest
/// descending ball
fn autopilot(state: &GameState) -> TickInput {
    let mut input = TickInput::default();
    match state.screen {
        Screen::Title | Screen::GameOver => input.confirm = true,
        Screen::Gameplay => {
            let balls = || state.balls.iter_active();
            if balls().any(|b| b.stuck) {
                input.confirm = true;
            }
            let target = balls()
                .filter(|b| !b.stuck && b.vel.y > 0.0)
                .max_by(|a, b| a.rect.bottom().total_cmp(&b.rect.bottom()))
                .or_else(|| balls().next())
                .map(|b| b.rect.center().x);

            if let Some(x) = target {
                // Alternate sides so the ball does not settle into a vertical loop
                let side = if state.rounds_cleared % 2 == 0 { 1.0 } else { -1.0 };
                let aim = state.paddle.rect.center().x + side * AIM_OFFSET;
                input.move_left = x < aim - AIM_SLACK;
                input.move_right = x > aim + AIM_SLACK;
            }
        }
    }
    input
}

fn main() -> ExitCode {
    env_logger::init();
    let settings = Settings::from_env();
    log::info!("Bricked Up (headless) starting: {:?}", settings);

    let mut driver = match Driver::new(&settings) {
        Ok(driver) => driver,
        Err(e) => {
            log::error!("Invalid tuning: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let dt = settings.frame_interval_ms();
    for _ in 0..settings.frames {
        driver.frame(dt);
    }

    let stats = &driver.stats;
    log::info!(
        "Run finished after {} ticks: {} bricks hit, {} power-ups, {} lives lost, {} levels cleared, {} game overs",
        stats.ticks,
        stats.bricks_hit,
        stats.powerups_collected,
        stats.lives_lost,
        stats.levels_cleared,
        stats.games_over
    );
    match serde_json::to_string_pretty(&driver.state.snapshot()) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize snapshot: {}", e);
            ExitCode::FAILURE
        }
    }
}
