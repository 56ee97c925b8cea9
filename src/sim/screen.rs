//! Screen state machine: Title -> Gameplay -> GameOver -> Title

use super::rng::PercentRoll;
use super::state::{GameState, Screen};
use super::tick::{FrameTime, TickInput, tick};
use crate::consts::{MAX_GAME_SPEED, MIN_GAME_SPEED};

/// A screen transition that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenChange {
    pub from: Screen,
    pub to: Screen,
}

/// Run one frame: debug toggles, screen input, and the gameplay tick
pub fn run_frame<R: PercentRoll + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    time: FrameTime,
    rng: &mut R,
) -> Option<ScreenChange> {
    let from = state.screen;
    apply_debug_toggles(state, input);

    match state.screen {
        Screen::Title => {
            state.now_ms = time.now_ms;
            if input.confirm {
                state.rounds_cleared = 0;
                state.reset_game();
                state.screen = Screen::Gameplay;
            }
        }
        Screen::Gameplay => tick(state, input, time, rng),
        Screen::GameOver => {
            state.now_ms = time.now_ms;
            if input.confirm {
                state.screen = Screen::Title;
            }
        }
    }

    let to = state.screen;
    if from == to {
        return None;
    }
    log::info!("Screen {:?} -> {:?}", from, to);
    Some(ScreenChange { from, to })
}

/// Game speed and overlay toggles, honoured on every screen
fn apply_debug_toggles(state: &mut GameState, input: &TickInput) {
    let speed = state.game_speed;
    if input.speed_reset {
        state.game_speed = 1.0;
    } else if input.speed_up {
        state.game_speed = (state.game_speed * 2.0).min(MAX_GAME_SPEED);
    } else if input.speed_down {
        state.game_speed = (state.game_speed / 2.0).max(MIN_GAME_SPEED);
    }
    if state.game_speed != speed {
        log::debug!("Game speed {}x", state.game_speed);
    }

    if input.toggle_overlay {
        state.show_collision_overlay = !state.show_collision_overlay;
    }
}
