//! HUD text
//!
//! Pure formatting so the DOM side only copies strings into elements.

use crate::sim::GameState;

/// Shown under the status line once time runs out
pub const GAME_OVER_MESSAGE: &str = "Game Over! Click to restart.";

/// Status line for the current state
pub fn status_line(state: &GameState) -> String {
    format!(
        "Level: {} | Score: {} | Ducks: {}/{} | Time: {}s",
        state.level,
        state.score,
        state.ducks_shot,
        state.level_target(),
        state.time_left
    )
}

/// Everything the HUD shows this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub status: String,
    pub game_over: Option<&'static str>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            status: status_line(state),
            game_over: state.game_over.then_some(GAME_OVER_MESSAGE),
        }
    }
}
