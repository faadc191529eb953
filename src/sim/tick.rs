//! Fixed timestep simulation tick
//!
//! Input, timer and per-frame handlers. Each takes the state explicitly so
//! the whole game can be driven without a render loop.

use glam::Vec2;

use super::bounds::edge_bounce;
use super::spawn::spawn_ducks;
use super::state::{DuckState, GameEvent, GameState};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer position (play-area coordinates)
    pub pointer: Option<Vec2>,
    /// Presses (click/tap) since the last tick, oldest first
    pub presses: Vec<Vec2>,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if let Some(pos) = input.pointer {
        state.crosshair = pos;
    }

    for &point in &input.presses {
        handle_pointer_down(state, point);
    }

    // Nothing moves and the clock stops once the run is over
    if state.game_over {
        return;
    }

    advance_clock(state, dt);
    if state.game_over {
        return;
    }
    update_motion(state, dt);

    state.normalize_order();
}

/// Pointer pressed: shoot, or restart a finished game
pub fn handle_pointer_down(state: &mut GameState, point: Vec2) {
    if state.game_over {
        restart(state);
        return;
    }

    state.events.push(GameEvent::Shot);

    let level = state.level;
    let hits: Vec<u32> = state
        .active_ducks()
        .filter(|d| d.bounds().contains(point))
        .map(|d| d.id)
        .collect();

    for id in hits {
        hit_duck(state, id);
        // Clearing the level replaced the batch
        if state.level != level {
            break;
        }
    }
}

/// Score a duck by id. Ducks already shot are ignored.
///
/// Returns true if the duck was scored.
pub fn hit_duck(state: &mut GameState, id: u32) -> bool {
    let Some(duck) = state.ducks.iter_mut().find(|d| d.id == id) else {
        return false;
    };
    if !duck.shoot() {
        return false;
    }

    state.score += POINTS_PER_DUCK;
    state.ducks_shot += 1;
    state.total_ducks_shot += 1;
    state.events.push(GameEvent::DuckHit { id });

    if state.ducks_shot >= state.level_target() {
        next_level(state);
    }
    true
}

/// Accumulate frame time into whole-second timer ticks
pub fn advance_clock(state: &mut GameState, dt: f32) {
    state.second_accumulator += dt;
    while state.second_accumulator >= 1.0 {
        state.second_accumulator -= 1.0;
        on_second(state);
        if state.game_over {
            state.second_accumulator = 0.0;
            break;
        }
    }
}

/// One-second timer callback
pub fn on_second(state: &mut GameState) {
    if state.game_over {
        return;
    }
    state.time_left = state.time_left.saturating_sub(1);
    if state.time_left == 0 {
        end_game(state);
    }
}

/// Per-frame duck movement and edge bounces.
///
/// Every active duck moves along its heading. Shot ducks keep that motion
/// and also drop at `FALL_SPEED` until their removal timer runs out.
pub fn update_motion(state: &mut GameState, dt: f32) {
    for duck in state.ducks.iter_mut().filter(|d| d.active()) {
        duck.pos += duck.dir * duck.speed;
        if !duck.alive() {
            duck.pos.y += FALL_SPEED * dt;
        }

        let bounce = edge_bounce(duck.pos);
        if bounce.x {
            duck.dir.x = -duck.dir.x;
            duck.flip_x = duck.dir.x < 0.0;
        }
        if bounce.y {
            duck.dir.y = -duck.dir.y;
        }

        if let DuckState::Falling { timer } = &mut duck.state {
            *timer -= dt;
            if *timer <= 0.0 {
                duck.state = DuckState::Gone;
            }
        }
    }
}

/// Level cleared: reset the clock, raise the target and respawn
pub fn next_level(state: &mut GameState) {
    let cleared = state.level;
    state.events.push(GameEvent::LevelCleared { level: cleared });

    state.level += 1;
    state.time_left = LEVEL_TIME_SECS;
    state.ducks_to_shoot += DUCKS_PER_LEVEL;
    spawn_ducks(state);

    log::info!(
        "Level {} cleared, starting level {} with {} ducks",
        cleared,
        state.level,
        state.level_target()
    );
}

/// Time ran out
pub fn end_game(state: &mut GameState) {
    state.game_over = true;
    state.events.push(GameEvent::GameOver {
        score: state.score,
        level: state.level,
        ducks: state.total_ducks_shot,
    });
    log::info!("Game over at level {} with score {}", state.level, state.score);
}

/// Start a new run from the initial counters
pub fn restart(state: &mut GameState) {
    state.score = 0;
    state.level = START_LEVEL;
    state.time_left = LEVEL_TIME_SECS;
    state.ducks_to_shoot = BASE_DUCKS_TO_SHOOT;
    state.total_ducks_shot = 0;
    state.game_over = false;
    state.second_accumulator = 0.0;
    spawn_ducks(state);
    state.events.push(GameEvent::Restarted);
    log::info!(
        "Game restarted (seed {}, batch {})",
        state.rng_state.seed,
        state.rng_state.stream
    );
}
