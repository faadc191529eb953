//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod bounds;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bounds::{Aabb, Bounce, edge_bounce};
pub use spawn::spawn_ducks;
pub use state::{Duck, DuckState, GameEvent, GameState, RngState};
pub use tick::{
    TickInput, advance_clock, end_game, handle_pointer_down, hit_duck, next_level, on_second,
    restart, tick, update_motion,
};
