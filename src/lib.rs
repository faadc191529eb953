//! Duck Hunt - A browser shooting gallery
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ducks, hit tests, level timer)
//! - `hud`: Status text derived from game state
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Procedural Web Audio sound effects
//! - `server`: Static file server for the web build (native only)

pub mod audio;
pub mod highscores;
pub mod hud;
pub mod renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use hud::Hud;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one rendered frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions (screen pixels, y down)
    pub const PLAY_WIDTH: f32 = 800.0;
    pub const PLAY_HEIGHT: f32 = 600.0;
    /// Ducks bounce once their center passes this distance from an edge
    pub const BOUNCE_MARGIN: f32 = 32.0;

    /// Spawn window (inclusive, whole pixels)
    pub const SPAWN_MIN_X: i32 = 100;
    pub const SPAWN_MAX_X: i32 = 700;
    pub const SPAWN_MIN_Y: i32 = 100;
    pub const SPAWN_MAX_Y: i32 = 500;

    /// Duck sprite frame size; hit box is the full frame centered on the duck
    pub const DUCK_SIZE: f32 = 64.0;
    /// Base speed range (pixels per tick), level is added on top
    pub const DUCK_MIN_SPEED: u32 = 2;
    pub const DUCK_MAX_SPEED: u32 = 3;
    /// Downward velocity of a shot duck (pixels/s)
    pub const FALL_SPEED: f32 = 200.0;
    /// Seconds a shot duck keeps falling before it is removed
    pub const REMOVAL_DELAY: f32 = 1.0;

    /// Rules
    pub const START_LEVEL: u32 = 1;
    pub const LEVEL_TIME_SECS: u32 = 60;
    pub const BASE_DUCKS_TO_SHOOT: u32 = 5;
    pub const DUCKS_PER_LEVEL: u32 = 2;
    pub const POINTS_PER_DUCK: u64 = 10;
}

/// Map a point in canvas CSS pixels to play-area coordinates.
///
/// The canvas is stretched to fill its client box, so each axis scales
/// independently.
#[inline]
pub fn screen_to_world(x: f32, y: f32, client_w: f32, client_h: f32) -> Vec2 {
    use consts::{PLAY_HEIGHT, PLAY_WIDTH};
    if client_w <= 0.0 || client_h <= 0.0 {
        return Vec2::new(x, y);
    }
    Vec2::new(x * PLAY_WIDTH / client_w, y * PLAY_HEIGHT / client_h)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_world_scales_each_axis() {
        let p = screen_to_world(200.0, 150.0, 400.0, 300.0);
        assert!((p.x - 400.0).abs() < 1e-4);
        assert!((p.y - 300.0).abs() < 1e-4);

        let p = screen_to_world(800.0, 600.0, 1600.0, 600.0);
        assert!((p.x - 400.0).abs() < 1e-4);
        assert!((p.y - 600.0).abs() < 1e-4);
    }

    #[test]
    fn test_screen_to_world_degenerate_client() {
        let p = screen_to_world(12.0, 34.0, 0.0, 0.0);
        assert_eq!(p, Vec2::new(12.0, 34.0));
    }

    #[test]
    fn test_direction_is_unit() {
        for i in 0..16 {
            let d = direction_from_angle(i as f32 * 0.4);
            assert!((d.length() - 1.0).abs() < 1e-5);
        }
    }
}
