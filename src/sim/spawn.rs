//! Duck batch generation

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Duck, GameState};
use crate::consts::*;
use crate::direction_from_angle;

/// Replace the live batch with `level_target()` fresh ducks.
///
/// Positions are whole pixels inside the spawn window, headings are
/// uniform over the full circle and speed is `[2, 3] + level` pixels per
/// tick. Resets the per-level shot counter.
pub fn spawn_ducks(state: &mut GameState) {
    state.ducks.clear();

    let count = state.level_target();
    let level = state.level;
    let mut rng = state.rng_state.next_rng();

    for _ in 0..count {
        let x = rng.random_range(SPAWN_MIN_X..=SPAWN_MAX_X) as f32;
        let y = rng.random_range(SPAWN_MIN_Y..=SPAWN_MAX_Y) as f32;
        let speed = (rng.random_range(DUCK_MIN_SPEED..=DUCK_MAX_SPEED) + level) as f32;
        let angle = rng.random_range(0.0..TAU);

        let id = state.next_entity_id();
        state
            .ducks
            .push(Duck::new(id, Vec2::new(x, y), direction_from_angle(angle), speed));
    }

    state.ducks_shot = 0;
    log::debug!("Spawned {} ducks for level {}", count, level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_count_matches_target() {
        let mut state = GameState::empty(3);
        spawn_ducks(&mut state);
        assert_eq!(state.ducks.len() as u32, state.level_target());

        state.level = 4;
        state.ducks_to_shoot = 11;
        spawn_ducks(&mut state);
        assert_eq!(state.ducks.len(), 15);
    }

    #[test]
    fn test_spawn_ranges() {
        let mut state = GameState::empty(99);
        state.level = 3;
        spawn_ducks(&mut state);
        for duck in &state.ducks {
            assert!(duck.alive());
            assert!((100.0..=700.0).contains(&duck.pos.x));
            assert!((100.0..=500.0).contains(&duck.pos.y));
            assert_eq!(duck.pos.x.fract(), 0.0);
            assert!(duck.speed == 5.0 || duck.speed == 6.0);
            assert!((duck.dir.length() - 1.0).abs() < 1e-5);
            assert_eq!(duck.flip_x, duck.dir.x < 0.0);
        }
    }

    #[test]
    fn test_spawn_replaces_batch_and_resets_shot_count() {
        let mut state = GameState::new(5);
        let first_ids: Vec<u32> = state.ducks.iter().map(|d| d.id).collect();
        state.ducks_shot = 4;
        spawn_ducks(&mut state);
        assert_eq!(state.ducks_shot, 0);
        assert_eq!(state.ducks.len(), 6);
        assert!(state.ducks.iter().all(|d| !first_ids.contains(&d.id)));
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let a = GameState::new(1234);
        let b = GameState::new(1234);
        let c = GameState::new(4321);
        let pos = |s: &GameState| s.ducks.iter().map(|d| d.pos).collect::<Vec<_>>();
        assert_eq!(pos(&a), pos(&b));
        assert_ne!(pos(&a), pos(&c));
    }
}
