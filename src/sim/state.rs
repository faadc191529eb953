//! Game state and core simulation types
//!
//! Every counter the handlers touch lives on [`GameState`]; nothing is global.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Aabb;
use crate::consts::*;

/// Duck lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DuckState {
    /// Alive and flying around the play area
    Flying,
    /// Shot: dropping straight down until the removal timer runs out
    Falling { timer: f32 },
    /// Deactivated and hidden (kept in the batch, never hit-tested)
    Gone,
}

/// A duck entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duck {
    pub id: u32,
    pub pos: Vec2,
    /// Unit heading
    pub dir: Vec2,
    /// Pixels per tick
    pub speed: f32,
    /// Sprite mirrored (facing left)
    pub flip_x: bool,
    pub state: DuckState,
}

impl Duck {
    pub fn new(id: u32, pos: Vec2, dir: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            dir,
            speed,
            flip_x: dir.x < 0.0,
            state: DuckState::Flying,
        }
    }

    /// Still flying (can be scored)
    #[inline]
    pub fn alive(&self) -> bool {
        matches!(self.state, DuckState::Flying)
    }

    /// Visible and hit-testable
    #[inline]
    pub fn active(&self) -> bool {
        !matches!(self.state, DuckState::Gone)
    }

    /// Sprite bounds used for hit testing
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(DUCK_SIZE))
    }

    /// Switch to the falling state. Returns false if already shot.
    pub fn shoot(&mut self) -> bool {
        if !self.alive() {
            return false;
        }
        self.state = DuckState::Falling {
            timer: REMOVAL_DELAY,
        };
        true
    }
}

/// Things that happened during a tick, drained by the frontend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Trigger pulled (while playing)
    Shot,
    /// A duck was hit
    DuckHit { id: u32 },
    /// The given level was cleared
    LevelCleared { level: u32 },
    /// Time ran out; `ducks` is the total shot over the whole run
    GameOver { score: u64, level: u32, ducks: u32 },
    /// New run started after game over
    Restarted,
}

/// RNG state wrapper for serialization
///
/// Each spawned batch draws from its own PCG stream, so replaying a seed
/// reproduces every batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next batch; advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed and batch stream
    pub rng_state: RngState,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Seconds left on the level clock
    pub time_left: u32,
    /// Base target; the level target is `ducks_to_shoot + level`
    pub ducks_to_shoot: u32,
    /// Ducks shot this level
    pub ducks_shot: u32,
    /// Ducks shot since the run started
    pub total_ducks_shot: u32,
    pub game_over: bool,
    /// The live batch (sorted by id)
    pub ducks: Vec<Duck>,
    /// Time accumulated toward the next one-second tick
    pub second_accumulator: f32,
    /// Crosshair position in play-area coordinates
    pub crosshair: Vec2,
    /// Events since the frontend last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game with the given seed and spawn the first batch
    pub fn new(seed: u64) -> Self {
        let mut state = Self::empty(seed);
        super::spawn::spawn_ducks(&mut state);
        state
    }

    /// Fresh counters without any ducks
    pub fn empty(seed: u64) -> Self {
        Self {
            rng_state: RngState::new(seed),
            level: START_LEVEL,
            score: 0,
            time_left: LEVEL_TIME_SECS,
            ducks_to_shoot: BASE_DUCKS_TO_SHOOT,
            ducks_shot: 0,
            total_ducks_shot: 0,
            game_over: false,
            ducks: Vec::new(),
            second_accumulator: 0.0,
            crosshair: Vec2::new(PLAY_WIDTH / 2.0, PLAY_HEIGHT / 2.0),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of ducks needed to clear the current level
    #[inline]
    pub fn level_target(&self) -> u32 {
        self.ducks_to_shoot + self.level
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Ducks still on screen (flying or falling)
    pub fn active_ducks(&self) -> impl Iterator<Item = &Duck> {
        self.ducks.iter().filter(|d| d.active())
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure ducks are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.ducks.sort_by_key(|d| d.id);
    }
}
