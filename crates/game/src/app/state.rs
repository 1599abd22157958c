use super::features::FeatureSet;
use super::levels::LevelBank;

// Tile IDs used by the level bank and the collision predicate.
pub(crate) const TILE_EMPTY: u8 = 0;
pub(crate) const TILE_BLOCK: u8 = 1;
pub(crate) const TILE_SPAWN: u8 = 2;
pub(crate) const TILE_DOOR: u8 = 3;
pub(crate) const TILE_KEY: u8 = 4;
pub(crate) const TILE_LOCK: u8 = 5;
pub(crate) const TILE_LOCK_OPEN: u8 = 6;

/// Wall classification for collision probes. An unlocked lock is passable;
/// the door, key and spawn sentinels never block movement.
pub(crate) fn is_wall_tile(tile_id: u8) -> bool {
    matches!(tile_id, TILE_BLOCK | TILE_LOCK)
}

// Levels are square slices of the master grid.
pub(crate) const GAME_TILES_W: u32 = 16;
pub(crate) const GAME_TILES_H: u32 = 16;

// Movement tuning, in pixels per tick at 60 ticks per second.
pub(crate) const PLAYER_SPEED: f32 = 1.0;
pub(crate) const PLAYER_JUMP: f32 = 2.5;
pub(crate) const GRAVITY: f32 = 0.2;
pub(crate) const PLAYER_WIDTH: f32 = 4.0;
pub(crate) const PLAYER_HEIGHT: f32 = 8.0;

/// The pause key must be held this many ticks before the menu opens.
pub(crate) const PAUSE_HOLD_TICKS: u32 = 30;

/// Shared state every layer sees: the capability set with its sacrifice
/// history, and the level bank the scenes slice their grids from.
pub(crate) struct GameState {
    pub(crate) features: FeatureSet,
    pub(crate) bank: LevelBank,
}

impl GameState {
    pub(crate) fn new(bank: LevelBank) -> Self {
        Self {
            features: FeatureSet::default(),
            bank,
        }
    }
}
