use std::env;
use std::fs;

use engine::{TileGrid, TileGridError, TileRect, Vec2};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use super::features::{Feature, FeatureSet};
use super::state::{
    GAME_TILES_H, GAME_TILES_W, TILE_BLOCK, TILE_DOOR, TILE_EMPTY, TILE_KEY, TILE_LOCK,
    TILE_LOCK_OPEN, TILE_SPAWN,
};

/// Points at an alternative level bank file on disk; the embedded asset is
/// used when unset.
pub(crate) const LEVELS_ENV_VAR: &str = "SACRIFICES_LEVELS";

const EMBEDDED_BANK: &str = include_str!("../../assets/levels.json");

#[derive(Debug, Error)]
pub(crate) enum LevelError {
    #[error("failed to read level bank override {path}: {source}")]
    ReadOverride {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("level bank is not valid JSON at {json_path}: {source}")]
    ParseBank {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("level bank contains no levels")]
    EmptyBank,
    #[error("level {level} has {found} rows, expected {expected}")]
    BadRowCount {
        level: usize,
        found: usize,
        expected: usize,
    },
    #[error("level {level} row {row} has {found} tiles, expected {expected}")]
    BadRowWidth {
        level: usize,
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("level {level} uses unknown tile glyph {glyph:?}")]
    UnknownGlyph { level: usize, glyph: char },
    #[error("no level with index {level}")]
    UnknownLevel { level: usize },
    #[error("level {level} is missing its {tile_name} tile")]
    MissingTile {
        level: usize,
        tile_name: &'static str,
    },
    #[error(transparent)]
    Grid(#[from] TileGridError),
}

#[derive(Debug, Deserialize)]
struct BankFile {
    levels: Vec<LevelEntry>,
}

#[derive(Debug, Deserialize)]
struct LevelEntry {
    name: String,
    rows: Vec<String>,
    #[serde(default)]
    tutorial: Vec<String>,
}

fn tile_for_glyph(glyph: char) -> Option<u8> {
    match glyph {
        '.' => Some(TILE_EMPTY),
        '#' => Some(TILE_BLOCK),
        'P' => Some(TILE_SPAWN),
        'D' => Some(TILE_DOOR),
        'K' => Some(TILE_KEY),
        'L' => Some(TILE_LOCK),
        'O' => Some(TILE_LOCK_OPEN),
        _ => None,
    }
}

#[derive(Debug)]
struct LevelMeta {
    name: String,
    tutorial: Vec<String>,
}

/// All levels of the bank as one master grid, stored side by side; level `i`
/// occupies the slice starting at tile column `i * GAME_TILES_W`.
#[derive(Debug)]
pub(crate) struct LevelBank {
    master: TileGrid,
    levels: Vec<LevelMeta>,
}

impl LevelBank {
    /// Loads the bank from the `SACRIFICES_LEVELS` override file when that
    /// env var is set, or from the embedded asset otherwise.
    pub(crate) fn load() -> Result<Self, LevelError> {
        match env::var(LEVELS_ENV_VAR) {
            Ok(path) => Self::load_from_path(&path),
            Err(_) => Self::from_json(EMBEDDED_BANK),
        }
    }

    pub(crate) fn load_from_path(path: &str) -> Result<Self, LevelError> {
        info!(path, "level_bank_override");
        let raw = fs::read_to_string(path).map_err(|source| LevelError::ReadOverride {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub(crate) fn from_json(raw: &str) -> Result<Self, LevelError> {
        let deserializer = &mut serde_json::Deserializer::from_str(raw);
        let bank: BankFile =
            serde_path_to_error::deserialize(deserializer).map_err(|error| {
                LevelError::ParseBank {
                    json_path: error.path().to_string(),
                    source: error.into_inner(),
                }
            })?;
        if bank.levels.is_empty() {
            return Err(LevelError::EmptyBank);
        }

        let level_count = bank.levels.len();
        let master_width = GAME_TILES_W * level_count as u32;
        let mut tiles = vec![TILE_EMPTY; master_width as usize * GAME_TILES_H as usize];
        let mut levels = Vec::with_capacity(level_count);

        for (level_index, entry) in bank.levels.into_iter().enumerate() {
            if entry.rows.len() != GAME_TILES_H as usize {
                return Err(LevelError::BadRowCount {
                    level: level_index,
                    found: entry.rows.len(),
                    expected: GAME_TILES_H as usize,
                });
            }
            for (row_index, row) in entry.rows.iter().enumerate() {
                let glyphs: Vec<char> = row.chars().collect();
                if glyphs.len() != GAME_TILES_W as usize {
                    return Err(LevelError::BadRowWidth {
                        level: level_index,
                        row: row_index,
                        found: glyphs.len(),
                        expected: GAME_TILES_W as usize,
                    });
                }
                for (col_index, &glyph) in glyphs.iter().enumerate() {
                    let tile = tile_for_glyph(glyph).ok_or(LevelError::UnknownGlyph {
                        level: level_index,
                        glyph,
                    })?;
                    let master_x =
                        level_index * GAME_TILES_W as usize + col_index;
                    tiles[row_index * master_width as usize + master_x] = tile;
                }
            }
            levels.push(LevelMeta {
                name: entry.name,
                tutorial: entry.tutorial,
            });
        }

        let master = TileGrid::new(master_width, GAME_TILES_H, tiles)?;
        Ok(Self { master, levels })
    }

    pub(crate) fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn is_last_level(&self, level_index: usize) -> bool {
        level_index + 1 >= self.levels.len()
    }

    pub(crate) fn level_name(&self, level_index: usize) -> &str {
        self.levels
            .get(level_index)
            .map(|meta| meta.name.as_str())
            .unwrap_or("unknown")
    }

    pub(crate) fn tutorial_pages(&self, level_index: usize) -> &[String] {
        self.levels
            .get(level_index)
            .map(|meta| meta.tutorial.as_slice())
            .unwrap_or(&[])
    }

    fn grid_for(&self, level_index: usize) -> Result<TileGrid, LevelError> {
        if level_index >= self.levels.len() {
            return Err(LevelError::UnknownLevel { level: level_index });
        }
        let slice = self.master.copy_region(TileRect {
            x: level_index as u32 * GAME_TILES_W,
            y: 0,
            width: GAME_TILES_W,
            height: GAME_TILES_H,
        })?;
        Ok(slice)
    }
}

/// A level grid prepared for play: sentinels located and cleared, keys and
/// locks erased where the feature set says those mechanics no longer exist.
pub(crate) struct LoadedLevel {
    pub(crate) grid: TileGrid,
    pub(crate) spawn_px: Vec2,
    pub(crate) door_tile: (i32, i32),
}

pub(crate) fn load_level(
    bank: &LevelBank,
    level_index: usize,
    features: &FeatureSet,
) -> Result<LoadedLevel, LevelError> {
    let mut grid = bank.grid_for(level_index)?;

    let (spawn_x, spawn_y) = grid.find(TILE_SPAWN).map_err(|_| LevelError::MissingTile {
        level: level_index,
        tile_name: "spawn",
    })?;
    grid.clear(spawn_x, spawn_y, TILE_EMPTY);

    let (door_x, door_y) = grid.find(TILE_DOOR).map_err(|_| LevelError::MissingTile {
        level: level_index,
        tile_name: "door",
    })?;
    grid.clear(door_x, door_y, TILE_EMPTY);

    if !features.is_enabled(Feature::Keys) {
        let erased = grid.clear_all(TILE_KEY, TILE_EMPTY);
        debug!(level = level_index, erased, "keys_erased");
    }
    if !features.is_enabled(Feature::Locks) {
        let erased = grid.clear_all(TILE_LOCK, TILE_EMPTY)
            + grid.clear_all(TILE_LOCK_OPEN, TILE_EMPTY);
        debug!(level = level_index, erased, "locks_erased");
    }

    Ok(LoadedLevel {
        grid,
        spawn_px: Vec2 {
            x: (spawn_x as i32 * engine::TILE_SIZE_PX) as f32,
            y: (spawn_y as i32 * engine::TILE_SIZE_PX) as f32,
        },
        door_tile: (door_x as i32, door_y as i32),
    })
}
