use thiserror::Error;

/// Tiles are square; every pixel coordinate in the engine divides by this.
pub const TILE_SIZE_PX: i32 = 8;

/// A rectangular region of tile coordinates, used to address a slice of a
/// wider master grid (levels are stored side by side in one bank grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TileGridError {
    #[error("tile count mismatch: expected {expected}, got {actual}")]
    TileCountMismatch { expected: usize, actual: usize },
    #[error("tile id {tile_id} not found in grid")]
    TileNotFound { tile_id: u8 },
    #[error("source rect {rect:?} does not fit a {width}x{height} grid")]
    RegionOutOfBounds {
        rect: TileRect,
        width: u32,
        height: u32,
    },
}

/// Row-major grid of tile IDs. Mutation is limited to what the game needs:
/// clearing sentinel tiles at load and erasing/flipping keys and locks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tiles: Vec<u8>,
}

impl TileGrid {
    pub fn new(width: u32, height: u32, tiles: Vec<u8>) -> Result<Self, TileGridError> {
        let expected = width as usize * height as usize;
        let actual = tiles.len();
        if expected != actual {
            return Err(TileGridError::TileCountMismatch { expected, actual });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn filled(width: u32, height: u32, tile_id: u8) -> Self {
        Self {
            width,
            height,
            tiles: vec![tile_id; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index_of(&self, tx: u32, ty: u32) -> Option<usize> {
        if tx >= self.width || ty >= self.height {
            return None;
        }
        Some(ty as usize * self.width as usize + tx as usize)
    }

    /// Tile at signed coordinates; anything outside the grid reads as `None`,
    /// which collision probes treat as open space.
    pub fn tile_at(&self, tx: i32, ty: i32) -> Option<u8> {
        if tx < 0 || ty < 0 {
            return None;
        }
        self.index_of(tx as u32, ty as u32)
            .map(|index| self.tiles[index])
    }

    pub fn set(&mut self, tx: u32, ty: u32, tile_id: u8) {
        if let Some(index) = self.index_of(tx, ty) {
            self.tiles[index] = tile_id;
        }
    }

    /// First occurrence of `tile_id` in row-major scan order. Absence of a
    /// required sentinel (spawn, door) is a level-authoring fault, so this
    /// returns an error rather than an option.
    pub fn find(&self, tile_id: u8) -> Result<(u32, u32), TileGridError> {
        self.tiles
            .iter()
            .position(|&tile| tile == tile_id)
            .map(|index| {
                (
                    (index % self.width as usize) as u32,
                    (index / self.width as usize) as u32,
                )
            })
            .ok_or(TileGridError::TileNotFound { tile_id })
    }

    pub fn clear(&mut self, tx: u32, ty: u32, replacement: u8) {
        self.set(tx, ty, replacement);
    }

    /// Replaces every occurrence of `tile_id`. Returns how many were hit so
    /// callers can log key/lock erasure.
    pub fn clear_all(&mut self, tile_id: u8, replacement: u8) -> usize {
        let mut replaced = 0;
        for tile in &mut self.tiles {
            if *tile == tile_id {
                *tile = replacement;
                replaced += 1;
            }
        }
        replaced
    }

    /// Copies `src_rect` out of `self` into a new grid of the rect's size.
    pub fn copy_region(&self, src_rect: TileRect) -> Result<TileGrid, TileGridError> {
        let fits_x = src_rect.x.checked_add(src_rect.width).map(|end| end <= self.width);
        let fits_y = src_rect
            .y
            .checked_add(src_rect.height)
            .map(|end| end <= self.height);
        if fits_x != Some(true) || fits_y != Some(true) {
            return Err(TileGridError::RegionOutOfBounds {
                rect: src_rect,
                width: self.width,
                height: self.height,
            });
        }

        let mut tiles = Vec::with_capacity(src_rect.width as usize * src_rect.height as usize);
        for row in 0..src_rect.height {
            let src_y = src_rect.y + row;
            for col in 0..src_rect.width {
                let index = src_y as usize * self.width as usize + (src_rect.x + col) as usize;
                tiles.push(self.tiles[index]);
            }
        }
        TileGrid::new(src_rect.width, src_rect.height, tiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&[u8]]) -> TileGrid {
        let width = rows[0].len() as u32;
        let height = rows.len() as u32;
        let tiles = rows.iter().flat_map(|row| row.iter().copied()).collect();
        TileGrid::new(width, height, tiles).expect("grid")
    }

    #[test]
    fn new_rejects_tile_count_mismatch() {
        let result = TileGrid::new(4, 4, vec![0; 15]);
        assert_eq!(
            result,
            Err(TileGridError::TileCountMismatch {
                expected: 16,
                actual: 15
            })
        );
    }

    #[test]
    fn tile_at_is_none_outside_bounds() {
        let grid = TileGrid::filled(2, 2, 7);
        assert_eq!(grid.tile_at(-1, 0), None);
        assert_eq!(grid.tile_at(0, -1), None);
        assert_eq!(grid.tile_at(2, 0), None);
        assert_eq!(grid.tile_at(1, 1), Some(7));
    }

    #[test]
    fn find_returns_first_occurrence_in_row_major_order() {
        let grid = grid_from_rows(&[&[0, 0, 0], &[0, 3, 3], &[3, 0, 0]]);
        assert_eq!(grid.find(3), Ok((1, 1)));
    }

    #[test]
    fn find_missing_tile_is_an_error() {
        let grid = TileGrid::filled(3, 3, 0);
        assert_eq!(grid.find(9), Err(TileGridError::TileNotFound { tile_id: 9 }));
    }

    #[test]
    fn clear_all_replaces_every_occurrence_and_counts() {
        let mut grid = grid_from_rows(&[&[5, 0, 5], &[0, 5, 0]]);
        let replaced = grid.clear_all(5, 0);
        assert_eq!(replaced, 3);
        assert_eq!(grid.find(5), Err(TileGridError::TileNotFound { tile_id: 5 }));
    }

    #[test]
    fn copy_region_extracts_a_level_slice() {
        let master = grid_from_rows(&[&[1, 2, 9, 9], &[3, 4, 9, 9]]);
        let slice = master
            .copy_region(TileRect {
                x: 2,
                y: 0,
                width: 2,
                height: 2,
            })
            .expect("slice");
        assert_eq!(slice.tile_at(0, 0), Some(9));
        assert_eq!(slice.tile_at(1, 1), Some(9));
        assert_eq!(slice.width(), 2);
    }

    #[test]
    fn copy_region_rejects_rect_past_the_edge() {
        let master = TileGrid::filled(4, 4, 0);
        let result = master.copy_region(TileRect {
            x: 3,
            y: 0,
            width: 2,
            height: 2,
        });
        assert!(matches!(result, Err(TileGridError::RegionOutOfBounds { .. })));
    }
}
