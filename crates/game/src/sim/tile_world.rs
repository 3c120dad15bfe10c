use std::ops::Range;

use rand::Rng;

use super::config::GameConfig;
use super::geometry::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tile {
    #[default]
    Air,
    Dirt,
    Wood,
    Stone,
    Wall,
}

impl Tile {
    pub fn is_solid(self) -> bool {
        self != Tile::Air
    }
}

/// Fixed-size tile grid. Dimensions never change after construction and every
/// accessor is bounds-checked, so callers may pass any coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct TileWorld {
    rows: usize,
    cols: usize,
    tile_size: f32,
    tiles: Vec<Tile>,
}

impl TileWorld {
    /// Dirt from the ground row down; above it, each cell below the clear sky
    /// band rolls wood first and stone only if that roll failed.
    pub fn generate<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let rows = config.rows();
        let cols = config.world.columns;
        let ground_row = config.ground_row();
        let mut tiles = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            for _ in 0..cols {
                let tile = if row >= ground_row {
                    Tile::Dirt
                } else if row < config.world.clear_sky_rows {
                    Tile::Air
                } else if rng.random::<f64>() < config.world.wood_chance {
                    Tile::Wood
                } else if rng.random::<f64>() < config.world.stone_chance {
                    Tile::Stone
                } else {
                    Tile::Air
                };
                tiles.push(tile);
            }
        }

        Self {
            rows,
            cols,
            tile_size: config.tile_size_px(),
            tiles,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn width_px(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn in_bounds(&self, row: i32, col: i32) -> bool {
        self.index(row, col).is_some()
    }

    /// Air outside the grid.
    pub fn get_tile(&self, row: i32, col: i32) -> Tile {
        self.index(row, col)
            .map(|index| self.tiles[index])
            .unwrap_or(Tile::Air)
    }

    /// No-op outside the grid.
    pub fn set_tile(&mut self, row: i32, col: i32, tile: Tile) {
        if let Some(index) = self.index(row, col) {
            self.tiles[index] = tile;
        }
    }

    pub(crate) fn tile_at_index(&self, row: usize, col: usize) -> Tile {
        if row >= self.rows || col >= self.cols {
            return Tile::Air;
        }
        self.tiles[row * self.cols + col]
    }

    pub fn tile_rect(&self, row: i32, col: i32) -> Rect {
        Rect::new(
            col as f32 * self.tile_size,
            row as f32 * self.tile_size,
            self.tile_size,
            self.tile_size,
        )
    }

    /// `(row, col)` of the cell containing a world point; may lie outside the grid.
    pub fn tile_at_world(&self, x: f32, y: f32) -> (i32, i32) {
        if self.tile_size <= 0.0 {
            return (-1, -1);
        }
        (
            (y / self.tile_size).floor() as i32,
            (x / self.tile_size).floor() as i32,
        )
    }

    /// Columns overlapping `[camera_x, camera_x + screen_width]`, padded by two
    /// tiles each side and clamped to the grid.
    pub fn visible_columns(&self, camera_x: f32, screen_width: f32) -> Range<usize> {
        if self.cols == 0 || self.tile_size <= 0.0 {
            return 0..0;
        }
        let first = (camera_x / self.tile_size).floor() as i64 - 2;
        let last = ((camera_x + screen_width) / self.tile_size).floor() as i64 + 2;
        clamp_span(first, last, self.cols)
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        let row = usize::try_from(row).ok()?;
        let col = usize::try_from(col).ok()?;
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(row * self.cols + col)
    }
}

/// Inclusive `[first, last]` clamped into `0..len` as a half-open range.
pub(crate) fn clamp_span(first: i64, last: i64, len: usize) -> Range<usize> {
    let len = len as i64;
    let start = first.clamp(0, len);
    let end = last.saturating_add(1).clamp(0, len);
    if end <= start {
        return 0..0;
    }
    start as usize..end as usize
}

#[cfg(test)]
impl TileWorld {
    /// Builds a world from explicit rows. Short rows are padded with air to
    /// the width of the longest one.
    pub fn from_rows(tile_size: f32, rows: Vec<Vec<Tile>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.len();
        let mut tiles = Vec::with_capacity(row_count * cols);
        for mut row in rows {
            row.resize(cols, Tile::Air);
            tiles.extend(row);
        }
        Self {
            rows: row_count,
            cols,
            tile_size,
            tiles,
        }
    }

    pub fn height_px(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|candidate| **candidate == tile).count()
    }
}

#[cfg(test)]
pub(crate) fn parse_rows(tile_size: f32, rows: &[&str]) -> TileWorld {
    let rows = rows
        .iter()
        .map(|line| {
            line.chars()
                .map(|glyph| match glyph {
                    '#' => Tile::Dirt,
                    'W' => Tile::Wood,
                    'S' => Tile::Stone,
                    'X' => Tile::Wall,
                    _ => Tile::Air,
                })
                .collect()
        })
        .collect();
    TileWorld::from_rows(tile_size, rows)
}
