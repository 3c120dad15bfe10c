use super::geometry::Rect;
use super::tile_world::{clamp_span, Tile, TileWorld};

/// Tiles of padding around a box's own tile span. Must exceed the largest
/// per-axis displacement of any body in one tick.
pub const QUERY_PAD_TILES: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidTile {
    pub row: usize,
    pub col: usize,
    pub rect: Rect,
    pub tile: Tile,
}

/// Non-air tiles in the padded window around `rect`, row-major.
pub fn solid_tiles_around<'a>(
    rect: &Rect,
    world: &'a TileWorld,
) -> impl Iterator<Item = SolidTile> + 'a {
    let ts = world.tile_size();
    let (rows, cols) = if ts > 0.0 {
        (
            clamp_span(
                (rect.top() / ts).floor() as i64 - QUERY_PAD_TILES,
                (rect.bottom() / ts).floor() as i64 + QUERY_PAD_TILES,
                world.rows(),
            ),
            clamp_span(
                (rect.left() / ts).floor() as i64 - QUERY_PAD_TILES,
                (rect.right() / ts).floor() as i64 + QUERY_PAD_TILES,
                world.cols(),
            ),
        )
    } else {
        (0..0, 0..0)
    };

    rows.flat_map(move |row| {
        cols.clone().filter_map(move |col| {
            let tile = world.tile_at_index(row, col);
            tile.is_solid().then(|| SolidTile {
                row,
                col,
                rect: world.tile_rect(row as i32, col as i32),
                tile,
            })
        })
    })
}

pub fn collides(rect: &Rect, world: &TileWorld) -> bool {
    solid_tiles_around(rect, world).any(|solid| rect.intersects(&solid.rect))
}
