//! Row-major tile storage shared by the static terrain and rendered snapshots.

use std::fmt;

use super::room::Room;
use crate::types::{Pos, Tile};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileGrid {
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) tiles: Vec<Tile>,
}

impl TileGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, tiles: vec![Tile::Empty; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    pub fn get(&self, pos: Pos) -> Option<Tile> {
        self.in_bounds(pos).then(|| self.tiles[self.index(pos)])
    }

    pub fn glyph_at(&self, pos: Pos) -> Option<char> {
        self.get(pos).map(Tile::glyph)
    }

    pub(super) fn set(&mut self, pos: Pos, tile: Tile) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        self.tiles[idx] = tile;
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(self.width.max(1))
    }

    pub fn to_glyph_rows(&self) -> Vec<String> {
        self.rows().map(|row| row.iter().map(|tile| tile.glyph()).collect()).collect()
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for tile in row {
                write!(f, "{}", tile.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

pub(super) fn paint_room(grid: &mut TileGrid, room: &Room) {
    for x in room.x..=room.right() {
        grid.set(Pos::new(x, room.y), Tile::WallHorizontal);
        grid.set(Pos::new(x, room.bottom()), Tile::WallHorizontal);
    }
    for y in room.y..=room.bottom() {
        grid.set(Pos::new(room.x, y), Tile::WallVertical);
        grid.set(Pos::new(room.right(), y), Tile::WallVertical);
    }
    for corner in [
        room.origin(),
        Pos::new(room.right(), room.y),
        Pos::new(room.x, room.bottom()),
        Pos::new(room.right(), room.bottom()),
    ] {
        grid.set(corner, Tile::Corner);
    }
    for y in (room.y + 1)..room.bottom() {
        for x in (room.x + 1)..room.right() {
            grid.set(Pos::new(x, y), Tile::Floor);
        }
    }
}
