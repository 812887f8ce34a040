//! Dogleg corridors between pairs of rooms.
//!
//! A path leaves the leading room through a door on the wall facing the other
//! room, runs along the routing axis to a random bend, crosses over to the
//! trailing door's row (or column) and finishes at the trailing room's door.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::grid::TileGrid;
use super::rng::below;
use super::room::Room;
use crate::error::PathError;
use crate::types::{Pos, Tile};

/// Doors keep this distance from the corners of their wall.
pub const DOOR_CORNER_MARGIN: i32 = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    rooms: (usize, usize),
    axis: Axis,
    start: Pos,
    end: Pos,
    middle: i32,
}

impl Path {
    /// Routes a corridor between `a` and `b`. `pair` records their indices in the level.
    pub(super) fn connect(
        rng: &mut ChaCha8Rng,
        pair: (usize, usize),
        a: &Room,
        b: &Room,
    ) -> Result<Self, PathError> {
        let a_left_of_b = a.right() < b.x;
        let b_left_of_a = b.right() < a.x;
        let a_above_b = a.bottom() < b.y;
        let b_above_a = b.bottom() < a.y;

        let overlap_x = !(a_left_of_b || b_left_of_a);
        let overlap_y = !(a_above_b || b_above_a);

        let axis = match (overlap_x, overlap_y) {
            (true, true) => {
                return Err(PathError::RoomsOverlap { a: a.origin(), b: b.origin() });
            }
            (true, false) => Axis::Vertical,
            (false, true) => Axis::Horizontal,
            (false, false) => {
                let spacing_x = if a_left_of_b { b.x - a.right() } else { a.x - b.right() };
                let spacing_y = if a_above_b { b.y - a.bottom() } else { a.y - b.bottom() };
                if spacing_x >= spacing_y { Axis::Horizontal } else { Axis::Vertical }
            }
        };

        let (lead, trail) = match axis {
            Axis::Horizontal if a_left_of_b => (a, b),
            Axis::Vertical if a_above_b => (a, b),
            _ => (b, a),
        };

        let (start, end) = match axis {
            Axis::Horizontal => (
                Pos::new(lead.right(), lead.y + door_offset(rng, lead.height, lead)?),
                Pos::new(trail.x, trail.y + door_offset(rng, trail.height, trail)?),
            ),
            Axis::Vertical => (
                Pos::new(lead.x + door_offset(rng, lead.width, lead)?, lead.bottom()),
                Pos::new(trail.x + door_offset(rng, trail.width, trail)?, trail.y),
            ),
        };

        let (from, to) = match axis {
            Axis::Horizontal => (start.x, end.x),
            Axis::Vertical => (start.y, end.y),
        };
        if to - from < 2 {
            return Err(PathError::NoBendSpace { a: a.origin(), b: b.origin() });
        }
        let middle = from + 1 + below(rng, to - from - 1);

        Ok(Self { rooms: pair, axis, start, end, middle })
    }

    pub fn rooms(&self) -> (usize, usize) {
        self.rooms
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn start(&self) -> Pos {
        self.start
    }

    pub fn end(&self) -> Pos {
        self.end
    }

    /// Column (horizontal) or row (vertical) where the corridor turns.
    pub fn middle(&self) -> i32 {
        self.middle
    }

    /// Corridor floor cells from the start door to the end door, doors excluded.
    pub fn corridor_tiles(&self) -> Vec<Pos> {
        let mut tiles = Vec::new();
        match self.axis {
            Axis::Horizontal => {
                for x in (self.start.x + 1)..=self.middle {
                    tiles.push(Pos::new(x, self.start.y));
                }
                for y in steps_toward(self.start.y, self.end.y) {
                    tiles.push(Pos::new(self.middle, y));
                }
                for x in (self.middle + 1)..self.end.x {
                    tiles.push(Pos::new(x, self.end.y));
                }
            }
            Axis::Vertical => {
                for y in (self.start.y + 1)..=self.middle {
                    tiles.push(Pos::new(self.start.x, y));
                }
                for x in steps_toward(self.start.x, self.end.x) {
                    tiles.push(Pos::new(x, self.middle));
                }
                for y in (self.middle + 1)..self.end.y {
                    tiles.push(Pos::new(self.end.x, y));
                }
            }
        }
        tiles
    }

    pub(super) fn rasterize(&self, grid: &mut TileGrid) {
        for pos in self.corridor_tiles() {
            grid.set(pos, Tile::PathFloor);
        }
        grid.set(self.start, Tile::Door);
        grid.set(self.end, Tile::Door);
    }
}

/// Coordinates after `from` up to and including `to`.
fn steps_toward(from: i32, to: i32) -> Vec<i32> {
    if to >= from { ((from + 1)..=to).collect() } else { (to..from).rev().collect() }
}

/// Offset along a wall of length `dimension`, in `[2, dimension - 2)`.
fn door_offset(rng: &mut ChaCha8Rng, dimension: i32, room: &Room) -> Result<i32, PathError> {
    let span = dimension - 2 * DOOR_CORNER_MARGIN;
    if span <= 0 {
        return Err(PathError::WallTooShort { room: room.origin(), length: dimension });
    }
    Ok(DOOR_CORNER_MARGIN + below(rng, span))
}
