use std::mem;

use serde::{Deserialize, Serialize};

use crate::types::Pos;

/// A walled rectangle. The outermost ring of cells is wall, the rest is floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    discovered: bool,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height, discovered: false }
    }

    pub fn origin(&self) -> Pos {
        Pos::new(self.x, self.y)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width - 1
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height - 1
    }

    pub fn is_discovered(&self) -> bool {
        self.discovered
    }

    /// Returns `true` only on the call that flips the flag.
    pub(super) fn mark_discovered(&mut self) -> bool {
        !mem::replace(&mut self.discovered, true)
    }

    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x && pos.x <= self.right() && pos.y >= self.y && pos.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Room) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub fn is_on_perimeter(&self, pos: Pos) -> bool {
        let on_column = pos.x == self.x || pos.x == self.right();
        let on_row = pos.y == self.y || pos.y == self.bottom();
        self.contains(pos) && (on_column || on_row)
    }

    pub fn is_corner(&self, pos: Pos) -> bool {
        (pos.x == self.x || pos.x == self.right()) && (pos.y == self.y || pos.y == self.bottom())
    }

    /// Every cell of the rectangle, walls included, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = Pos> + use<> {
        let (x, right, y, bottom) = (self.x, self.right(), self.y, self.bottom());
        (y..=bottom).flat_map(move |row| (x..=right).map(move |column| Pos::new(column, row)))
    }
}
