//! Per-tile discovery state laid over the static grid.
//! Callers outside the level only ever see this through `&FogOfWar`.

use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FogOfWar {
    width: usize,
    height: usize,
    discovered: Vec<bool>,
}

impl FogOfWar {
    pub(super) fn new(width: usize, height: usize) -> Self {
        Self { width, height, discovered: vec![false; width * height] }
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

    pub fn is_discovered(&self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.discovered[self.index(pos)]
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.iter().filter(|&&discovered| discovered).count()
    }

    pub fn cells(&self) -> &[bool] {
        &self.discovered
    }

    /// Reveals `pos`; `true` only when it was hidden before. Out-of-bounds is a no-op.
    pub(super) fn discover(&mut self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let idx = self.index(pos);
        let was_hidden = !self.discovered[idx];
        self.discovered[idx] = true;
        was_hidden
    }

    fn index(&self, pos: Pos) -> usize {
        (pos.y as usize) * self.width + (pos.x as usize)
    }
}
