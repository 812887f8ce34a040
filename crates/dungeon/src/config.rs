//! Generation parameters and their up-front validation.

use serde::{Deserialize, Serialize};

use crate::error::LevelError;

pub const DEFAULT_WIDTH: usize = 63;
pub const DEFAULT_HEIGHT: usize = 30;
pub const SECTOR_COUNT_X: usize = 3;
pub const SECTOR_COUNT_Y: usize = 3;
pub const ROOM_SKIP_CHANCE: u8 = 10;
pub const ROOM_SKIP_MAX: usize = 2;

/// Rooms are never thinner than this on either axis.
pub const MIN_ROOM_DIMENSION: i32 = 5;
/// A room must stay this many cells short of its sector on each axis.
pub const SECTOR_ROOM_MARGIN: i32 = 2;
/// Smallest sector for which `[dim / 2, dim]` still meets
/// `MIN_ROOM_DIMENSION <= room < dim - SECTOR_ROOM_MARGIN`.
pub const MIN_SECTOR_DIMENSION: usize = 8;

/// How much of the surroundings `discover_land` reveals on every call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookAhead {
    /// The point and its four orthogonal neighbours.
    #[default]
    Cross,
    /// Every tile within `radius` on both axes.
    Square { radius: u8 },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub sector_count_x: usize,
    pub sector_count_y: usize,
    pub room_skip_chance: u8,
    pub room_skip_max: usize,
    pub look_ahead: LookAhead,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            sector_count_x: SECTOR_COUNT_X,
            sector_count_y: SECTOR_COUNT_Y,
            room_skip_chance: ROOM_SKIP_CHANCE,
            room_skip_max: ROOM_SKIP_MAX,
            look_ahead: LookAhead::Cross,
        }
    }
}

impl LevelConfig {
    pub fn with_size(height: usize, width: usize) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn sector_width(&self) -> usize {
        self.width / self.sector_count_x.max(1)
    }

    pub fn sector_height(&self) -> usize {
        self.height / self.sector_count_y.max(1)
    }

    pub fn sector_count(&self) -> usize {
        self.sector_count_x * self.sector_count_y
    }

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.sector_count_x == 0 || self.sector_count_y == 0 {
            return Err(LevelError::NoSectors { x: self.sector_count_x, y: self.sector_count_y });
        }
        if self.room_skip_chance > 100 {
            return Err(LevelError::InvalidSkipChance(self.room_skip_chance));
        }
        if self.room_skip_max >= self.sector_count() {
            return Err(LevelError::SkipQuotaTooLarge {
                skip_max: self.room_skip_max,
                sector_count: self.sector_count(),
            });
        }
        if self.sector_width() < MIN_SECTOR_DIMENSION
            || self.sector_height() < MIN_SECTOR_DIMENSION
            || i32::try_from(self.width).is_err()
            || i32::try_from(self.height).is_err()
        {
            return Err(LevelError::SectorTooSmall {
                width: self.sector_width(),
                height: self.sector_height(),
                minimum: MIN_SECTOR_DIMENSION,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LevelConfig::default();
        assert_eq!((config.width, config.height), (63, 30));
        assert_eq!((config.sector_width(), config.sector_height()), (21, 10));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_sectors_below_minimum() {
        let config = LevelConfig::with_size(21, 63);
        assert_eq!(
            config.validate(),
            Err(LevelError::SectorTooSmall { width: 21, height: 7, minimum: 8 })
        );
        assert_eq!(LevelConfig::with_size(24, 24).validate(), Ok(()));
    }

    #[test]
    fn rejects_skip_quota_that_could_empty_the_map() {
        let config = LevelConfig { room_skip_max: 9, ..LevelConfig::default() };
        assert_eq!(
            config.validate(),
            Err(LevelError::SkipQuotaTooLarge { skip_max: 9, sector_count: 9 })
        );
    }

    #[test]
    fn rejects_zero_sector_counts_and_bad_percentages() {
        let config = LevelConfig { sector_count_y: 0, ..LevelConfig::default() };
        assert_eq!(config.validate(), Err(LevelError::NoSectors { x: 3, y: 0 }));

        let config = LevelConfig { room_skip_chance: 101, ..LevelConfig::default() };
        assert_eq!(config.validate(), Err(LevelError::InvalidSkipChance(101)));
    }

    #[test]
    fn smallest_valid_sector_still_admits_a_room_size() {
        let dim = MIN_SECTOR_DIMENSION as i32;
        let admitted = ((dim / 2)..=dim)
            .filter(|&room| room >= MIN_ROOM_DIMENSION && room < dim - SECTOR_ROOM_MARGIN)
            .count();
        assert!(admitted > 0);

        let smaller = dim - 1;
        let admitted = ((smaller / 2)..=smaller)
            .filter(|&room| room >= MIN_ROOM_DIMENSION && room < smaller - SECTOR_ROOM_MARGIN)
            .count();
        assert_eq!(admitted, 0);
    }
}
