use thiserror::Error;

use crate::types::Pos;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("rooms at {a:?} and {b:?} overlap; no corridor can join them")]
    RoomsOverlap { a: Pos, b: Pos },
    #[error("rooms at {a:?} and {b:?} leave no cell between their doors for a bend")]
    NoBendSpace { a: Pos, b: Pos },
    #[error("room at {room:?} has a wall of {length} cells, too short for a door")]
    WallTooShort { room: Pos, length: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("sector grid must have at least one column and one row, got {x}x{y}")]
    NoSectors { x: usize, y: usize },
    #[error("room skip chance {0} is not a percentage")]
    InvalidSkipChance(u8),
    #[error("skip quota {skip_max} could leave all {sector_count} sectors empty")]
    SkipQuotaTooLarge { skip_max: usize, sector_count: usize },
    #[error("sectors of {width}x{height} cells cannot hold a room (minimum {minimum}x{minimum})")]
    SectorTooSmall { width: usize, height: usize, minimum: usize },
    #[error("room size sampling did not settle after {attempts} attempts")]
    RoomSamplingExhausted { attempts: u32 },
    #[error("room at {origin:?} does not fit inside its sector")]
    RoomOutsideSector { origin: Pos },
    #[error("sector ({sector_x}, {sector_y}) already holds a room")]
    SectorOccupied { sector_x: usize, sector_y: usize },
    #[error("a hand-placed layout needs at least one room")]
    NoRooms,
    #[error(transparent)]
    Path(#[from] PathError),
}
