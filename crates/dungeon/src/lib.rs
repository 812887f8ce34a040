//! Sector-based dungeon generation with room-by-room fog of war.

pub mod config;
pub mod error;
pub mod level;
pub mod types;

pub use config::{LevelConfig, LookAhead};
pub use error::{LevelError, PathError};
pub use level::{Axis, FogOfWar, Level, Path, Room, TileGrid};
pub use types::*;
