//! Shared plumbing for the dungeon command-line tools.

pub mod config_file;
pub mod logging;
pub mod seed;
