use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result, bail, ensure};
use clap::Parser;
use dungeon::{ActorKind, Level, LevelConfig, Room, Tile};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tools::config_file::resolve_level_config;
use tools::logging::init_tracing;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First seed of the sweep
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to generate
    #[arg(short, long, default_value_t = 1000)]
    levels: u64,
    /// Random-walk steps taken by the player on each level
    #[arg(short, long, default_value_t = 200)]
    walk: u32,
    #[arg(short, long)]
    config: Option<PathBuf>,
}

const STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = resolve_level_config(args.config.as_deref(), None, None)?;

    info!(first_seed = args.seed, levels = args.levels, walk = args.walk, "fuzz_started");
    for seed in args.seed..args.seed.saturating_add(args.levels) {
        let mut level = Level::generate(&config, seed)
            .with_context(|| format!("Generation failed for seed {seed}"))?;
        check_layout(&level, &config).with_context(|| format!("Layout broken for seed {seed}"))?;
        random_walk(&mut level, seed, args.walk)
            .with_context(|| format!("Exploration broken for seed {seed}"))?;

        let replay = Level::generate(&config, seed)?;
        if footprint(&replay) != footprint(&level) || replay.paths() != level.paths() {
            warn!(seed, "layout differs on regeneration");
            bail!("Seed {seed} is not deterministic");
        }
    }

    info!("fuzz_completed");
    Ok(())
}

/// Room rectangles without their discovery state.
fn footprint(level: &Level) -> Vec<Room> {
    level.rooms().iter().map(|room| Room::new(room.x, room.y, room.width, room.height)).collect()
}

fn check_layout(level: &Level, config: &LevelConfig) -> Result<()> {
    let rooms = level.rooms();
    ensure!(
        rooms.len() + config.room_skip_max >= config.sector_count(),
        "{} rooms: more sectors skipped than the quota allows",
        rooms.len()
    );
    for (index, room) in rooms.iter().enumerate() {
        for other in &rooms[index + 1..] {
            ensure!(!room.intersects(other), "{room:?} overlaps {other:?}");
        }
    }

    let mut expected = 0;
    for sector_y in 0..config.sector_count_y {
        for sector_x in 0..config.sector_count_x {
            if level.sector_room(sector_x, sector_y).is_none() {
                continue;
            }
            expected += usize::from(level.sector_room(sector_x + 1, sector_y).is_some());
            expected += usize::from(level.sector_room(sector_x, sector_y + 1).is_some());
        }
    }
    ensure!(level.paths().len() == expected, "expected {expected} paths");
    let pairs: BTreeSet<(usize, usize)> = level.paths().iter().map(|path| path.rooms()).collect();
    ensure!(pairs.len() == expected, "a room pair was routed twice");

    for path in level.paths() {
        for door in [path.start(), path.end()] {
            ensure!(level.tile_at(door) == Some(Tile::Door), "no door at {door:?}");
        }
        for pos in path.corridor_tiles() {
            ensure!(level.room_at(pos).is_none(), "corridor enters a room at {pos:?}");
        }
    }

    for actor in level.entities() {
        ensure!(level.tile_at(actor.pos) == Some(Tile::Floor), "{actor:?} is not on floor");
    }
    Ok(())
}

fn random_walk(level: &mut Level, seed: u64, steps: u32) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pos = level.valid_location();
    let player = level.insert_entity(ActorKind::Player, pos);
    level.discover_land(pos);

    for _ in 0..steps {
        let (dx, dy) = STEPS[rng.next_u64() as usize % STEPS.len()];
        let next = pos.offset(dx, dy);
        if !level.is_valid_location(next) {
            continue;
        }

        let before = level.fog_of_war().discovered_count();
        let revealed = level.discover_land(next);
        let after = level.fog_of_war().discovered_count();
        ensure!(after == before + revealed, "discovery count drifted at {next:?}");
        ensure!(level.fog_of_war().is_discovered(next), "standing on a hidden tile {next:?}");
        if let Some(room) = level.room_at(next) {
            ensure!(room.is_discovered(), "entered {room:?} without discovering it");
        }

        pos = next;
        if let Some(actor) = level.entity_mut(player) {
            actor.pos = pos;
        }
    }

    ensure!(level.player().map(|actor| actor.pos) == Some(pos), "player lost track of {pos:?}");
    Ok(())
}
