use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dungeon::{ActorKind, Level, Path, Pos, Room};
use serde::Serialize;
use tools::config_file::resolve_level_config;
use tools::logging::init_tracing;
use tools::seed::SeedChoice;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Generation seed; a fresh one is drawn when omitted
    #[arg(short, long)]
    seed: Option<u64>,
    /// TOML file with level parameters
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    height: Option<usize>,
    /// Spawn a player on a random floor tile and explore from there
    #[arg(short, long)]
    player: bool,
    /// Lift the fog of war before printing
    #[arg(short, long)]
    reveal: bool,
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Serialize)]
struct Report<'a> {
    seed: u64,
    width: usize,
    height: usize,
    snapshot_hash: String,
    discovered_tiles: usize,
    player: Option<Pos>,
    rooms: &'a [Room],
    paths: &'a [Path],
    rows: Vec<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let seed = SeedChoice::resolve(args.seed);
    let config = resolve_level_config(args.config.as_deref(), args.width, args.height)?;
    let mut level = Level::generate(&config, seed.value())
        .with_context(|| format!("Failed to generate level for seed {}", seed.value()))?;

    let player = args.player.then(|| {
        let pos = level.valid_location();
        level.insert_entity(ActorKind::Player, pos);
        let revealed = level.discover_land(pos);
        info!(x = pos.x, y = pos.y, revealed, "player_spawned");
        pos
    });

    if args.reveal {
        for y in 0..level.height() as i32 {
            for x in 0..level.width() as i32 {
                level.discover_tile(Pos::new(x, y));
            }
        }
    }

    let view = level.fogged_snapshot();
    match args.format {
        Format::Text => {
            println!("Seed: {} ({:?})", seed.value(), seed);
            print!("{view}");
            println!("Snapshot Hash: 0x{:016x}", level.snapshot_hash());
        }
        Format::Json => {
            let report = Report {
                seed: seed.value(),
                width: level.width(),
                height: level.height(),
                snapshot_hash: format!("0x{:016x}", level.snapshot_hash()),
                discovered_tiles: level.fog_of_war().discovered_count(),
                player,
                rooms: level.rooms(),
                paths: level.paths(),
                rows: view.to_glyph_rows(),
            };
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{json}");
        }
    }

    Ok(())
}
