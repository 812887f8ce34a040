//! Sector layout, room sampling, corridor pairing and rasterization.

use rand_chacha::ChaCha8Rng;
use tracing::debug;

use super::grid::{TileGrid, paint_room};
use super::path::Path;
use super::rng::{below, percent, roll};
use super::room::Room;
use crate::config::{LevelConfig, MIN_ROOM_DIMENSION, SECTOR_ROOM_MARGIN};
use crate::error::LevelError;
use crate::types::Pos;

/// Upper bound on size redraws for a single room. With a validated config the
/// acceptance rate per draw is well above 1%, so this is never reached in practice.
pub(super) const MAX_ROOM_SAMPLE_ATTEMPTS: u32 = 10_000;

#[derive(Clone, Debug)]
pub(super) struct Layout {
    /// Row-major, `sector_count_x * sector_count_y` entries, indexing into `rooms`.
    pub(super) sectors: Vec<Option<usize>>,
    pub(super) rooms: Vec<Room>,
}

pub(super) fn sample_layout(
    config: &LevelConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Layout, LevelError> {
    let mut layout =
        Layout { sectors: Vec::with_capacity(config.sector_count()), rooms: Vec::new() };
    let mut skip_quota = config.room_skip_max;

    for sector_y in 0..config.sector_count_y {
        for sector_x in 0..config.sector_count_x {
            if skip_quota > 0 && percent(rng) < config.room_skip_chance {
                skip_quota -= 1;
                debug!(sector_x, sector_y, skip_quota, "sector_skipped");
                layout.sectors.push(None);
                continue;
            }

            let room = sample_room(config, rng, sector_x, sector_y)?;
            debug!(
                sector_x,
                sector_y,
                x = room.x,
                y = room.y,
                width = room.width,
                height = room.height,
                "room_placed"
            );
            layout.sectors.push(Some(layout.rooms.len()));
            layout.rooms.push(room);
        }
    }

    Ok(layout)
}

fn sample_room(
    config: &LevelConfig,
    rng: &mut ChaCha8Rng,
    sector_x: usize,
    sector_y: usize,
) -> Result<Room, LevelError> {
    let sector_width = config.sector_width() as i32;
    let sector_height = config.sector_height() as i32;

    let mut attempts = 0;
    let (room_width, room_height) = loop {
        if attempts == MAX_ROOM_SAMPLE_ATTEMPTS {
            return Err(LevelError::RoomSamplingExhausted { attempts });
        }
        attempts += 1;
        let room_height = roll(rng, sector_height / 2, sector_height);
        let room_width = roll(rng, sector_width / 2, sector_width);
        if fits_sector(room_height, sector_height) && fits_sector(room_width, sector_width) {
            break (room_width, room_height);
        }
    };

    let y = below(rng, sector_height - room_height) + sector_y as i32 * sector_height;
    let x = below(rng, sector_width - room_width) + sector_x as i32 * sector_width;
    Ok(Room::new(x, y, room_width, room_height))
}

fn fits_sector(dimension: i32, sector_dimension: i32) -> bool {
    dimension >= MIN_ROOM_DIMENSION && dimension < sector_dimension - SECTOR_ROOM_MARGIN
}

/// Places hand-authored rooms into the sectors holding their origins.
pub(super) fn layout_from_rooms(
    config: &LevelConfig,
    rooms: Vec<Room>,
) -> Result<Layout, LevelError> {
    if rooms.is_empty() {
        return Err(LevelError::NoRooms);
    }
    let sector_width = config.sector_width() as i32;
    let sector_height = config.sector_height() as i32;
    let mut sectors = vec![None; config.sector_count()];

    for (index, room) in rooms.iter().enumerate() {
        let outside = LevelError::RoomOutsideSector { origin: room.origin() };
        if room.x < 0 || room.y < 0 {
            return Err(outside);
        }
        let sector_x = (room.x / sector_width) as usize;
        let sector_y = (room.y / sector_height) as usize;
        if sector_x >= config.sector_count_x || sector_y >= config.sector_count_y {
            return Err(outside);
        }

        let sector_right = (sector_x as i32 + 1) * sector_width;
        let sector_bottom = (sector_y as i32 + 1) * sector_height;
        if room.width < MIN_ROOM_DIMENSION
            || room.height < MIN_ROOM_DIMENSION
            || room.x + room.width >= sector_right
            || room.y + room.height >= sector_bottom
        {
            return Err(outside);
        }

        let slot = &mut sectors[sector_y * config.sector_count_x + sector_x];
        if slot.is_some() {
            return Err(LevelError::SectorOccupied { sector_x, sector_y });
        }
        *slot = Some(index);
    }

    Ok(Layout { sectors, rooms })
}

/// One path per pair of sector-adjacent rooms: vertical neighbours first, then horizontal.
pub(super) fn route_paths(
    config: &LevelConfig,
    layout: &Layout,
    rng: &mut ChaCha8Rng,
) -> Result<Vec<Path>, LevelError> {
    let sector_at = |sector_x: usize, sector_y: usize| {
        layout.sectors[sector_y * config.sector_count_x + sector_x]
    };

    let mut pairs = Vec::new();
    for sector_x in 0..config.sector_count_x {
        for sector_y in 0..config.sector_count_y.saturating_sub(1) {
            if let (Some(a), Some(b)) =
                (sector_at(sector_x, sector_y), sector_at(sector_x, sector_y + 1))
            {
                pairs.push((a, b));
            }
        }
    }
    for sector_x in 0..config.sector_count_x.saturating_sub(1) {
        for sector_y in 0..config.sector_count_y {
            if let (Some(a), Some(b)) =
                (sector_at(sector_x, sector_y), sector_at(sector_x + 1, sector_y))
            {
                pairs.push((a, b));
            }
        }
    }

    let mut paths = Vec::with_capacity(pairs.len());
    for (a, b) in pairs {
        let path = Path::connect(rng, (a, b), &layout.rooms[a], &layout.rooms[b])?;
        debug!(
            from = a,
            to = b,
            axis = ?path.axis(),
            start = ?path.start(),
            end = ?path.end(),
            middle = path.middle(),
            "path_routed"
        );
        paths.push(path);
    }
    Ok(paths)
}

/// Rooms first, then corridors, so doors replace the wall tiles they sit on.
pub(super) fn rasterize(config: &LevelConfig, rooms: &[Room], paths: &[Path]) -> TileGrid {
    let mut grid = TileGrid::new(config.width, config.height);
    for room in rooms {
        paint_room(&mut grid, room);
    }
    for path in paths {
        path.rasterize(&mut grid);
    }
    grid
}

/// Uniform floor tile inside `room`, one cell clear of its walls.
pub(super) fn random_interior_tile(room: &Room, rng: &mut ChaCha8Rng) -> Pos {
    let x = below(rng, room.width - 2) + room.x + 1;
    let y = below(rng, room.height - 2) + room.y + 1;
    Pos::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::super::rng::level_rng;
    use super::*;
    use crate::types::Tile;

    #[test]
    fn sampled_rooms_respect_size_and_sector_bounds() {
        let config = LevelConfig::default();
        for seed in 0..64 {
            let layout = sample_layout(&config, &mut level_rng(seed)).expect("layout");
            assert_eq!(layout.sectors.len(), 9);
            for (sector, slot) in layout.sectors.iter().enumerate() {
                let Some(index) = slot else { continue };
                let room = layout.rooms[*index];
                let sector_x = (sector % 3) as i32;
                let sector_y = (sector / 3) as i32;
                assert!(room.width >= 5 && room.width < 21 - 2, "{room:?}");
                assert!(room.height >= 5 && room.height < 10 - 2, "{room:?}");
                assert!(room.x >= sector_x * 21 && room.right() < (sector_x + 1) * 21);
                assert!(room.y >= sector_y * 10 && room.bottom() < (sector_y + 1) * 10);
            }
        }
    }

    #[test]
    fn skip_quota_caps_empty_sectors() {
        let config =
            LevelConfig { room_skip_chance: 100, room_skip_max: 2, ..LevelConfig::default() };
        let layout = sample_layout(&config, &mut level_rng(5)).expect("layout");
        assert_eq!(layout.sectors[..2], [None, None]);
        assert!(layout.sectors[2..].iter().all(Option::is_some));
        assert_eq!(layout.rooms.len(), 7);
    }

    #[test]
    fn zero_skip_chance_fills_every_sector() {
        let config = LevelConfig { room_skip_chance: 0, ..LevelConfig::default() };
        let layout = sample_layout(&config, &mut level_rng(8)).expect("layout");
        assert_eq!(layout.rooms.len(), 9);
    }

    #[test]
    fn full_grid_routes_twelve_paths() {
        let config = LevelConfig { room_skip_chance: 0, ..LevelConfig::default() };
        let mut rng = level_rng(17);
        let layout = sample_layout(&config, &mut rng).expect("layout");
        let paths = route_paths(&config, &layout, &mut rng).expect("paths");
        assert_eq!(paths.len(), 12);
    }

    #[test]
    fn hand_authored_rooms_must_stay_inside_one_free_sector() {
        let config = LevelConfig::default();
        let layout = layout_from_rooms(&config, vec![Room::new(10, 10, 7, 7)]).expect("layout");
        assert_eq!(layout.sectors[3], Some(0));

        let err = layout_from_rooms(&config, vec![Room::new(18, 0, 5, 5)]).unwrap_err();
        assert_eq!(err, LevelError::RoomOutsideSector { origin: Pos::new(18, 0) });

        let err = layout_from_rooms(&config, vec![Room::new(0, 0, 5, 5), Room::new(8, 2, 6, 5)])
            .unwrap_err();
        assert_eq!(err, LevelError::SectorOccupied { sector_x: 0, sector_y: 0 });
    }

    #[test]
    fn hand_authored_layout_needs_a_room() {
        let err = layout_from_rooms(&LevelConfig::default(), Vec::new()).unwrap_err();
        assert_eq!(err, LevelError::NoRooms);
    }

    #[test]
    fn doors_overwrite_walls_after_rooms_are_painted() {
        let config = LevelConfig::default();
        let layout =
            layout_from_rooms(&config, vec![Room::new(2, 1, 10, 6), Room::new(25, 2, 9, 5)])
                .expect("layout");
        let paths = route_paths(&config, &layout, &mut level_rng(4)).expect("paths");
        assert_eq!(paths.len(), 1);

        let grid = rasterize(&config, &layout.rooms, &paths);
        assert_eq!(grid.get(paths[0].start()), Some(Tile::Door));
        assert_eq!(grid.get(paths[0].end()), Some(Tile::Door));
        for pos in paths[0].corridor_tiles() {
            assert_eq!(grid.get(pos), Some(Tile::PathFloor));
        }
    }

    #[test]
    fn interior_tiles_keep_clear_of_walls() {
        let room = Room::new(4, 4, 5, 6);
        let mut rng = level_rng(1);
        for _ in 0..200 {
            let pos = random_interior_tile(&room, &mut rng);
            assert!(pos.x > room.x && pos.x < room.right());
            assert!(pos.y > room.y && pos.y < room.bottom());
        }
    }
}
