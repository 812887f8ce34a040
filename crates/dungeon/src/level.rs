//! The generated level: terrain, rooms, corridors, entities and fog of war.

mod fog;
mod generation;
mod grid;
mod path;
mod rng;
mod room;

use std::fmt;

use rand_chacha::ChaCha8Rng;
use slotmap::SlotMap;
use tracing::{debug, info};
use xxhash_rust::xxh3::xxh3_64;

pub use fog::FogOfWar;
pub use grid::TileGrid;
pub use path::{Axis, DOOR_CORNER_MARGIN, Path};
pub use room::Room;

use self::generation::{Layout, random_interior_tile};
use self::rng::{below, level_rng};
use crate::config::{LevelConfig, LookAhead};
use crate::error::LevelError;
use crate::types::{Actor, ActorKind, EntityId, Pos, Tile};

#[derive(Clone, Debug)]
pub struct Level {
    config: LevelConfig,
    seed: u64,
    rng: ChaCha8Rng,
    sectors: Vec<Option<usize>>,
    rooms: Vec<Room>,
    paths: Vec<Path>,
    grid: TileGrid,
    fog: FogOfWar,
    entities: SlotMap<EntityId, Actor>,
}

impl Level {
    /// Generates a level of the given size with every other parameter at its default.
    pub fn new(height: usize, width: usize, seed: u64) -> Result<Self, LevelError> {
        Self::generate(&LevelConfig::with_size(height, width), seed)
    }

    pub fn generate(config: &LevelConfig, seed: u64) -> Result<Self, LevelError> {
        config.validate()?;
        let mut rng = level_rng(seed);
        let layout = generation::sample_layout(config, &mut rng)?;
        Self::assemble(config, seed, rng, layout)
    }

    /// Builds a level around hand-placed rooms instead of sampled ones. Each room
    /// lands in the sector holding its origin and must fit inside it.
    pub fn from_rooms(
        config: &LevelConfig,
        seed: u64,
        rooms: Vec<Room>,
    ) -> Result<Self, LevelError> {
        config.validate()?;
        let layout = generation::layout_from_rooms(config, rooms)?;
        Self::assemble(config, seed, level_rng(seed), layout)
    }

    fn assemble(
        config: &LevelConfig,
        seed: u64,
        mut rng: ChaCha8Rng,
        layout: Layout,
    ) -> Result<Self, LevelError> {
        let paths = generation::route_paths(config, &layout, &mut rng)?;
        let grid = generation::rasterize(config, &layout.rooms, &paths);

        let mut entities = SlotMap::with_key();
        for room in &layout.rooms {
            let pos = random_interior_tile(room, &mut rng);
            entities.insert_with_key(|id| Actor { id, kind: ActorKind::Monster, pos });
        }

        info!(
            seed,
            width = config.width,
            height = config.height,
            rooms = layout.rooms.len(),
            paths = paths.len(),
            "level_generated"
        );

        Ok(Self {
            config: config.clone(),
            seed,
            rng,
            sectors: layout.sectors,
            rooms: layout.rooms,
            paths,
            grid,
            fog: FogOfWar::new(config.width, config.height),
            entities,
        })
    }

    pub fn width(&self) -> usize {
        self.config.width
    }

    pub fn height(&self) -> usize {
        self.config.height
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    /// The room generated for sector `(sector_x, sector_y)`, if it was not skipped.
    pub fn sector_room(&self, sector_x: usize, sector_y: usize) -> Option<&Room> {
        if sector_x >= self.config.sector_count_x || sector_y >= self.config.sector_count_y {
            return None;
        }
        let slot = self.sectors[sector_y * self.config.sector_count_x + sector_x];
        slot.map(|index| &self.rooms[index])
    }

    /// A random interior floor tile of a random room. Entity occupancy is not considered.
    pub fn valid_location(&mut self) -> Pos {
        loop {
            let sector_x = below(&mut self.rng, self.config.sector_count_x as i32) as usize;
            let sector_y = below(&mut self.rng, self.config.sector_count_y as i32) as usize;
            let Some(index) = self.sectors[sector_y * self.config.sector_count_x + sector_x] else {
                continue;
            };
            return random_interior_tile(&self.rooms[index], &mut self.rng);
        }
    }

    pub fn room_at(&self, pos: Pos) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains(pos))
    }

    pub fn tile_at(&self, pos: Pos) -> Option<Tile> {
        self.grid.get(pos)
    }

    /// Whether the static terrain at `pos` can be walked on.
    pub fn is_valid_location(&self, pos: Pos) -> bool {
        self.grid.get(pos).is_some_and(Tile::is_passable)
    }

    pub fn is_transparent(&self, pos: Pos) -> bool {
        self.grid.get(pos).is_some_and(Tile::is_transparent)
    }

    /// Static terrain with every entity drawn on top. Later entities win shared tiles.
    pub fn snapshot(&self) -> TileGrid {
        let mut view = self.grid.clone();
        for actor in self.entities.values() {
            view.set(actor.pos, actor.kind.tile());
        }
        view
    }

    /// [`Level::snapshot`] with every undiscovered tile blanked out.
    pub fn fogged_snapshot(&self) -> TileGrid {
        let mut view = self.snapshot();
        for (tile, &discovered) in view.tiles.iter_mut().zip(self.fog.cells()) {
            if !discovered {
                *tile = Tile::Empty;
            }
        }
        view
    }

    pub fn fog_of_war(&self) -> &FogOfWar {
        &self.fog
    }

    /// Reveals one tile. Returns `true` only if it was hidden; out-of-bounds is a no-op.
    pub fn discover_tile(&mut self, pos: Pos) -> bool {
        self.fog.discover(pos)
    }

    /// Reveals what an explorer standing at `pos` can see: the whole room the
    /// first time it is entered, plus the configured look-ahead around `pos`.
    /// Returns the number of tiles that became discovered.
    pub fn discover_land(&mut self, pos: Pos) -> usize {
        let mut revealed = 0;

        if let Some(index) = self.rooms.iter().position(|room| room.contains(pos))
            && self.rooms[index].mark_discovered()
        {
            let room = self.rooms[index];
            for tile in room.tiles() {
                revealed += usize::from(self.fog.discover(tile));
            }
            debug!(room = index, x = room.x, y = room.y, revealed, "room_discovered");
        }

        match self.config.look_ahead {
            LookAhead::Cross => {
                for tile in pos.cross() {
                    revealed += usize::from(self.fog.discover(tile));
                }
            }
            LookAhead::Square { radius } => revealed += self.discover_area(pos, radius),
        }

        revealed
    }

    /// Reveals every tile within `radius` of `pos` on both axes.
    pub fn discover_area(&mut self, pos: Pos, radius: u8) -> usize {
        let radius = i32::from(radius);
        let mut revealed = 0;
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                revealed += usize::from(self.fog.discover(pos.offset(dx, dy)));
            }
        }
        revealed
    }

    pub fn entities(&self) -> impl Iterator<Item = &Actor> {
        self.entities.values()
    }

    pub fn entities_at(&self, pos: Pos) -> impl Iterator<Item = &Actor> {
        self.entities.values().filter(move |actor| actor.pos == pos)
    }

    /// First entity tagged as the player, in registry order.
    pub fn player(&self) -> Option<&Actor> {
        self.entities.values().find(|actor| actor.is_player())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Actor> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Actor> {
        self.entities.get_mut(id)
    }

    pub fn insert_entity(&mut self, kind: ActorKind, pos: Pos) -> EntityId {
        self.entities.insert_with_key(|id| Actor { id, kind, pos })
    }

    pub fn remove_entity(&mut self, id: EntityId) -> Option<Actor> {
        self.entities.remove(id)
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width() as u32).to_le_bytes());
        bytes.extend((self.height() as u32).to_le_bytes());
        bytes.extend(self.grid.tiles.iter().map(|tile| tile.code()));
        bytes.extend(self.fog.cells().iter().map(|&discovered| u8::from(discovered)));

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            for value in [room.x, room.y, room.width, room.height] {
                bytes.extend(value.to_le_bytes());
            }
            bytes.push(u8::from(room.is_discovered()));
        }

        bytes.extend((self.paths.len() as u32).to_le_bytes());
        for path in &self.paths {
            bytes.push(match path.axis() {
                Axis::Horizontal => 0,
                Axis::Vertical => 1,
            });
            for value in [path.start().x, path.start().y, path.end().x, path.end().y, path.middle()]
            {
                bytes.extend(value.to_le_bytes());
            }
        }

        bytes.extend((self.entities.len() as u32).to_le_bytes());
        for actor in self.entities.values() {
            bytes.push(actor.kind.tile().code());
            bytes.extend(actor.pos.y.to_le_bytes());
            bytes.extend(actor.pos.x.to_le_bytes());
        }

        bytes
    }

    pub fn snapshot_hash(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

/// The fog-masked view, one row per line.
impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fogged_snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_room_level(look_ahead: LookAhead) -> Level {
        let config = LevelConfig { look_ahead, ..LevelConfig::default() };
        Level::from_rooms(&config, 1, vec![Room::new(10, 10, 7, 7)]).expect("level")
    }

    #[test]
    fn entering_a_room_reveals_it_once_and_the_cross_every_time() {
        let mut level = single_room_level(LookAhead::Cross);
        let revealed = level.discover_land(Pos::new(13, 13));
        assert_eq!(revealed, 49);
        assert!(level.rooms()[0].is_discovered());

        let revealed = level.discover_land(Pos::new(11, 11));
        assert_eq!(revealed, 0, "room already discovered, neighbours all inside it");

        let revealed = level.discover_land(Pos::new(16, 13));
        assert_eq!(revealed, 1, "only the tile east of the wall is new");
        assert!(level.fog_of_war().is_discovered(Pos::new(17, 13)));
    }

    #[test]
    fn corridor_look_ahead_skips_diagonals() {
        let mut level = single_room_level(LookAhead::Cross);
        let revealed = level.discover_land(Pos::new(40, 5));
        assert_eq!(revealed, 5);
        assert!(level.fog_of_war().is_discovered(Pos::new(41, 5)));
        assert!(!level.fog_of_war().is_discovered(Pos::new(41, 6)));
        assert!(!level.rooms()[0].is_discovered());
    }

    #[test]
    fn square_look_ahead_reveals_the_full_neighbourhood() {
        let mut level = single_room_level(LookAhead::Square { radius: 1 });
        assert_eq!(level.discover_land(Pos::new(40, 5)), 9);
        assert!(level.fog_of_war().is_discovered(Pos::new(41, 6)));
    }

    #[test]
    fn discovery_near_the_edge_ignores_out_of_bounds_cells() {
        let mut level = single_room_level(LookAhead::Cross);
        assert_eq!(level.discover_land(Pos::new(0, 0)), 3);
        assert_eq!(level.discover_area(Pos::new(62, 29), 1), 4);
    }

    #[test]
    fn snapshot_overlays_entities_without_touching_terrain() {
        let mut level = single_room_level(LookAhead::Cross);
        let monster = level.entities().next().expect("one monster per room").pos;
        assert_eq!(level.snapshot().get(monster), Some(Tile::Monster));
        assert_eq!(level.tile_at(monster), Some(Tile::Floor));

        let player = level.insert_entity(ActorKind::Player, monster);
        assert_eq!(level.snapshot().get(monster), Some(Tile::Player));
        assert_eq!(level.player().map(|actor| actor.id), Some(player));
        assert_eq!(level.entities_at(monster).count(), 2);

        level.remove_entity(player);
        assert!(level.player().is_none());
        assert_eq!(level.snapshot().get(monster), Some(Tile::Monster));
    }

    #[test]
    fn moving_an_entity_changes_only_the_snapshot() {
        let mut level = single_room_level(LookAhead::Cross);
        let id = level.insert_entity(ActorKind::Player, Pos::new(12, 12));
        let before = level.grid.clone();
        if let Some(actor) = level.entity_mut(id) {
            actor.pos = Pos::new(13, 12);
        }
        assert_eq!(level.grid, before);
        assert_eq!(level.snapshot().get(Pos::new(13, 12)), Some(Tile::Player));
    }

    #[test]
    fn valid_location_lands_on_interior_floor() {
        let mut level = Level::new(30, 63, 77).expect("level");
        for _ in 0..100 {
            let pos = level.valid_location();
            let room = level.room_at(pos).expect("inside a room");
            assert!(pos.x > room.x && pos.x < room.right());
            assert!(pos.y > room.y && pos.y < room.bottom());
            assert_eq!(level.tile_at(pos), Some(Tile::Floor));
            assert!(level.is_valid_location(pos));
        }
    }

    #[test]
    fn walls_and_empty_space_are_not_valid_locations() {
        let level = single_room_level(LookAhead::Cross);
        assert!(!level.is_valid_location(Pos::new(10, 10)));
        assert!(!level.is_valid_location(Pos::new(10, 12)));
        assert!(!level.is_valid_location(Pos::new(0, 0)));
        assert!(!level.is_valid_location(Pos::new(63, 0)));
        assert!(level.is_valid_location(Pos::new(11, 11)));
        assert!(!level.is_transparent(Pos::new(16, 16)));
    }

    #[test]
    fn empty_hand_placed_layout_is_rejected() {
        let err = Level::from_rooms(&LevelConfig::default(), 1, Vec::new()).unwrap_err();
        assert_eq!(err, LevelError::NoRooms);
    }

    #[test]
    fn sector_lookup_matches_room_placement() {
        let level = single_room_level(LookAhead::Cross);
        assert_eq!(level.sector_room(0, 1), Some(&level.rooms()[0]));
        assert_eq!(level.sector_room(0, 0), None);
        assert_eq!(level.sector_room(3, 0), None);
    }

    #[test]
    fn display_renders_the_fogged_view() {
        let mut level = single_room_level(LookAhead::Cross);
        assert!(level.to_string().chars().all(|c| c == ' ' || c == '\n'));

        level.discover_land(Pos::new(13, 13));
        let text = level.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 30);
        assert!(lines.iter().all(|line| line.chars().count() == 63));
        assert_eq!(&lines[10][10..17], "0-----0");
        assert_eq!(&lines[16][10..17], "0-----0");
    }
}
