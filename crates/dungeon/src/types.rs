use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EntityId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }

    /// The point itself followed by its four orthogonal neighbours.
    pub fn cross(self) -> [Pos; 5] {
        [self, self.offset(-1, 0), self.offset(1, 0), self.offset(0, -1), self.offset(0, 1)]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tile {
    Empty,
    WallHorizontal,
    WallVertical,
    Corner,
    Floor,
    PathFloor,
    Door,
    Monster,
    Player,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileCapabilities {
    pub passable: bool,
    pub transparent: bool,
}

impl Tile {
    pub const ALL: [Tile; 9] = [
        Tile::Empty,
        Tile::WallHorizontal,
        Tile::WallVertical,
        Tile::Corner,
        Tile::Floor,
        Tile::PathFloor,
        Tile::Door,
        Tile::Monster,
        Tile::Player,
    ];

    pub const fn glyph(self) -> char {
        match self {
            Tile::Empty => ' ',
            Tile::WallHorizontal => '-',
            Tile::WallVertical => '|',
            Tile::Corner => '0',
            Tile::Floor => '.',
            Tile::PathFloor => '#',
            Tile::Door => '+',
            Tile::Monster => 'M',
            Tile::Player => 'O',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Tile> {
        Tile::ALL.into_iter().find(|tile| tile.glyph() == glyph)
    }

    pub const fn capabilities(self) -> TileCapabilities {
        match self {
            Tile::Floor | Tile::PathFloor | Tile::Door => {
                TileCapabilities { passable: true, transparent: true }
            }
            _ => TileCapabilities { passable: false, transparent: false },
        }
    }

    pub const fn is_passable(self) -> bool {
        self.capabilities().passable
    }

    pub const fn is_transparent(self) -> bool {
        self.capabilities().transparent
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            Tile::Empty => 0,
            Tile::WallHorizontal => 1,
            Tile::WallVertical => 2,
            Tile::Corner => 3,
            Tile::Floor => 4,
            Tile::PathFloor => 5,
            Tile::Door => 6,
            Tile::Monster => 7,
            Tile::Player => 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Monster,
}

impl ActorKind {
    pub const fn tile(self) -> Tile {
        match self {
            ActorKind::Player => Tile::Player,
            ActorKind::Monster => Tile::Monster,
        }
    }
}

/// A registered entity. Behavior is driven by the caller; the level only
/// reads `pos` and `kind` when building snapshots and answering queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: EntityId,
    pub kind: ActorKind,
    pub pos: Pos,
}

impl Actor {
    pub fn glyph(&self) -> char {
        self.kind.tile().glyph()
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }
}
