//! Common types shared between the detector and its environment.

use crate::error::EnvError;
use serde::{Deserialize, Serialize};

/// Integer coordinates of a single block cell.
///
/// A block occupies the unit cube `[x, x+1) × [y, y+1) × [z, z+1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    /// Creates a block position from its coordinates.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the block containing the given world-space point.
    ///
    /// Returns `None` if any coordinate is non-finite or its floor does not
    /// fit in an `i32`.
    pub fn containing(x: f64, y: f64, z: f64) -> Option<Self> {
        Some(Self {
            x: floor_to_i32(x)?,
            y: floor_to_i32(y)?,
            z: floor_to_i32(z)?,
        })
    }

    /// Returns the neighbouring block one step in `direction`, or `None` at
    /// the edge of the `i32` range.
    pub fn offset(self, direction: Direction) -> Option<Self> {
        let (dx, dy, dz) = direction.vector();
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
            z: self.z.checked_add(dz)?,
        })
    }

    /// Returns the world-space centre of the block.
    pub fn center(self) -> [f64; 3] {
        [
            f64::from(self.x) + 0.5,
            f64::from(self.y) + 0.5,
            f64::from(self.z) + 0.5,
        ]
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

fn floor_to_i32(value: f64) -> Option<i32> {
    let floored = value.floor();
    if floored.is_finite() && floored >= f64::from(i32::MIN) && floored <= f64::from(i32::MAX) {
        Some(floored as i32)
    } else {
        None
    }
}

/// One of the six axis-aligned faces of a block.
///
/// Axis conventions follow the game: `+y` is up, `-z` is north, `+x` is east.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Direction {
    /// All six directions, in index order.
    pub const ALL: [Direction; 6] = [
        Direction::Down,
        Direction::Up,
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Returns a dense index in `0..6`, matching the order of [`Direction::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Direction::Down => 0,
            Direction::Up => 1,
            Direction::North => 2,
            Direction::South => 3,
            Direction::West => 4,
            Direction::East => 5,
        }
    }

    /// Returns the unit offset `(dx, dy, dz)` pointing out of this face.
    pub const fn vector(self) -> (i32, i32, i32) {
        match self {
            Direction::Down => (0, -1, 0),
            Direction::Up => (0, 1, 0),
            Direction::North => (0, 0, -1),
            Direction::South => (0, 0, 1),
            Direction::West => (-1, 0, 0),
            Direction::East => (1, 0, 0),
        }
    }

    /// Returns the direction pointing the other way.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Down => Direction::Up,
            Direction::Up => Direction::Down,
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
        }
    }

    /// Returns the lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::North => "north",
            Direction::South => "south",
            Direction::West => "west",
            Direction::East => "east",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Direction {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| EnvError::unknown_direction(s))
    }
}

/// Opaque tile identifier returned by block-state queries.
///
/// The detector only ever compares tiles for equality; the named constants
/// exist so hosts and the simulator agree on the handful of tiles that matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);
    pub const STONE: BlockId = BlockId(1);
    /// The tile the server puts in place of a node once it has been mined.
    pub const BEDROCK: BlockId = BlockId(7);
    pub const OBSIDIAN: BlockId = BlockId(49);
    pub const END_STONE: BlockId = BlockId(121);

    /// Returns true for the bedrock tile.
    pub const fn is_bedrock(self) -> bool {
        self.0 == Self::BEDROCK.0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::AIR
    }
}

/// Where the client currently is.
///
/// Only [`Location::TheEnd`] enables the detector; the other variants exist so
/// hosts can report a location change without inventing placeholder values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Hub,
    PrivateIsland,
    TheEnd,
    DwarvenMines,
    CrystalHollows,
    #[default]
    Unknown,
}

impl Location {
    /// Returns true when the client is in the End.
    pub const fn is_the_end(self) -> bool {
        matches!(self, Location::TheEnd)
    }

    /// Returns the snake_case name.
    pub const fn name(self) -> &'static str {
        match self {
            Location::Hub => "hub",
            Location::PrivateIsland => "private_island",
            Location::TheEnd => "the_end",
            Location::DwarvenMines => "dwarven_mines",
            Location::CrystalHollows => "crystal_hollows",
            Location::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Location {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hub" => Ok(Location::Hub),
            "private_island" | "island" => Ok(Location::PrivateIsland),
            "the_end" | "end" => Ok(Location::TheEnd),
            "dwarven_mines" => Ok(Location::DwarvenMines),
            "crystal_hollows" => Ok(Location::CrystalHollows),
            "unknown" => Ok(Location::Unknown),
            _ => Err(EnvError::unknown_location(s)),
        }
    }
}
