//! Axial coordinates, half-edge orientations, and stable mesh ids.
//!
//! Vertex and edge ids are content hashes of their coordinates, so every
//! executor that generates the same board derives the same id space. The
//! hash must be process-independent, which rules out the std hasher.

use serde::{Deserialize, Serialize};

/// Axial (x, y) coordinate identifying a mesh vertex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i64,
    pub y: i64,
}

impl Coord {
    pub const fn new(x: i64, y: i64) -> Self {
        Coord { x, y }
    }
}

/// One of the six fixed half-edge orientations around a hex face.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Orientation {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

impl Orientation {
    pub const ALL: [Orientation; 6] = [
        Orientation::North,
        Orientation::NorthEast,
        Orientation::SouthEast,
        Orientation::South,
        Orientation::SouthWest,
        Orientation::NorthWest,
    ];

    /// The orientation of the twin half-edge on the far side of a shared
    /// boundary. An involution: `o.opposite().opposite() == o`.
    pub const fn opposite(self) -> Orientation {
        match self {
            Orientation::North => Orientation::South,
            Orientation::NorthEast => Orientation::SouthWest,
            Orientation::SouthEast => Orientation::NorthWest,
            Orientation::South => Orientation::North,
            Orientation::SouthWest => Orientation::NorthEast,
            Orientation::NorthWest => Orientation::SouthEast,
        }
    }

    const fn tag(self) -> u8 {
        match self {
            Orientation::North => 0,
            Orientation::NorthEast => 1,
            Orientation::SouthEast => 2,
            Orientation::South => 3,
            Orientation::SouthWest => 4,
            Orientation::NorthWest => 5,
        }
    }
}

/// Advances a (vertex, half-edge) pair to the next one around a face
/// boundary. Six applications return to the starting pair, closing the
/// hex cycle.
pub fn step(c: Coord, o: Orientation) -> (Coord, Orientation) {
    match o {
        Orientation::North => (Coord::new(c.x - 1, c.y - 1), Orientation::NorthWest),
        Orientation::NorthWest => (Coord::new(c.x, c.y - 1), Orientation::SouthWest),
        Orientation::SouthWest => (Coord::new(c.x + 1, c.y - 1), Orientation::South),
        Orientation::South => (Coord::new(c.x + 1, c.y + 1), Orientation::SouthEast),
        Orientation::SouthEast => (Coord::new(c.x, c.y + 1), Orientation::NorthEast),
        Orientation::NorthEast => (Coord::new(c.x - 1, c.y + 1), Orientation::North),
    }
}

/// Stable id of a mesh vertex.
pub type VertexId = u32;
/// Stable id of a half-edge.
pub type EdgeId = u32;
/// Stable id of a tile; equal to the id of its first generated half-edge.
pub type TileId = u32;

// FNV-1a parameters, 32-bit for mesh ids and 64-bit for RNG seeds.
const FNV32_OFFSET: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;
const FNV64_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV64_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a32(bytes: impl IntoIterator<Item = u8>) -> u32 {
    let mut h = FNV32_OFFSET;
    for b in bytes {
        h ^= u32::from(b);
        h = h.wrapping_mul(FNV32_PRIME);
    }
    h
}

fn fnv1a64(bytes: impl IntoIterator<Item = u8>) -> u64 {
    let mut h = FNV64_OFFSET;
    for b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV64_PRIME);
    }
    h
}

/// Id of the vertex at `c`.
pub fn vertex_id(c: Coord) -> VertexId {
    fnv1a32(c.x.to_le_bytes().into_iter().chain(c.y.to_le_bytes()))
}

/// Id of the half-edge with origin `c` and orientation `o`.
pub fn edge_id(c: Coord, o: Orientation) -> EdgeId {
    fnv1a32(
        c.x.to_le_bytes()
            .into_iter()
            .chain(c.y.to_le_bytes())
            .chain([o.tag()]),
    )
}

/// Derives a 64-bit RNG seed from opaque bytes (the contract's creation
/// transaction id), so replaying init on any executor shuffles the tile
/// attributes identically.
pub fn seed_from_bytes(bytes: &[u8]) -> u64 {
    fnv1a64(bytes.iter().copied())
}
