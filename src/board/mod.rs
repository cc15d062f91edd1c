//! Hexagonal board representation.
//!
//! Contains the axial coordinate system, the half-edge mesh arena, and
//! the deterministic board generator.

pub mod coord;
pub mod generate;
pub mod mesh;

pub use coord::{
    edge_id, seed_from_bytes, step, vertex_id, Coord, EdgeId, Orientation, TileId, VertexId,
};
pub use generate::{BoardError, DEFAULT_RING_COUNT};
pub use mesh::{Board, Edge, Intersection, Player, Resource, Tile};
