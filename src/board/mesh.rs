//! Half-edge mesh representation of the game board.
//!
//! The mesh is an arena of id-keyed records: every cross-reference between
//! vertices, half-edges, and tiles is an id looked up in an ordered map,
//! never a native pointer. That keeps the cyclic next/prev/twin structure
//! serializable and the iteration order deterministic across executors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::coord::{Coord, EdgeId, Orientation, TileId, VertexId};

/// A player color, in fixed turn-rotation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Player {
    Red,
    Green,
    Blue,
}

impl Player {
    pub const ALL: [Player; 3] = [Player::Red, Player::Green, Player::Blue];

    /// The next player in the turn rotation.
    pub const fn next(self) -> Player {
        match self {
            Player::Red => Player::Green,
            Player::Green => Player::Blue,
            Player::Blue => Player::Red,
        }
    }
}

/// A tile resource type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Resource {
    Camp,
    Field,
    Forest,
    Hill,
    Mountain,
    Pasture,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Camp,
        Resource::Field,
        Resource::Forest,
        Resource::Hill,
        Resource::Mountain,
        Resource::Pasture,
    ];
}

/// A mesh vertex. The settlement marker is monotonic: it moves from `None`
/// to `Some(player)` once and never reverts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intersection {
    pub id: VertexId,
    pub coord: Coord,
    /// One of the half-edges whose origin is this vertex.
    pub incident_edge: EdgeId,
    pub settlement: Option<Player>,
}

/// A half-edge. `next`/`prev` chain the 6-cycle bounding its tile; `twin`
/// is the oppositely oriented half-edge of the adjacent tile, unresolved
/// until that tile is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub origin: VertexId,
    pub orientation: Orientation,
    pub next: EdgeId,
    pub prev: EdgeId,
    pub twin: Option<EdgeId>,
    /// The tile this half-edge bounds.
    pub tile: TileId,
    pub road: Option<Player>,
}

/// A hex tile. Identified by its first generated half-edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    /// First half-edge of the boundary 6-cycle.
    pub first_edge: EdgeId,
    pub resource: Resource,
    pub roll_number: i32,
}

/// The full mesh aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub intersections: BTreeMap<VertexId, Intersection>,
    pub edges: BTreeMap<EdgeId, Edge>,
    pub tiles: BTreeMap<TileId, Tile>,
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn intersection(&self, id: VertexId) -> Option<&Intersection> {
        self.intersections.get(&id)
    }

    pub fn intersection_mut(&mut self, id: VertexId) -> Option<&mut Intersection> {
        self.intersections.get_mut(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn edge_mut(&mut self, id: EdgeId) -> Option<&mut Edge> {
        self.edges.get_mut(&id)
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(&id)
    }

    /// The settlement marker at a vertex, treating a missing vertex as
    /// unmarked.
    pub fn settlement_at(&self, vertex: VertexId) -> Option<Player> {
        self.intersection(vertex).and_then(|i| i.settlement)
    }

    /// The road marker on an edge, treating a missing edge as unmarked.
    pub fn road_at(&self, edge: Option<EdgeId>) -> Option<Player> {
        edge.and_then(|id| self.edge(id)).and_then(|e| e.road)
    }

    /// Verifies the structural invariants of the mesh:
    /// every edge's next/prev links are mutual and form closed 6-cycles,
    /// every resolved twin is symmetric, every tile's boundary references
    /// the tile, and every intersection's incident edge originates there.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (id, e) in &self.edges {
            let next = self
                .edge(e.next)
                .ok_or_else(|| format!("edge {id}: dangling next {}", e.next))?;
            if next.prev != *id {
                return Err(format!("edge {id}: next.prev is {}", next.prev));
            }
            let prev = self
                .edge(e.prev)
                .ok_or_else(|| format!("edge {id}: dangling prev {}", e.prev))?;
            if prev.next != *id {
                return Err(format!("edge {id}: prev.next is {}", prev.next));
            }
            if let Some(tid) = e.twin {
                let twin = self
                    .edge(tid)
                    .ok_or_else(|| format!("edge {id}: dangling twin {tid}"))?;
                if twin.twin != Some(*id) {
                    return Err(format!("edge {id}: twin {tid} does not point back"));
                }
                if twin.orientation != e.orientation.opposite() {
                    return Err(format!("edge {id}: twin {tid} has same-side orientation"));
                }
            }
            // The boundary cycle must close after exactly six hops.
            let mut cursor = e.next;
            for _ in 0..5 {
                cursor = self
                    .edge(cursor)
                    .ok_or_else(|| format!("edge {id}: broken boundary cycle"))?
                    .next;
            }
            if cursor != *id {
                return Err(format!("edge {id}: boundary cycle does not close in 6"));
            }
        }

        for (id, t) in &self.tiles {
            let mut cursor = t.first_edge;
            for _ in 0..6 {
                let e = self
                    .edge(cursor)
                    .ok_or_else(|| format!("tile {id}: dangling boundary edge {cursor}"))?;
                if e.tile != *id {
                    return Err(format!("tile {id}: boundary edge {cursor} references {}", e.tile));
                }
                cursor = e.next;
            }
        }

        for (id, i) in &self.intersections {
            let e = self
                .edge(i.incident_edge)
                .ok_or_else(|| format!("intersection {id}: dangling incident edge"))?;
            if e.origin != *id {
                return Err(format!(
                    "intersection {id}: incident edge originates at {}",
                    e.origin
                ));
            }
        }

        Ok(())
    }
}
