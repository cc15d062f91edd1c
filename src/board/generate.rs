//! Board generation.
//!
//! Builds the hex mesh from a single seed face: each face synthesizes its
//! six (vertex, half-edge) pairs by walking `step`, reusing vertices whose
//! coordinate hash already exists, then resolves twin links against the
//! faces generated so far. Expansion passes scan the twinless frontier in
//! ascending edge-id order, so attribute assignment is deterministic.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use thiserror::Error;

use super::coord::{edge_id, step, vertex_id, Coord, EdgeId, Orientation};
use super::mesh::{Board, Edge, Intersection, Resource, Tile};

/// Ring count of the standard board: a seed tile plus two expansion passes.
pub const DEFAULT_RING_COUNT: u32 = 2;

/// Errors raised while generating a board.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("tile attribute multisets exhausted after {0} tiles; ring count too large")]
    AttributesExhausted(usize),

    #[error("broken mesh reference at edge {0}")]
    BrokenReference(EdgeId),
}

/// The fixed tile-attribute multisets, drawn without replacement.
///
/// Resources: ten of each of the six types, popped in fixed order. Roll
/// numbers: five shuffled permutations of 2..=11, shuffled with a seeded
/// RNG so every executor draws the same sequence.
struct TileAttributes {
    resources: Vec<Resource>,
    rolls: Vec<i32>,
}

impl TileAttributes {
    fn new(seed: u64) -> Self {
        let mut resources = Vec::with_capacity(60);
        for _ in 0..10 {
            resources.extend(Resource::ALL);
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let mut rolls = Vec::with_capacity(50);
        for _ in 0..5 {
            let mut round: Vec<i32> = (2..=11).collect();
            round.shuffle(&mut rng);
            rolls.extend(round);
        }

        TileAttributes { resources, rolls }
    }

    fn pop(&mut self) -> Option<(Resource, i32)> {
        Some((self.resources.pop()?, self.rolls.pop()?))
    }
}

impl Board {
    /// Generates a board with `ring_count` expansion passes around the
    /// seed face at the origin. Deterministic given (`ring_count`, `seed`).
    pub fn generate(ring_count: u32, seed: u64) -> Result<Board, BoardError> {
        let mut board = Board::new();
        let mut attrs = TileAttributes::new(seed);

        generate_tile(&mut board, Coord::new(0, 0), Orientation::North, &mut attrs)?;
        for _ in 0..ring_count {
            expand(&mut board, &mut attrs)?;
        }

        Ok(board)
    }
}

/// Generates one face whose first half-edge starts at `c0` with
/// orientation `o0`, links its boundary cycle, and resolves twins.
fn generate_tile(
    board: &mut Board,
    c0: Coord,
    o0: Orientation,
    attrs: &mut TileAttributes,
) -> Result<(), BoardError> {
    let (resource, roll_number) = attrs
        .pop()
        .ok_or(BoardError::AttributesExhausted(board.tiles.len()))?;

    let tile_id = edge_id(c0, o0);
    let mut cycle = [0 as EdgeId; 6];
    let (mut c, mut o) = (c0, o0);
    for slot in &mut cycle {
        let vid = vertex_id(c);
        let eid = edge_id(c, o);
        // Revisited vertices are shared between faces, never duplicated.
        board
            .intersections
            .entry(vid)
            .or_insert_with(|| Intersection {
                id: vid,
                coord: c,
                incident_edge: eid,
                settlement: None,
            });
        board.edges.insert(
            eid,
            Edge {
                id: eid,
                origin: vid,
                orientation: o,
                next: 0,
                prev: 0,
                twin: None,
                tile: tile_id,
                road: None,
            },
        );
        *slot = eid;
        (c, o) = step(c, o);
    }

    for k in 0..6 {
        let e = board
            .edge_mut(cycle[k])
            .ok_or(BoardError::BrokenReference(cycle[k]))?;
        e.next = cycle[(k + 1) % 6];
        e.prev = cycle[(k + 5) % 6];
    }

    board.tiles.insert(
        tile_id,
        Tile {
            id: tile_id,
            first_edge: cycle[0],
            resource,
            roll_number,
        },
    );

    resolve_twins(board, &cycle)
}

/// Links each boundary edge with its twin, if the adjacent face already
/// exists: the twin originates at this edge's head vertex with the
/// opposite orientation.
fn resolve_twins(board: &mut Board, cycle: &[EdgeId; 6]) -> Result<(), BoardError> {
    for &eid in cycle {
        let e = board.edge(eid).ok_or(BoardError::BrokenReference(eid))?;
        let head = board
            .edge(e.next)
            .ok_or(BoardError::BrokenReference(e.next))?
            .origin;
        let head_coord = board
            .intersection(head)
            .ok_or(BoardError::BrokenReference(eid))?
            .coord;
        let twin_id = edge_id(head_coord, e.orientation.opposite());

        if board.edges.contains_key(&twin_id) {
            if let Some(e) = board.edge_mut(eid) {
                e.twin = Some(twin_id);
            }
            if let Some(t) = board.edge_mut(twin_id) {
                t.twin = Some(eid);
            }
        }
    }
    Ok(())
}

/// One expansion pass: generates the face across every edge that still
/// lacks a twin at the start of the pass.
fn expand(board: &mut Board, attrs: &mut TileAttributes) -> Result<(), BoardError> {
    let frontier: Vec<EdgeId> = board
        .edges
        .iter()
        .filter(|(_, e)| e.twin.is_none())
        .map(|(id, _)| *id)
        .collect();

    for eid in frontier {
        let e = board.edge(eid).ok_or(BoardError::BrokenReference(eid))?;
        // An earlier face in this pass may have resolved the twin already.
        if e.twin.is_some() {
            continue;
        }
        let head = board
            .edge(e.next)
            .ok_or(BoardError::BrokenReference(e.next))?
            .origin;
        let c = board
            .intersection(head)
            .ok_or(BoardError::BrokenReference(eid))?
            .coord;
        let o = e.orientation.opposite();

        generate_tile(board, c, o, attrs)?;
    }
    Ok(())
}
