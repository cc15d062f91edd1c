//! Development (build) handling.
//!
//! Placement legality is decided by structural predicates over the mesh:
//! the road connectivity rule and the settlement distance rule. Costs and
//! building counters are checked before anything is marked, so a rejected
//! build mutates nothing.

use crate::board::{Board, EdgeId, Player, Resource, VertexId};
use crate::contract::state::{GameData, Phase, PlayerProfile};
use crate::contract::tx::BuildPayload;
use crate::error::ContractError;

const ROAD_COST: [Resource; 2] = [Resource::Hill, Resource::Forest];
const ROAD_POINTS: i32 = 1;
const SETTLEMENT_POINTS: i32 = 2;

pub(crate) fn apply(
    data: &mut GameData,
    creator: &[u8],
    build: &BuildPayload,
) -> Result<(), ContractError> {
    let player = data.resolve_creator(creator)?;
    match data.phase {
        Phase::Dev(p) if p == player => {}
        got => {
            return Err(ContractError::PhaseMismatch {
                expected: Phase::Dev(player),
                got,
            })
        }
    }
    if build.player() != player {
        return Err(ContractError::CreatorMismatch {
            creator: player,
            named: build.player(),
        });
    }

    match *build {
        BuildPayload::Road { edge, .. } => build_road(data, player, edge),
        BuildPayload::Settlement { vertex, .. } => build_settlement(data, player, vertex),
    }
}

/// Road connectivity rule: the target edge must be road-less, and the new
/// road must touch existing infrastructure of the builder -- a settlement
/// on either endpoint intersection, or one of the up-to-four roads
/// structurally adjacent through `next`, `prev`, and the twin's
/// `next`/`prev`. A boundary edge without a twin simply has fewer
/// adjacencies.
pub fn can_build_road(board: &Board, player: Player, edge: EdgeId) -> Result<(), ContractError> {
    let e = board.edge(edge).ok_or(ContractError::MissingEdge(edge))?;
    if e.road.is_some() {
        return Err(ContractError::IllegalRoadPlacement {
            player,
            edge,
            reason: "edge already carries a road",
        });
    }

    let next = board.edge(e.next).ok_or(ContractError::MissingEdge(e.next))?;
    let endpoint_settlements = [
        board.settlement_at(e.origin),
        board.settlement_at(next.origin),
    ];

    let twin = e.twin.and_then(|t| board.edge(t));
    let adjacent_roads = [
        next.road,
        board.road_at(Some(e.prev)),
        board.road_at(twin.map(|t| t.prev)),
        board.road_at(twin.map(|t| t.next)),
    ];

    if endpoint_settlements.contains(&Some(player)) || adjacent_roads.contains(&Some(player)) {
        Ok(())
    } else {
        Err(ContractError::IllegalRoadPlacement {
            player,
            edge,
            reason: "no adjoining road or settlement of the builder",
        })
    }
}

/// Distance rule: the target intersection and its three structurally
/// nearest neighbours (via the incident edge's `next`, `prev`, and the
/// twin's `next.next`) must all be unsettled.
pub fn can_build_settlement(board: &Board, vertex: VertexId) -> Result<(), ContractError> {
    let i = board
        .intersection(vertex)
        .ok_or(ContractError::MissingIntersection(vertex))?;
    if i.settlement.is_some() {
        return Err(ContractError::IllegalSettlePlacement {
            vertex,
            reason: "intersection already settled",
        });
    }

    let ie = board
        .edge(i.incident_edge)
        .ok_or(ContractError::MissingEdge(i.incident_edge))?;
    let mut neighbours = [None, None, None];
    neighbours[0] = Some(
        board
            .edge(ie.next)
            .ok_or(ContractError::MissingEdge(ie.next))?
            .origin,
    );
    neighbours[1] = Some(
        board
            .edge(ie.prev)
            .ok_or(ContractError::MissingEdge(ie.prev))?
            .origin,
    );
    if let Some(twin) = ie.twin.and_then(|t| board.edge(t)) {
        if let Some(tn) = board.edge(twin.next) {
            neighbours[2] = board.edge(tn.next).map(|e| e.origin);
        }
    }

    for n in neighbours.into_iter().flatten() {
        if board.settlement_at(n).is_some() {
            return Err(ContractError::IllegalSettlePlacement {
                vertex,
                reason: "a neighbouring intersection is already settled",
            });
        }
    }
    Ok(())
}

fn build_road(data: &mut GameData, player: Player, edge: EdgeId) -> Result<(), ContractError> {
    can_build_road(&data.board, player, edge)?;

    let profile = data.profile_mut(player)?;
    if profile.roads <= 0 {
        return Err(ContractError::NoBuildingsLeft { player, kind: "road" });
    }
    pay(profile, player, &ROAD_COST.map(|r| (r, 1)))?;
    profile.roads -= 1;
    profile.winning_points += ROAD_POINTS;

    let e = data
        .board
        .edge_mut(edge)
        .ok_or(ContractError::MissingEdge(edge))?;
    e.road = Some(player);
    Ok(())
}

fn build_settlement(
    data: &mut GameData,
    player: Player,
    vertex: VertexId,
) -> Result<(), ContractError> {
    can_build_settlement(&data.board, vertex)?;

    let profile = data.profile_mut(player)?;
    if profile.settlements <= 0 {
        return Err(ContractError::NoBuildingsLeft {
            player,
            kind: "settlement",
        });
    }
    pay(profile, player, &Resource::ALL.map(|r| (r, 1)))?;
    profile.settlements -= 1;
    profile.winning_points += SETTLEMENT_POINTS;

    let i = data
        .board
        .intersection_mut(vertex)
        .ok_or(ContractError::MissingIntersection(vertex))?;
    i.settlement = Some(player);
    Ok(())
}

/// Verifies the full cost is covered before debiting anything.
fn pay(
    profile: &mut PlayerProfile,
    player: Player,
    costs: &[(Resource, i32)],
) -> Result<(), ContractError> {
    for &(resource, needed) in costs {
        let available = profile.resource(resource);
        if available < needed {
            return Err(ContractError::InsufficientResources {
                player,
                resource,
                needed,
                available,
            });
        }
    }
    for &(resource, needed) in costs {
        profile.debit(resource, needed);
    }
    Ok(())
}
