//! Error taxonomy for the contract core.
//!
//! Every validation failure is detected before any persisted mutation, so
//! rejection is always safe to discard; nothing here is retried internally.

use thiserror::Error;

use crate::board::{BoardError, EdgeId, Player, Resource, VertexId};
use crate::contract::state::Phase;
use crate::ledger::StorageError;

/// Errors surfaced by the game and alliance contract handlers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("malformed transaction payload: {0}")]
    Decode(String),

    #[error("could not serialize contract state: {0}")]
    Encode(String),

    #[error("unsupported transaction type '{0}'")]
    Unsupported(&'static str),

    #[error("expected phase {expected:?}, got {got:?}")]
    PhaseMismatch { expected: Phase, got: Phase },

    #[error("a '{tx}' transaction cannot advance phase {phase:?}")]
    InvalidTransition { phase: Phase, tx: &'static str },

    #[error("player slot {0:?} already taken")]
    SlotTaken(Player),

    #[error("creator signature does not match any joined player")]
    UnknownSigner,

    #[error("transaction creator is {creator:?} but payload names {named:?}")]
    CreatorMismatch { creator: Player, named: Player },

    #[error("no profile for player {0:?}")]
    UnknownPlayer(Player),

    #[error("{player:?} lacks {resource:?}: needs {needed}, has {available}")]
    InsufficientResources {
        player: Player,
        resource: Resource,
        needed: i32,
        available: i32,
    },

    #[error("{player:?} would hold {available} {resource:?} after the trade")]
    ResourceOverdraw {
        player: Player,
        resource: Resource,
        available: i32,
    },

    #[error("{player:?} has no {kind} pieces left")]
    NoBuildingsLeft { player: Player, kind: &'static str },

    #[error("edge {0} is not on the board")]
    MissingEdge(EdgeId),

    #[error("intersection {0} is not on the board")]
    MissingIntersection(VertexId),

    #[error("{player:?} cannot build a road on edge {edge}: {reason}")]
    IllegalRoadPlacement {
        player: Player,
        edge: EdgeId,
        reason: &'static str,
    },

    #[error("cannot build a settlement on intersection {vertex}: {reason}")]
    IllegalSettlePlacement {
        vertex: VertexId,
        reason: &'static str,
    },

    #[error("board generation failed: {0}")]
    Board(#[from] BoardError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
