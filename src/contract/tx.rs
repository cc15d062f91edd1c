//! Transaction argument types.
//!
//! The discriminated union delivered by the host transport: a type tag
//! plus a typed payload, serialized as externally tagged JSON. `Battle`
//! is carried for wire compatibility but rejected by the state machine.

use serde::{Deserialize, Serialize};

use crate::board::{EdgeId, Player, Resource, VertexId};
use crate::error::ContractError;

/// A game-contract transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrxArgs {
    Join {
        player: Player,
    },
    Roll,
    Next,
    Trade {
        source: Player,
        dest: Player,
        resource: Resource,
        amount: i32,
    },
    Dev {
        build: BuildPayload,
    },
    Battle,
}

impl TrxArgs {
    pub const fn kind(&self) -> &'static str {
        match self {
            TrxArgs::Join { .. } => "join",
            TrxArgs::Roll => "roll",
            TrxArgs::Next => "next",
            TrxArgs::Trade { .. } => "trade",
            TrxArgs::Dev { .. } => "dev",
            TrxArgs::Battle => "battle",
        }
    }
}

/// The build request carried by a `Dev` transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildPayload {
    Road { player: Player, edge: EdgeId },
    Settlement { player: Player, vertex: VertexId },
}

impl BuildPayload {
    /// The player the payload claims to act for; must match the resolved
    /// transaction creator.
    pub const fn player(&self) -> Player {
        match self {
            BuildPayload::Road { player, .. } | BuildPayload::Settlement { player, .. } => *player,
        }
    }
}

/// Decodes transaction bytes delivered by the host.
pub fn decode(bytes: &[u8]) -> Result<TrxArgs, ContractError> {
    serde_json::from_slice(bytes).map_err(|e| ContractError::Decode(e.to_string()))
}
