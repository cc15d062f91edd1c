//! Game-state types: phase, player profiles, and the contract aggregate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Player, Resource};
use crate::error::ContractError;

/// Winning points must strictly exceed this to win.
pub const WIN_THRESHOLD: i32 = 10;

/// Starting inventory per player.
pub const STARTING_RESOURCES: i32 = 5;
pub const STARTING_SETTLEMENTS: i32 = 2;
pub const STARTING_ROADS: i32 = 2;

/// The turn/sub-turn state of the game, shared by all players.
///
/// `Joining` is initial; `Won` is terminal. In between, phases cycle
/// roll -> trade -> dev per player in the fixed rotation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Phase {
    Joining,
    Roll(Player),
    Trade(Player),
    Dev(Player),
    Won(Player),
}

impl Phase {
    /// The player whose sub-turn this is, if the game is underway.
    pub const fn turn_of(self) -> Option<Player> {
        match self {
            Phase::Joining => None,
            Phase::Roll(p) | Phase::Trade(p) | Phase::Dev(p) | Phase::Won(p) => Some(p),
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Phase::Won(_))
    }
}

/// Per-player inventory, remaining buildings, and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub resources: BTreeMap<Resource, i32>,
    pub settlements: i32,
    pub roads: i32,
    pub winning_points: i32,
}

impl PlayerProfile {
    /// The inventory a player starts with on joining.
    pub fn starting() -> Self {
        let resources = Resource::ALL
            .iter()
            .map(|&r| (r, STARTING_RESOURCES))
            .collect();
        PlayerProfile {
            resources,
            settlements: STARTING_SETTLEMENTS,
            roads: STARTING_ROADS,
            winning_points: 0,
        }
    }

    pub fn resource(&self, r: Resource) -> i32 {
        self.resources.get(&r).copied().unwrap_or(0)
    }

    /// Saturating: a wire amount large enough to overflow pins the balance
    /// at the i32 extreme, where the non-negative floor checks reject it.
    pub fn credit(&mut self, r: Resource, amount: i32) {
        let slot = self.resources.entry(r).or_insert(0);
        *slot = slot.saturating_add(amount);
    }

    pub fn debit(&mut self, r: Resource, amount: i32) {
        let slot = self.resources.entry(r).or_insert(0);
        *slot = slot.saturating_sub(amount);
    }

    pub fn has_won(&self) -> bool {
        self.winning_points > WIN_THRESHOLD
    }
}

/// The full per-contract aggregate: the single unit of ledger storage
/// read, modified, and written by every game transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameData {
    pub board: Board,
    pub profiles: BTreeMap<Player, PlayerProfile>,
    /// Submitted identity per slot; first writer wins, then authenticates
    /// every later action from that slot.
    pub identities: BTreeMap<Player, Vec<u8>>,
    /// Creation transaction id; also the source of the board seed.
    pub contract_uuid: String,
    pub phase: Phase,
}

impl GameData {
    pub fn profile(&self, player: Player) -> Result<&PlayerProfile, ContractError> {
        self.profiles
            .get(&player)
            .ok_or(ContractError::UnknownPlayer(player))
    }

    pub fn profile_mut(&mut self, player: Player) -> Result<&mut PlayerProfile, ContractError> {
        self.profiles
            .get_mut(&player)
            .ok_or(ContractError::UnknownPlayer(player))
    }

    /// Resolves the transaction creator by reverse lookup of its credential
    /// in the identity map. No match is a rejection.
    pub fn resolve_creator(&self, creator: &[u8]) -> Result<Player, ContractError> {
        self.identities
            .iter()
            .find(|(_, sign)| sign.as_slice() == creator)
            .map(|(&p, _)| p)
            .ok_or(ContractError::UnknownSigner)
    }
}
