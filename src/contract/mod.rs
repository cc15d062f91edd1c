//! Transaction handling for the game contract.
//!
//! The ledger stores one serialized [`state::GameData`] aggregate under a
//! fixed key. Every transaction loads it, validates against the current
//! [`state::Phase`], applies its effect to the in-memory copy, and persists
//! the copy only on success.

pub mod build;
pub mod machine;
pub mod state;
pub mod trade;
pub mod tx;

pub use build::{can_build_road, can_build_settlement};
pub use machine::{handle_init, handle_invoke, load_game, CONTRACT_STATE_KEY};
pub use state::{GameData, Phase, PlayerProfile, STARTING_RESOURCES, WIN_THRESHOLD};
pub use tx::{decode, BuildPayload, TrxArgs};
