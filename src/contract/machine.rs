//! The transaction state machine.
//!
//! Entry points mirror the host contract surface: `handle_init` builds the
//! initial aggregate exactly once, `handle_invoke` applies one transaction
//! to completion. Handlers validate against the loaded aggregate, mutate a
//! working copy, and persist only on success, so a rejected transaction
//! leaves no residual state.

use tracing::{debug, info};

use crate::board::{seed_from_bytes, Board, Player, DEFAULT_RING_COUNT};
use crate::contract::state::{GameData, Phase, PlayerProfile};
use crate::contract::tx::TrxArgs;
use crate::contract::{build, trade};
use crate::error::ContractError;
use crate::ledger::Ledger;

/// Ledger key of the game aggregate.
pub const CONTRACT_STATE_KEY: &str = "contract.hexfab.game";

/// Creates the initial aggregate: a freshly generated board in `Joining`.
///
/// The board seed derives from the creation transaction id, so every
/// executor replaying init produces the identical board, roll numbers
/// included.
pub fn handle_init(ledger: &mut dyn Ledger, tx_id: &str) -> Result<GameData, ContractError> {
    let seed = seed_from_bytes(tx_id.as_bytes());
    let board = Board::generate(DEFAULT_RING_COUNT, seed)?;

    let data = GameData {
        board,
        profiles: Default::default(),
        identities: Default::default(),
        contract_uuid: tx_id.to_string(),
        phase: Phase::Joining,
    };
    store_game(ledger, &data)?;

    info!(uuid = tx_id, "initialized game contract");
    Ok(data)
}

/// Applies one transaction: decode has already happened at the transport
/// edge, so this loads the aggregate, dispatches on the type tag, computes
/// the next phase, and persists the result.
pub fn handle_invoke(
    ledger: &mut dyn Ledger,
    creator: &[u8],
    args: &TrxArgs,
) -> Result<GameData, ContractError> {
    let mut data = load_game(ledger)?;
    debug!(phase = ?data.phase, tx = args.kind(), "handling transaction");

    match args {
        TrxArgs::Join { player } => handle_join(&mut data, creator, *player)?,
        TrxArgs::Roll => {
            // Dice resolution belongs to the host; only the turn gate applies.
            assert_roll_turn(&data, creator)?;
        }
        TrxArgs::Next => assert_next_turn(&data, creator)?,
        TrxArgs::Trade {
            source,
            dest,
            resource,
            amount,
        } => trade::apply(&mut data, creator, *source, *dest, *resource, *amount)?,
        TrxArgs::Dev { build } => build::apply(&mut data, creator, build)?,
        TrxArgs::Battle => return Err(ContractError::Unsupported("battle")),
    }

    data.phase = next_phase(&data, args)?;
    store_game(ledger, &data)?;
    debug!(phase = ?data.phase, "transaction applied");
    Ok(data)
}

/// Loads the game aggregate from the ledger.
pub fn load_game(ledger: &dyn Ledger) -> Result<GameData, ContractError> {
    let bytes = ledger.get(CONTRACT_STATE_KEY)?;
    serde_json::from_slice(&bytes).map_err(|e| ContractError::Decode(e.to_string()))
}

pub(crate) fn store_game(ledger: &mut dyn Ledger, data: &GameData) -> Result<(), ContractError> {
    let bytes = serde_json::to_vec(data).map_err(|e| ContractError::Encode(e.to_string()))?;
    ledger.put(CONTRACT_STATE_KEY, bytes)?;
    Ok(())
}

fn handle_join(data: &mut GameData, creator: &[u8], player: Player) -> Result<(), ContractError> {
    if data.phase != Phase::Joining {
        return Err(ContractError::PhaseMismatch {
            expected: Phase::Joining,
            got: data.phase,
        });
    }
    if data.profiles.contains_key(&player) {
        return Err(ContractError::SlotTaken(player));
    }

    // The slot is vacant past the guard; this identity authenticates
    // every later action from it.
    data.identities.insert(player, creator.to_vec());
    data.profiles.insert(player, PlayerProfile::starting());
    info!(?player, "player joined");
    Ok(())
}

fn assert_roll_turn(data: &GameData, creator: &[u8]) -> Result<(), ContractError> {
    let player = data.resolve_creator(creator)?;
    match data.phase {
        Phase::Roll(p) if p == player => Ok(()),
        got => Err(ContractError::PhaseMismatch {
            expected: Phase::Roll(player),
            got,
        }),
    }
}

fn assert_next_turn(data: &GameData, creator: &[u8]) -> Result<(), ContractError> {
    let player = data.resolve_creator(creator)?;
    match data.phase {
        Phase::Trade(p) | Phase::Dev(p) if p == player => Ok(()),
        got => Err(ContractError::InvalidTransition { phase: got, tx: "next" }),
    }
}

/// Computes the phase after a successfully applied transaction.
///
/// Flow per player `p` in rotation: `Roll(p)` -roll-> `Trade(p)` -next->
/// `Dev(p)` -next-> `Roll(p.next())`, or `Won(p)` when leaving `Dev(p)`
/// with more than the threshold points. Trades and builds keep the phase.
fn next_phase(data: &GameData, args: &TrxArgs) -> Result<Phase, ContractError> {
    let phase = data.phase;
    match args {
        TrxArgs::Join { .. } => {
            if data.profiles.len() == Player::ALL.len() {
                Ok(Phase::Roll(Player::Red))
            } else {
                Ok(Phase::Joining)
            }
        }
        TrxArgs::Roll => match phase {
            Phase::Roll(p) => Ok(Phase::Trade(p)),
            _ => Err(ContractError::InvalidTransition { phase, tx: "roll" }),
        },
        TrxArgs::Next => match phase {
            Phase::Trade(p) => Ok(Phase::Dev(p)),
            Phase::Dev(p) => {
                if data.profile(p)?.has_won() {
                    Ok(Phase::Won(p))
                } else {
                    Ok(Phase::Roll(p.next()))
                }
            }
            _ => Err(ContractError::InvalidTransition { phase, tx: "next" }),
        },
        TrxArgs::Trade { .. } | TrxArgs::Dev { .. } | TrxArgs::Battle => Ok(phase),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    fn sign(p: Player) -> &'static [u8] {
        match p {
            Player::Red => b"sig-red",
            Player::Green => b"sig-green",
            Player::Blue => b"sig-blue",
        }
    }

    fn init_ledger() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        handle_init(&mut ledger, "tx-0").unwrap();
        ledger
    }

    fn join_all(ledger: &mut MemoryLedger) {
        for p in Player::ALL {
            handle_invoke(ledger, sign(p), &TrxArgs::Join { player: p }).unwrap();
        }
    }

    #[test]
    fn init_creates_joining_aggregate() {
        let ledger = init_ledger();
        let data = load_game(&ledger).unwrap();
        assert_eq!(data.phase, Phase::Joining);
        assert_eq!(data.board.tiles.len(), 19);
        assert!(data.profiles.is_empty());
        assert_eq!(data.contract_uuid, "tx-0");
    }

    #[test]
    fn init_is_replay_deterministic() {
        let a = init_ledger();
        let b = init_ledger();
        assert_eq!(
            a.get(CONTRACT_STATE_KEY).unwrap(),
            b.get(CONTRACT_STATE_KEY).unwrap()
        );
    }

    #[test]
    fn creation_tx_does_not_affect_topology() {
        let mut a = MemoryLedger::new();
        let mut b = MemoryLedger::new();
        let board_a = handle_init(&mut a, "tx-a").unwrap().board;
        let board_b = handle_init(&mut b, "tx-b").unwrap().board;
        // Same topology either way.
        assert_eq!(
            board_a.tiles.keys().collect::<Vec<_>>(),
            board_b.tiles.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn single_join_stays_joining() {
        let mut ledger = init_ledger();
        let data = handle_invoke(
            &mut ledger,
            sign(Player::Red),
            &TrxArgs::Join { player: Player::Red },
        )
        .unwrap();
        assert_eq!(data.phase, Phase::Joining);
        assert_eq!(data.identities[&Player::Red], sign(Player::Red));
        assert!(data.profiles.contains_key(&Player::Red));
    }

    #[test]
    fn three_joins_reach_red_roll() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        assert_eq!(load_game(&ledger).unwrap().phase, Phase::Roll(Player::Red));
    }

    #[test]
    fn repeat_color_join_rejected() {
        let mut ledger = init_ledger();
        handle_invoke(
            &mut ledger,
            sign(Player::Red),
            &TrxArgs::Join { player: Player::Red },
        )
        .unwrap();
        let err = handle_invoke(
            &mut ledger,
            b"someone-else",
            &TrxArgs::Join { player: Player::Red },
        )
        .unwrap_err();
        assert_eq!(err, ContractError::SlotTaken(Player::Red));
        // The rejected join leaves the first identity in charge of the slot.
        let data = load_game(&ledger).unwrap();
        assert_eq!(data.identities[&Player::Red], sign(Player::Red));
        assert!(data.resolve_creator(b"someone-else").is_err());
    }

    #[test]
    fn fourth_identity_join_rejected() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let err = handle_invoke(
            &mut ledger,
            b"latecomer",
            &TrxArgs::Join { player: Player::Red },
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::PhaseMismatch { .. }));
    }

    #[test]
    fn roll_advances_to_trade() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let data = handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Roll).unwrap();
        assert_eq!(data.phase, Phase::Trade(Player::Red));
    }

    #[test]
    fn roll_out_of_turn_rejected() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let before = ledger.get(CONTRACT_STATE_KEY).unwrap();
        let err = handle_invoke(&mut ledger, sign(Player::Green), &TrxArgs::Roll).unwrap_err();
        assert!(matches!(err, ContractError::PhaseMismatch { .. }));
        assert_eq!(ledger.get(CONTRACT_STATE_KEY).unwrap(), before);
    }

    #[test]
    fn next_walks_trade_dev_then_rotates() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Roll).unwrap();
        let data = handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Next).unwrap();
        assert_eq!(data.phase, Phase::Dev(Player::Red));
        let data = handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Next).unwrap();
        assert_eq!(data.phase, Phase::Roll(Player::Green));
    }

    #[test]
    fn next_from_roll_rejected() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let err = handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Next).unwrap_err();
        assert!(matches!(err, ContractError::InvalidTransition { .. }));
    }

    #[test]
    fn leaving_dev_with_enough_points_wins() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let mut data = load_game(&ledger).unwrap();
        data.profiles.get_mut(&Player::Red).unwrap().winning_points = 11;
        store_game(&mut ledger, &data).unwrap();

        handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Roll).unwrap();
        handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Next).unwrap();
        let data = handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Next).unwrap();
        assert_eq!(data.phase, Phase::Won(Player::Red));
    }

    #[test]
    fn won_phase_is_terminal() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let mut data = load_game(&ledger).unwrap();
        data.phase = Phase::Won(Player::Red);
        store_game(&mut ledger, &data).unwrap();

        for args in [TrxArgs::Roll, TrxArgs::Next, TrxArgs::Join { player: Player::Red }] {
            assert!(handle_invoke(&mut ledger, sign(Player::Red), &args).is_err());
        }
    }

    #[test]
    fn battle_is_unsupported() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let err = handle_invoke(&mut ledger, sign(Player::Red), &TrxArgs::Battle).unwrap_err();
        assert_eq!(err, ContractError::Unsupported("battle"));
    }

    #[test]
    fn unknown_signer_rejected() {
        let mut ledger = init_ledger();
        join_all(&mut ledger);
        let err = handle_invoke(&mut ledger, b"stranger", &TrxArgs::Roll).unwrap_err();
        assert_eq!(err, ContractError::UnknownSigner);
    }

    #[test]
    fn identical_transactions_replay_byte_identically() {
        let mut a = init_ledger();
        let mut b = init_ledger();
        for ledger in [&mut a, &mut b] {
            join_all(ledger);
            handle_invoke(ledger, sign(Player::Red), &TrxArgs::Roll).unwrap();
        }
        assert_eq!(
            a.get(CONTRACT_STATE_KEY).unwrap(),
            b.get(CONTRACT_STATE_KEY).unwrap()
        );
    }
}
