//! Alliance side-contract.
//!
//! An alliance instance watches the transaction stream of one game. Each
//! completed game transaction forwarded to it strikes out matching terms
//! and burns lifespan; the instance settles as Completed once every term
//! has been observed, or Failed once its lifespan runs out.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Player;
use crate::contract::state::Phase;
use crate::contract::tx::TrxArgs;
use crate::error::ContractError;
use crate::ledger::Ledger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllianceState {
    Active,
    Completed,
    Failed,
}

/// One alliance instance, stored as a whole under its own ledger key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllianceData {
    pub contract_id: u32,
    pub parties: Vec<Player>,
    /// Remaining full turns before the alliance lapses.
    pub lifespan: i32,
    /// The game phase the alliance was struck in; only `Next` transactions
    /// observed in this same phase burn lifespan.
    pub start_phase: Phase,
    /// Transactions the parties promised to perform, in any order.
    pub terms: Vec<TrxArgs>,
    pub state: AllianceState,
}

/// A game transaction that committed, forwarded to the alliance watching
/// that game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrxCompleted {
    pub observer_id: u32,
    pub phase: Phase,
    pub args: TrxArgs,
}

fn storage_key(contract_id: u32) -> String {
    format!("alliance{contract_id}")
}

/// Registers a new alliance instance.
///
/// Lifespan is stored with one extra turn on top of the agreed count: the
/// forwarded `Next` that closes the turn the alliance was struck in already
/// decrements it once.
pub fn handle_init(ledger: &mut dyn Ledger, data: &AllianceData) -> Result<(), ContractError> {
    let mut stored = data.clone();
    stored.state = AllianceState::Active;
    stored.lifespan = data.lifespan + 1;

    let bytes = serde_json::to_vec(&stored)
        .map_err(|e| ContractError::Encode(e.to_string()))?;
    ledger.put(&storage_key(stored.contract_id), bytes)?;
    info!(
        contract_id = stored.contract_id,
        lifespan = stored.lifespan,
        terms = stored.terms.len(),
        "alliance registered"
    );
    Ok(())
}

/// Feeds one completed game transaction into the alliance reducer.
///
/// Every term structurally equal to the observed transaction is struck
/// out. Lifespan burns only on a `Next` observed in the alliance's start
/// phase, so one burn per full turn of the founding player. State is then
/// settled in order: Completed beats Failed when both conditions hold on
/// the same observation.
pub fn handle_invoke(
    ledger: &mut dyn Ledger,
    completed: &TrxCompleted,
) -> Result<AllianceData, ContractError> {
    let key = storage_key(completed.observer_id);
    let bytes = ledger.get(&key)?;
    let mut data: AllianceData =
        serde_json::from_slice(&bytes).map_err(|e| ContractError::Decode(e.to_string()))?;

    let before = data.terms.len();
    data.terms.retain(|term| *term != completed.args);
    if data.terms.len() != before {
        debug!(
            contract_id = data.contract_id,
            struck = before - data.terms.len(),
            remaining = data.terms.len(),
            "alliance term observed"
        );
    }

    if completed.args == TrxArgs::Next && completed.phase == data.start_phase {
        data.lifespan -= 1;
    }

    data.state = if data.terms.is_empty() {
        AllianceState::Completed
    } else if data.lifespan <= 0 {
        AllianceState::Failed
    } else {
        AllianceState::Active
    };

    let bytes = serde_json::to_vec(&data)
        .map_err(|e| ContractError::Encode(e.to_string()))?;
    ledger.put(&key, bytes)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Resource;
    use crate::ledger::MemoryLedger;

    fn term() -> TrxArgs {
        TrxArgs::Trade {
            source: Player::Red,
            dest: Player::Green,
            resource: Resource::Forest,
            amount: 2,
        }
    }

    fn alliance(lifespan: i32) -> AllianceData {
        AllianceData {
            contract_id: 7,
            parties: vec![Player::Red, Player::Green],
            lifespan,
            start_phase: Phase::Roll(Player::Red),
            terms: vec![term()],
            state: AllianceState::Active,
        }
    }

    fn observed(args: TrxArgs, phase: Phase) -> TrxCompleted {
        TrxCompleted {
            observer_id: 7,
            phase,
            args,
        }
    }

    fn load(ledger: &MemoryLedger) -> AllianceData {
        let bytes = ledger.get(&storage_key(7)).unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn init_pads_lifespan_by_one() {
        let mut ledger = MemoryLedger::new();
        handle_init(&mut ledger, &alliance(3)).unwrap();
        let stored = load(&ledger);
        assert_eq!(stored.lifespan, 4);
        assert_eq!(stored.state, AllianceState::Active);
    }

    #[test]
    fn matching_term_completes_immediately() {
        let mut ledger = MemoryLedger::new();
        handle_init(&mut ledger, &alliance(3)).unwrap();

        let data =
            handle_invoke(&mut ledger, &observed(term(), Phase::Trade(Player::Red))).unwrap();
        assert!(data.terms.is_empty());
        assert_eq!(data.state, AllianceState::Completed);
        // Persisted copy agrees with the returned one.
        assert_eq!(load(&ledger), data);
    }

    #[test]
    fn fails_after_lifespan_plus_one_advances() {
        let mut ledger = MemoryLedger::new();
        handle_init(&mut ledger, &alliance(3)).unwrap();

        // Only Next in the start phase burns lifespan; stored value is 4.
        for _ in 0..3 {
            let data =
                handle_invoke(&mut ledger, &observed(TrxArgs::Next, Phase::Roll(Player::Red)))
                    .unwrap();
            assert_eq!(data.state, AllianceState::Active);
        }
        let data =
            handle_invoke(&mut ledger, &observed(TrxArgs::Next, Phase::Roll(Player::Red)))
                .unwrap();
        assert_eq!(data.lifespan, 0);
        assert_eq!(data.state, AllianceState::Failed);
    }

    #[test]
    fn next_outside_start_phase_burns_nothing() {
        let mut ledger = MemoryLedger::new();
        handle_init(&mut ledger, &alliance(1)).unwrap();

        let data =
            handle_invoke(&mut ledger, &observed(TrxArgs::Next, Phase::Dev(Player::Blue)))
                .unwrap();
        assert_eq!(data.lifespan, 2);
        assert_eq!(data.state, AllianceState::Active);
    }

    #[test]
    fn completion_wins_over_failure_on_the_same_observation() {
        let mut ledger = MemoryLedger::new();
        let mut a = alliance(0);
        a.terms = vec![TrxArgs::Next];
        handle_init(&mut ledger, &a).unwrap();

        // Stored lifespan is 1; this Next both strikes the last term and
        // burns the final turn.
        let data =
            handle_invoke(&mut ledger, &observed(TrxArgs::Next, Phase::Roll(Player::Red)))
                .unwrap();
        assert_eq!(data.lifespan, 0);
        assert_eq!(data.state, AllianceState::Completed);
    }

    #[test]
    fn duplicate_terms_struck_together() {
        let mut ledger = MemoryLedger::new();
        let mut a = alliance(5);
        a.terms = vec![term(), term()];
        handle_init(&mut ledger, &a).unwrap();

        let data =
            handle_invoke(&mut ledger, &observed(term(), Phase::Trade(Player::Red))).unwrap();
        assert_eq!(data.state, AllianceState::Completed);
    }

    #[test]
    fn unknown_observer_reports_missing_key() {
        let mut ledger = MemoryLedger::new();
        let err = handle_invoke(
            &mut ledger,
            &observed(TrxArgs::Roll, Phase::Roll(Player::Red)),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::Storage(_)));
    }
}
