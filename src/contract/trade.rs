//! Trade handling.
//!
//! A trade moves `amount` of one resource from source to dest; a negative
//! amount reverses the flow, which is how a "request" is expressed. The
//! zero-sum postcondition rejects any trade that would leave either party
//! negative.

use crate::board::{Player, Resource};
use crate::contract::state::{GameData, Phase};
use crate::error::ContractError;

pub(crate) fn apply(
    data: &mut GameData,
    creator: &[u8],
    source: Player,
    dest: Player,
    resource: Resource,
    amount: i32,
) -> Result<(), ContractError> {
    assert_precondition(data, creator, source)?;

    data.profile_mut(source)?.debit(resource, amount);
    data.profile_mut(dest)?.credit(resource, amount);

    assert_postcondition(data, source, dest, resource)
}

/// The trade must happen in the source player's trade phase, and the
/// transaction creator must be the source.
fn assert_precondition(
    data: &GameData,
    creator: &[u8],
    source: Player,
) -> Result<(), ContractError> {
    let player = data.resolve_creator(creator)?;
    if player != source {
        return Err(ContractError::CreatorMismatch {
            creator: player,
            named: source,
        });
    }
    match data.phase {
        Phase::Trade(p) if p == player => Ok(()),
        got => Err(ContractError::PhaseMismatch {
            expected: Phase::Trade(player),
            got,
        }),
    }
}

/// Neither acting party may end the trade with a negative amount.
fn assert_postcondition(
    data: &GameData,
    source: Player,
    dest: Player,
    resource: Resource,
) -> Result<(), ContractError> {
    for player in [source, dest] {
        let available = data.profile(player)?.resource(resource);
        if available < 0 {
            return Err(ContractError::ResourceOverdraw {
                player,
                resource,
                available,
            });
        }
    }
    Ok(())
}
