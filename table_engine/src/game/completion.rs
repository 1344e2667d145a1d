//! Deciding when a betting round is closed.

use super::entities::{Player, TableState};

/// Return whether the action in the current betting round is closed.
///
/// The round is over when at most one player still has a claim on the
/// pot, or when every such player is all-in or has matched the table bet,
/// every player who can still act has acted, and the last aggressor (if
/// they aren't all-in) has acted too.
///
/// All-in players are never required to act. Waiting on one that went
/// all-in during an earlier round makes the remaining players pass the
/// turn back and forth forever.
#[must_use]
pub fn is_round_complete(players: &[Player], table: &TableState) -> bool {
    let contenders: Vec<&Player> = players.iter().filter(|player| player.is_in_hand()).collect();
    if contenders.len() <= 1 {
        return true;
    }

    let bets_settled = contenders
        .iter()
        .all(|player| player.is_all_in() || player.current_bet >= table.current_bet);
    let everyone_acted = contenders
        .iter()
        .filter(|player| player.can_act())
        .all(|player| table.has_acted(player.id));
    let aggressor_acted = table.last_aggressor_id.is_none_or(|aggressor_id| {
        players
            .iter()
            .find(|player| player.id == aggressor_id)
            .is_none_or(|aggressor| aggressor.is_all_in() || table.has_acted(aggressor_id))
    });

    bets_settled && everyone_acted && aggressor_acted
}

/// Return whether nobody left in the hand can put in another chip.
///
/// This is stricter than "only one player can act": a single player with
/// chips facing all-ins still has to be offered the call or fold before
/// the hand goes to showdown.
#[must_use]
pub fn are_all_capped_or_folded(players: &[Player]) -> bool {
    !players
        .iter()
        .filter(|player| player.is_in_hand())
        .any(|player| player.balance > 0 && !player.is_all_in())
}
