//! Splitting a hand's contributions into a main pot and side pots, and
//! paying those pots out to the winners the dealer names.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use super::entities::{Chips, Payout, Player, PlayerId, Pot, SeatIndex};

/// What one player put into the hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Contribution {
    pub player_id: PlayerId,
    pub total_contributed: Chips,
    /// Folded players contribute but can't win.
    pub is_eligible_to_win: bool,
}

impl Contribution {
    #[must_use]
    pub fn new(player_id: PlayerId, total_contributed: Chips, is_eligible_to_win: bool) -> Self {
        Self {
            player_id,
            total_contributed,
            is_eligible_to_win,
        }
    }
}

/// Build the contribution list from player snapshots.
#[must_use]
pub fn contributions_from_players(players: &[Player]) -> Vec<Contribution> {
    players
        .iter()
        .map(|player| Contribution::new(player.id, player.total_contributed, player.is_in_hand()))
        .collect()
}

/// Peel the contributions into pots, smallest stake first.
///
/// Every step takes the smallest remaining contribution `h` among the
/// players still in the pool, forms a pot of `h` times the pool size that
/// the eligible pool members can win, subtracts `h` from everyone and drops
/// whoever reached zero. The pool only shrinks, so this terminates.
///
/// A layer nobody can win (only folded players reached it) is dead money
/// and joins the pot below it. Any difference between the pots and
/// `total_pot_amount` is reconciled into the last pot.
#[must_use]
pub fn calculate_side_pots(contributions: &[Contribution], total_pot_amount: Chips) -> Vec<Pot> {
    let mut remaining: BTreeMap<PlayerId, Chips> = BTreeMap::new();
    let mut eligible: BTreeMap<PlayerId, bool> = BTreeMap::new();
    for contribution in contributions {
        *eligible.entry(contribution.player_id).or_insert(true) &= contribution.is_eligible_to_win;
        if contribution.total_contributed > 0 {
            let chips = remaining.entry(contribution.player_id).or_default();
            *chips = chips.saturating_add(contribution.total_contributed);
        }
    }

    let any_contributor_eligible = remaining.keys().any(|player_id| eligible[player_id]);
    if !any_contributor_eligible {
        let still_in = eligible
            .iter()
            .filter(|&(_, &is_eligible)| is_eligible)
            .map(|(&player_id, _)| player_id);
        return vec![Pot::new(total_pot_amount, still_in)];
    }

    let mut pots: Vec<Pot> = Vec::new();
    while let Some(&layer) = remaining.values().min() {
        let amount = layer.saturating_mul(remaining.len() as Chips);
        let layer_eligible: BTreeSet<PlayerId> = remaining
            .keys()
            .copied()
            .filter(|player_id| eligible[player_id])
            .collect();
        let dead_money = layer_eligible.is_empty() && !pots.is_empty();
        if dead_money {
            debug!("merging ${amount} of dead money into the pot below");
            if let Some(previous) = pots.last_mut() {
                previous.amount = previous.amount.saturating_add(amount);
            }
        } else {
            pots.push(Pot {
                amount,
                eligible_player_ids: layer_eligible,
            });
        }
        remaining.retain(|_, chips| {
            *chips -= layer;
            *chips > 0
        });
    }

    reconcile(&mut pots, total_pot_amount);
    pots
}

/// Make the pots add up to `total_pot_amount`. A surplus goes into the
/// last pot, a deficit comes out of the pots starting from the last.
fn reconcile(pots: &mut [Pot], total_pot_amount: Chips) {
    let peeled = pots.iter().fold(0, |sum: Chips, pot| sum.saturating_add(pot.amount));
    if peeled == total_pot_amount {
        return;
    }
    warn!("pot drift: contributions add up to ${peeled} but the pot holds ${total_pot_amount}");
    if peeled < total_pot_amount {
        if let Some(last) = pots.last_mut() {
            last.amount = last.amount.saturating_add(total_pot_amount - peeled);
        }
        return;
    }
    let mut deficit = peeled - total_pot_amount;
    for pot in pots.iter_mut().rev() {
        let taken = deficit.min(pot.amount);
        pot.amount -= taken;
        deficit -= taken;
        if deficit == 0 {
            break;
        }
    }
}

/// Errors naming winners for a pot
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum AwardError {
    #[error("pot #{pot_index} has no winner")]
    NoWinner { pot_index: usize },
    #[error("player #{player_id} isn't eligible for pot #{pot_index}")]
    IneligibleWinner { pot_index: usize, player_id: PlayerId },
    #[error("winners named for pot #{pot_index}, which doesn't exist")]
    UnknownPot { pot_index: usize },
}

/// Pay every pot out to its winners.
///
/// `winners` maps a pot index to the players the dealer says won it. A pot
/// with only one eligible player can be left out and goes to that player.
/// Split pots are shared evenly; leftover chips go out one at a time,
/// starting with the first winner clockwise of the button.
pub fn award_pots(
    pots: &[Pot],
    winners: &BTreeMap<usize, Vec<PlayerId>>,
    players: &[Player],
    dealer_seat: SeatIndex,
) -> Result<Vec<Payout>, AwardError> {
    if let Some(&pot_index) = winners.keys().find(|&&pot_index| pot_index >= pots.len()) {
        return Err(AwardError::UnknownPot { pot_index });
    }

    let seat_of: BTreeMap<PlayerId, SeatIndex> =
        players.iter().map(|player| (player.id, player.seat)).collect();
    // Seats clockwise of the button come first, the button itself last.
    let clockwise_key = |player_id: &PlayerId| {
        let seat = seat_of.get(player_id).copied().unwrap_or(SeatIndex::MAX);
        (seat <= dealer_seat, seat)
    };

    let mut payouts = Vec::new();
    for (pot_index, pot) in pots.iter().enumerate() {
        if pot.amount == 0 {
            continue;
        }
        let named: BTreeSet<PlayerId> = winners
            .get(&pot_index)
            .map(|named| named.iter().copied().collect())
            .unwrap_or_default();
        let mut pot_winners: Vec<PlayerId> = if !named.is_empty() {
            named.into_iter().collect()
        } else if pot.eligible_player_ids.len() == 1 {
            pot.eligible_player_ids.iter().copied().collect()
        } else {
            return Err(AwardError::NoWinner { pot_index });
        };
        if let Some(&player_id) = pot_winners.iter().find(|&&player_id| !pot.is_eligible(player_id)) {
            return Err(AwardError::IneligibleWinner { pot_index, player_id });
        }
        pot_winners.sort_by_key(|player_id| clockwise_key(player_id));

        let num_winners = pot_winners.len() as Chips;
        let share = pot.amount / num_winners;
        let odd_chips = pot.amount % num_winners;
        for (i, player_id) in pot_winners.into_iter().enumerate() {
            let amount = share + Chips::from((i as Chips) < odd_chips);
            payouts.push(Payout {
                pot_index,
                player_id,
                amount,
            });
        }
    }
    Ok(payouts)
}
