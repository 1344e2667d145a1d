//! Dealer button, blinds and first-to-act seats.
//!
//! Seats are walked clockwise, i.e. in increasing seat number, wrapping
//! around after the highest occupied seat.

use log::warn;
use std::collections::BTreeSet;

use super::entities::{Player, Positions, SeatIndex};

/// Number of players at which the heads-up blind rules kick in.
pub const HEADS_UP_PLAYER_COUNT: usize = 2;

fn occupied_seats(players: &[Player]) -> Vec<SeatIndex> {
    players
        .iter()
        .map(|player| player.seat)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Compute dealer, blind and pre-flop first-to-act seats for a hand.
///
/// Heads-up the dealer posts the small blind and acts first pre-flop.
/// With three or more players the blinds sit clockwise of the dealer and
/// the seat after the big blind opens the action.
///
/// Returns nothing if there are fewer than two players or the dealer seat
/// isn't occupied; the hand must not start in that case.
#[must_use]
pub fn calculate_positions(players_by_seat: &[Player], dealer_seat: SeatIndex) -> Option<Positions> {
    let seats = occupied_seats(players_by_seat);
    let num_seats = seats.len();
    if num_seats < HEADS_UP_PLAYER_COUNT {
        return None;
    }
    let dealer_idx = seats.iter().position(|&seat| seat == dealer_seat)?;
    let seat_after = |offset: usize| seats[(dealer_idx + offset) % num_seats];

    if num_seats == HEADS_UP_PLAYER_COUNT {
        Some(Positions {
            dealer: dealer_seat,
            small_blind: dealer_seat,
            big_blind: seat_after(1),
            first_to_act: dealer_seat,
        })
    } else {
        Some(Positions {
            dealer: dealer_seat,
            small_blind: seat_after(1),
            big_blind: seat_after(2),
            first_to_act: seat_after(3),
        })
    }
}

/// Return the first seat clockwise of the dealer among `active_players`.
/// The dealer's own seat comes last, which is what makes the dealer act
/// last after the flop.
#[must_use]
pub fn post_flop_first_to_act(active_players: &[Player], dealer_seat: SeatIndex) -> Option<SeatIndex> {
    let seats = occupied_seats(active_players);
    seats
        .iter()
        .copied()
        .find(|&seat| seat > dealer_seat)
        .or_else(|| seats.first().copied())
}

/// Move the dealer button to the next occupied seat clockwise.
///
/// With no current button the first seat gets it. If the current seat is
/// no longer occupied the button falls back to the first seat.
#[must_use]
pub fn move_button_to_next(players: &[Player], current_seat: Option<SeatIndex>) -> Option<SeatIndex> {
    let seats = occupied_seats(players);
    let first = *seats.first()?;
    let Some(current_seat) = current_seat else {
        return Some(first);
    };
    match seats.iter().position(|&seat| seat == current_seat) {
        Some(idx) => Some(seats[(idx + 1) % seats.len()]),
        None => {
            warn!("button seat {current_seat} is vacant, moving button to seat {first}");
            Some(first)
        }
    }
}
