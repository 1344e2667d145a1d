//! Turn order.
//!
//! Rotation works on a seat-sorted snapshot of the players that may act,
//! so a status change in the middle of a lookup can't shift indices.

use super::entities::{Player, PlayerId, SeatIndex};

/// Eligible players sorted by seat.
#[derive(Debug)]
pub struct SeatOrder<'a> {
    eligible: Vec<&'a Player>,
}

impl<'a> SeatOrder<'a> {
    #[must_use]
    pub fn eligible(players: &'a [Player]) -> Self {
        let mut eligible: Vec<&Player> = players.iter().filter(|player| player.can_act()).collect();
        eligible.sort_by_key(|player| player.seat);
        Self { eligible }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.eligible.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.eligible.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&'a Player> {
        self.eligible.first().copied()
    }

    #[must_use]
    pub fn position(&self, player_id: PlayerId) -> Option<usize> {
        self.eligible.iter().position(|player| player.id == player_id)
    }

    /// Return the player after index `idx`, wrapping around.
    #[must_use]
    pub fn after(&self, idx: usize) -> Option<&'a Player> {
        if self.eligible.is_empty() {
            return None;
        }
        Some(self.eligible[(idx + 1) % self.eligible.len()])
    }

    /// Iterate over every eligible player once, starting with the first
    /// one strictly clockwise of `seat`.
    pub fn clockwise_after_seat(&self, seat: SeatIndex) -> impl Iterator<Item = &'a Player> + '_ {
        let start = self
            .eligible
            .iter()
            .position(|player| player.seat > seat)
            .unwrap_or(0);
        let len = self.eligible.len();
        (0..len).map(move |offset| self.eligible[(start + offset) % len])
    }
}

/// Return the next player to act after `current_actor_id`.
///
/// If the current actor isn't eligible (or there is none) the first
/// eligible player by seat is returned. Nothing is returned once one or
/// fewer players can act.
#[must_use]
pub fn next_actor(players: &[Player], current_actor_id: Option<PlayerId>) -> Option<PlayerId> {
    let order = SeatOrder::eligible(players);
    if order.len() <= 1 {
        return None;
    }
    match current_actor_id.and_then(|id| order.position(id)) {
        Some(idx) => order.after(idx).map(|player| player.id),
        None => order.first().map(|player| player.id),
    }
}

/// Return the first eligible player strictly clockwise of `seat`. Used
/// after an actor has folded or gone all-in and so dropped out of the
/// eligible order.
#[must_use]
pub fn next_actor_after_seat(players: &[Player], seat: SeatIndex) -> Option<PlayerId> {
    let order = SeatOrder::eligible(players);
    if order.len() <= 1 {
        return None;
    }
    order.clockwise_after_seat(seat).next().map(|player| player.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::PlayerStatus;

    fn table(statuses: &[(SeatIndex, PlayerStatus)]) -> Vec<Player> {
        statuses
            .iter()
            .map(|&(seat, status)| Player::new(seat as i64 * 10, seat, 1000).with_status(status))
            .collect()
    }

    #[test]
    fn test_next_actor_wraps() {
        let players = table(&[
            (1, PlayerStatus::Active),
            (3, PlayerStatus::Active),
            (5, PlayerStatus::Active),
        ]);
        assert_eq!(next_actor(&players, Some(10)), Some(30));
        assert_eq!(next_actor(&players, Some(30)), Some(50));
        assert_eq!(next_actor(&players, Some(50)), Some(10));
    }

    #[test]
    fn test_next_actor_skips_ineligible() {
        let players = table(&[
            (1, PlayerStatus::Active),
            (2, PlayerStatus::AllIn),
            (3, PlayerStatus::Folded),
            (4, PlayerStatus::Out),
            (5, PlayerStatus::Active),
        ]);
        assert_eq!(next_actor(&players, Some(10)), Some(50));
        assert_eq!(next_actor(&players, Some(50)), Some(10));
    }

    #[test]
    fn test_next_actor_unknown_current_starts_at_first_seat() {
        let players = table(&[(4, PlayerStatus::Active), (2, PlayerStatus::Active)]);
        assert_eq!(next_actor(&players, None), Some(20));
        assert_eq!(next_actor(&players, Some(999)), Some(20));
    }

    #[test]
    fn test_next_actor_none_with_single_eligible() {
        let players = table(&[
            (1, PlayerStatus::Active),
            (2, PlayerStatus::AllIn),
            (3, PlayerStatus::AllIn),
        ]);
        assert_eq!(next_actor(&players, Some(10)), None);
        assert_eq!(next_actor(&[], None), None);
    }

    #[test]
    fn test_next_actor_after_seat_of_folded_player() {
        let players = table(&[
            (1, PlayerStatus::Active),
            (2, PlayerStatus::Folded),
            (3, PlayerStatus::Active),
            (6, PlayerStatus::Active),
        ]);
        assert_eq!(next_actor_after_seat(&players, 2), Some(30));
        assert_eq!(next_actor_after_seat(&players, 6), Some(10));
    }

    #[test]
    fn test_clockwise_visits_each_once() {
        let players = table(&[
            (1, PlayerStatus::Active),
            (4, PlayerStatus::Active),
            (7, PlayerStatus::Active),
        ]);
        let order = SeatOrder::eligible(&players);
        let seats: Vec<_> = order.clockwise_after_seat(4).map(|p| p.seat).collect();
        assert_eq!(seats, vec![7, 1, 4]);
    }
}
