use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt};

use super::eligibility;

/// Type alias for whole chips. All bets, stacks and pots are represented
/// as whole tournament chips, so a balance can never go negative.
pub type Chips = u64;

/// Type alias for player identifiers handed to us by the orchestrator.
pub type PlayerId = i64;

/// Type alias for seat numbers at a table. Seats are unique per table
/// and increase clockwise.
pub type SeatIndex = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum PlayerStatus {
    // Dealt in and still able to act.
    Active,
    // Gave up their claim to the pot. Chips already committed stay in.
    Folded,
    // Committed their whole balance and can't act again this hand.
    AllIn,
    // Eliminated from the tournament.
    Out,
    // Seated between hands, waiting for the next deal.
    Sitting,
}

impl fmt::Display for PlayerStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Active => "active",
            Self::Folded => "folded",
            Self::AllIn => "all-in",
            Self::Out => "out",
            Self::Sitting => "sitting",
        };
        write!(f, "{repr:7}")
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub seat: SeatIndex,
    /// Chips in front of the player that haven't been wagered.
    pub balance: Chips,
    /// Chips committed during the current betting round.
    pub current_bet: Chips,
    /// Chips committed across every round of the current hand, antes
    /// included. Side pots are peeled from this.
    pub total_contributed: Chips,
    pub status: PlayerStatus,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, seat: SeatIndex, balance: Chips) -> Self {
        Self {
            id,
            seat,
            balance,
            current_bet: 0,
            total_contributed: 0,
            status: PlayerStatus::Sitting,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: PlayerStatus) -> Self {
        self.status = status;
        self
    }

    /// Set what the player has already committed this round and this hand.
    #[must_use]
    pub fn with_bets(mut self, current_bet: Chips, total_contributed: Chips) -> Self {
        self.current_bet = current_bet;
        self.total_contributed = total_contributed;
        self
    }

    #[must_use]
    pub fn can_act(&self) -> bool {
        eligibility::can_act(self)
    }

    /// Whether the player still has a claim on the pot.
    #[must_use]
    pub fn is_in_hand(&self) -> bool {
        !matches!(self.status, PlayerStatus::Folded | PlayerStatus::Out)
    }

    #[must_use]
    pub fn is_all_in(&self) -> bool {
        self.status == PlayerStatus::AllIn
    }

    /// Return how much the player still has to put in to match `table_bet`.
    #[must_use]
    pub fn owed(&self, table_bet: Chips) -> Chips {
        table_bet.saturating_sub(self.current_bet)
    }

    /// Move chips from the balance into the current bet. Requests larger
    /// than the balance are clamped, and emptying the balance puts the
    /// player all-in. Returns the chips actually moved.
    pub fn commit(&mut self, amount: Chips) -> Chips {
        let moved = self.take(amount);
        self.current_bet += moved;
        moved
    }

    /// Antes are dead money. They count toward the player's contribution
    /// to the hand but not toward the bet they have to match.
    pub fn post_ante(&mut self, amount: Chips) -> Chips {
        self.take(amount)
    }

    fn take(&mut self, amount: Chips) -> Chips {
        let moved = amount.min(self.balance);
        self.balance -= moved;
        self.total_contributed += moved;
        if self.balance == 0 && self.is_in_hand() {
            self.status = PlayerStatus::AllIn;
        }
        moved
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} (seat {}) {} ${} behind, ${} in",
            self.id, self.seat, self.status, self.balance, self.total_contributed
        )
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum BettingRound {
    #[default]
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl BettingRound {
    /// Return the round that follows this one, or nothing once the hand
    /// has reached the showdown.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        match self {
            Self::PreFlop => Some(Self::Flop),
            Self::Flop => Some(Self::Turn),
            Self::Turn => Some(Self::River),
            Self::River => Some(Self::Showdown),
            Self::Showdown => None,
        }
    }

    #[must_use]
    pub fn allows_betting(self) -> bool {
        self != Self::Showdown
    }
}

impl fmt::Display for BettingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::PreFlop => "pre-flop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
            Self::Showdown => "showdown",
        };
        write!(f, "{repr}")
    }
}

/// Seats paying blinds and opening the action for a hand.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Positions {
    pub dealer: SeatIndex,
    pub small_blind: SeatIndex,
    pub big_blind: SeatIndex,
    /// First to act pre-flop.
    pub first_to_act: SeatIndex,
}

/// A main or side pot. Once computed at showdown a pot is never changed;
/// in particular nobody loses eligibility for it.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Pot {
    pub amount: Chips,
    pub eligible_player_ids: BTreeSet<PlayerId>,
}

impl Pot {
    #[must_use]
    pub fn new<I>(amount: Chips, eligible: I) -> Self
    where
        I: IntoIterator<Item = PlayerId>,
    {
        Self {
            amount,
            eligible_player_ids: eligible.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn is_eligible(&self, player_id: PlayerId) -> bool {
        self.eligible_player_ids.contains(&player_id)
    }
}

impl fmt::Display for Pot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = self
            .eligible_player_ids
            .iter()
            .map(|id| format!("#{id}"))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "${} [{ids}]", self.amount)
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Payout {
    pub pot_index: usize,
    pub player_id: PlayerId,
    pub amount: Chips,
}

/// Everything about the table that isn't owned by a single player.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct TableState {
    pub dealer_button_seat: Option<SeatIndex>,
    pub betting_round: BettingRound,
    /// Amount every player has to match this round.
    pub current_bet: Chips,
    /// Size of the last full raise (or opening bet) this round. The next
    /// raise has to be at least this much on top of `current_bet`.
    pub last_raise_amount: Chips,
    pub current_turn: Option<PlayerId>,
    pub last_aggressor_id: Option<PlayerId>,
    pub players_acted_in_round: BTreeSet<PlayerId>,
    /// Chips committed this hand that haven't been paid out yet.
    pub pot: Chips,
    /// Main pot followed by side pots, filled in at showdown.
    pub pot_distribution: Vec<Pot>,
    pub hand_number: u64,
    pub in_hand: bool,
    pub positions: Option<Positions>,
    /// Payouts made when the last hand's pots were awarded.
    pub payouts: Vec<Payout>,
}

impl TableState {
    #[must_use]
    pub fn has_acted(&self, player_id: PlayerId) -> bool {
        self.players_acted_in_round.contains(&player_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Player Tests ===

    #[test]
    fn test_new_player_is_sitting() {
        let player = Player::new(1, 4, 1000);
        assert_eq!(player.status, PlayerStatus::Sitting);
        assert_eq!(player.current_bet, 0);
        assert_eq!(player.total_contributed, 0);
    }

    #[test]
    fn test_commit_moves_chips() {
        let mut player = Player::new(1, 0, 1000).with_status(PlayerStatus::Active);
        let moved = player.commit(300);
        assert_eq!(moved, 300);
        assert_eq!(player.balance, 700);
        assert_eq!(player.current_bet, 300);
        assert_eq!(player.total_contributed, 300);
        assert_eq!(player.status, PlayerStatus::Active);
    }

    #[test]
    fn test_commit_clamps_to_balance_and_forces_all_in() {
        let mut player = Player::new(1, 0, 250).with_status(PlayerStatus::Active);
        let moved = player.commit(1000);
        assert_eq!(moved, 250);
        assert_eq!(player.balance, 0);
        assert_eq!(player.current_bet, 250);
        assert_eq!(player.status, PlayerStatus::AllIn);
    }

    #[test]
    fn test_ante_is_not_part_of_current_bet() {
        let mut player = Player::new(1, 0, 1000).with_status(PlayerStatus::Active);
        player.post_ante(25);
        assert_eq!(player.current_bet, 0);
        assert_eq!(player.total_contributed, 25);
        assert_eq!(player.balance, 975);
    }

    #[test]
    fn test_owed_never_underflows() {
        let player = Player::new(1, 0, 1000).with_bets(200, 200);
        assert_eq!(player.owed(500), 300);
        assert_eq!(player.owed(100), 0);
    }

    #[test]
    fn test_folded_player_is_not_in_hand() {
        let player = Player::new(1, 0, 1000).with_status(PlayerStatus::Folded);
        assert!(!player.is_in_hand());
        let player = player.with_status(PlayerStatus::AllIn);
        assert!(player.is_in_hand());
    }

    // === BettingRound Tests ===

    #[test]
    fn test_betting_round_order() {
        let mut round = BettingRound::PreFlop;
        let mut seen = vec![round];
        while let Some(next) = round.next() {
            seen.push(next);
            round = next;
        }
        assert_eq!(
            seen,
            vec![
                BettingRound::PreFlop,
                BettingRound::Flop,
                BettingRound::Turn,
                BettingRound::River,
                BettingRound::Showdown,
            ]
        );
        assert!(!BettingRound::Showdown.allows_betting());
    }

    // === Pot Tests ===

    #[test]
    fn test_pot_eligibility_is_ordered() {
        let pot = Pot::new(1500, [3, 1, 2]);
        assert_eq!(pot.eligible_player_ids.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(pot.is_eligible(2));
        assert!(!pot.is_eligible(4));
        assert_eq!(pot.to_string(), "$1500 [#1, #2, #3]");
    }

    #[test]
    fn test_table_state_default() {
        let state = TableState::default();
        assert_eq!(state.betting_round, BettingRound::PreFlop);
        assert!(!state.in_hand);
        assert!(state.current_turn.is_none());
        assert!(state.pot_distribution.is_empty());
    }
}
