//! Hand and betting-round state machine.
//!
//! A [`Table`] is a snapshot of one table: the seated players, the hand
//! bookkeeping and the blinds in effect. Every transition takes a snapshot
//! and returns a new one, so a rejected event leaves the caller's copy
//! exactly as it was.

use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::actions::{Action, ActionChoices, ActionError, Resolve, Wager};
use super::completion::{are_all_capped_or_folded, is_round_complete};
use super::entities::{
    BettingRound, Chips, Player, PlayerId, PlayerStatus, Pot, SeatIndex, TableState,
};
use super::positions::{
    HEADS_UP_PLAYER_COUNT, calculate_positions, move_button_to_next, post_flop_first_to_act,
};
use super::rotation::{SeatOrder, next_actor, next_actor_after_seat};
use super::side_pots::{self, AwardError, calculate_side_pots, contributions_from_players};
use crate::table::config::ConfigError;
use crate::tournament::BlindLevel;

/// Errors from events the table can't accept
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("need 2+ players with chips")]
    NotEnoughPlayers,
    #[error("invalid table state: dealer position not found")]
    InvalidPosition,
    #[error("hand already in progress")]
    HandInProgress,
    #[error("no hand in progress")]
    NoHandInProgress,
    #[error("betting is closed for this hand")]
    BettingClosed,
    #[error("not player #{player_id}'s turn")]
    OutOfTurnAction { player_id: PlayerId },
    #[error("player #{0} isn't seated at this table")]
    UnknownPlayer(PlayerId),
    #[error("player #{0} is seated twice")]
    DuplicatePlayer(PlayerId),
    #[error("seat {0} is already taken")]
    SeatTaken(SeatIndex),
    #[error("table only has {max_seats} seats")]
    TableFull { max_seats: usize },
    #[error("hand hasn't reached showdown")]
    HandNotFinished,
    #[error("${0} in the pot hasn't been awarded")]
    PotsUnawarded(Chips),
    #[error("nothing left in the pot to award")]
    NothingToAward,
    #[error(transparent)]
    InvalidAction(#[from] ActionError),
    #[error(transparent)]
    InvalidAward(#[from] AwardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Everything that can happen to a table, applied through [`reduce`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum TableEvent {
    StartHand { blinds: BlindLevel },
    Act { player_id: PlayerId, action: Action },
    /// Winners by pot index. Pots with no entry and a single eligible
    /// player go to that player.
    AwardPots { winners: BTreeMap<usize, Vec<PlayerId>> },
    EndHand,
}

/// Apply `event` to `table`, returning the next snapshot.
pub fn reduce(table: &Table, event: TableEvent) -> EngineResult<Table> {
    match event {
        TableEvent::StartHand { blinds } => table.start_hand(blinds),
        TableEvent::Act { player_id, action } => table.act(player_id, action),
        TableEvent::AwardPots { winners } => table.award_pots(&winners),
        TableEvent::EndHand => table.end_hand(),
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Table {
    /// Seated players, sorted by seat.
    pub players: Vec<Player>,
    pub state: TableState,
    /// Blinds of the current (or last) hand.
    pub blinds: BlindLevel,
}

impl Table {
    pub fn new(mut players: Vec<Player>) -> EngineResult<Self> {
        players.sort_by_key(|player| player.seat);
        if let Some(pair) = players.windows(2).find(|pair| pair[0].seat == pair[1].seat) {
            return Err(EngineError::SeatTaken(pair[1].seat));
        }
        for (idx, player) in players.iter().enumerate() {
            if players[..idx].iter().any(|other| other.id == player.id) {
                return Err(EngineError::DuplicatePlayer(player.id));
            }
        }
        Ok(Self {
            players,
            state: TableState::default(),
            blinds: BlindLevel::default(),
        })
    }

    #[must_use]
    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == player_id)
    }

    fn player_idx(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|player| player.id == player_id)
    }

    fn player_at_seat(&self, seat: SeatIndex) -> Option<&Player> {
        self.players.iter().find(|player| player.seat == seat)
    }

    /// Pots as split at showdown. Empty before then.
    #[must_use]
    pub fn pots(&self) -> &[Pot] {
        &self.state.pot_distribution
    }

    #[must_use]
    pub fn is_round_complete(&self) -> bool {
        is_round_complete(&self.players, &self.state)
    }

    /// Legal choices for the player whose turn it is.
    #[must_use]
    pub fn action_choices(&self) -> Option<ActionChoices> {
        let player = self.player(self.state.current_turn?)?;
        Some(ActionChoices::for_player(player, &self.state, self.blinds.big_blind))
    }

    /// Deal players in, post antes and blinds, and hand the first turn out.
    pub fn start_hand(&self, blinds: BlindLevel) -> EngineResult<Self> {
        if self.state.in_hand {
            return Err(EngineError::HandInProgress);
        }

        let mut next = self.clone();
        for player in &mut next.players {
            player.current_bet = 0;
            player.total_contributed = 0;
            player.status = if player.status == PlayerStatus::Out || player.balance == 0 {
                PlayerStatus::Out
            } else {
                PlayerStatus::Active
            };
        }
        let dealt: Vec<Player> = next.players.iter().filter(|p| p.can_act()).cloned().collect();
        if dealt.len() < HEADS_UP_PLAYER_COUNT {
            return Err(EngineError::NotEnoughPlayers);
        }
        let dealer_seat = match next.state.dealer_button_seat {
            Some(seat) => seat,
            None => move_button_to_next(&dealt, None).ok_or(EngineError::NotEnoughPlayers)?,
        };
        let positions = calculate_positions(&dealt, dealer_seat).ok_or(EngineError::InvalidPosition)?;

        let hand_number = next.state.hand_number + 1;
        next.state = TableState {
            dealer_button_seat: Some(dealer_seat),
            hand_number,
            in_hand: true,
            positions: Some(positions),
            ..TableState::default()
        };
        info!(
            "hand #{hand_number}: {} players, button on seat {dealer_seat}, blinds ${}/${}",
            dealt.len(),
            blinds.small_blind,
            blinds.big_blind
        );

        let ante = blinds.ante_amount();
        if ante > 0 {
            for player in next.players.iter_mut().filter(|p| p.can_act()) {
                next.state.pot += player.post_ante(ante);
            }
        }
        next.post_blind(positions.small_blind, blinds.small_blind);
        next.post_blind(positions.big_blind, blinds.big_blind);
        next.state.current_bet = blinds.big_blind;
        next.state.last_raise_amount = blinds.big_blind;
        next.blinds = blinds;

        let proposed = match next.player_at_seat(positions.first_to_act) {
            Some(player) if player.can_act() => Some(player.id),
            _ => next_actor_after_seat(&next.players, positions.first_to_act),
        };
        next.settle(positions.first_to_act, proposed);
        Ok(next)
    }

    fn post_blind(&mut self, seat: SeatIndex, amount: Chips) {
        if let Some(player) = self.players.iter_mut().find(|player| player.seat == seat) {
            let posted = player.commit(amount);
            debug!("player #{} posts ${posted} blind", player.id);
            self.state.pot += posted;
        }
    }

    /// Apply one betting action by the player whose turn it is.
    pub fn act(&self, player_id: PlayerId, action: Action) -> EngineResult<Self> {
        if !self.state.in_hand {
            return Err(EngineError::NoHandInProgress);
        }
        if !self.state.betting_round.allows_betting() {
            return Err(EngineError::BettingClosed);
        }
        let idx = self.player_idx(player_id).ok_or(EngineError::UnknownPlayer(player_id))?;
        let player = &self.players[idx];
        if self.state.current_turn != Some(player_id) || !player.can_act() {
            return Err(EngineError::OutOfTurnAction { player_id });
        }
        let wager = action.resolve(player, &self.state, self.blinds.big_blind)?;
        debug!("hand #{}: player #{player_id} {action}", self.state.hand_number);

        let mut next = self.clone();
        next.apply_wager(idx, wager);
        next.state.players_acted_in_round.insert(player_id);

        let seat = next.players[idx].seat;
        let proposed = if next.players[idx].can_act() {
            next_actor(&next.players, Some(player_id))
        } else {
            next_actor_after_seat(&next.players, seat)
        };
        next.settle(seat, proposed);
        Ok(next)
    }

    fn apply_wager(&mut self, idx: usize, wager: Wager) {
        let big_blind = self.blinds.big_blind;
        let player = &mut self.players[idx];
        match wager {
            Wager::Fold => player.status = PlayerStatus::Folded,
            Wager::Commit(amount) => {
                let moved = player.commit(amount);
                let (player_id, new_bet) = (player.id, player.current_bet);
                self.state.pot += moved;
                if new_bet > self.state.current_bet {
                    let increment = new_bet - self.state.current_bet;
                    self.state.current_bet = new_bet;
                    self.state.last_aggressor_id = Some(player_id);
                    // Only a full raise reopens the betting.
                    if increment >= self.state.last_raise_amount.max(big_blind) {
                        self.state.last_raise_amount = increment;
                        self.state.players_acted_in_round.clear();
                    }
                }
            }
        }
    }

    fn owes_action(&self, player_id: PlayerId) -> bool {
        self.player(player_id).is_some_and(|player| {
            player.can_act()
                && (!self.state.has_acted(player_id) || player.current_bet < self.state.current_bet)
        })
    }

    /// With one player left able to act and nothing for them to call there
    /// is no decision to make, so they count as having acted.
    fn record_forced_check(&mut self) {
        let order = SeatOrder::eligible(&self.players);
        let lone = match order.first() {
            Some(player) if order.len() == 1 => Some((player.id, player.owed(self.state.current_bet))),
            _ => None,
        };
        if let Some((player_id, 0)) = lone {
            self.state.players_acted_in_round.insert(player_id);
        }
    }

    /// Close finished rounds, possibly several in a row, or hand the turn to
    /// the next player who still owes action.
    fn settle(&mut self, mut after_seat: SeatIndex, mut proposed: Option<PlayerId>) {
        loop {
            self.record_forced_check();
            if !is_round_complete(&self.players, &self.state) {
                let turn = proposed.filter(|&id| self.owes_action(id)).or_else(|| {
                    SeatOrder::eligible(&self.players)
                        .clockwise_after_seat(after_seat)
                        .find(|player| self.owes_action(player.id))
                        .map(|player| player.id)
                });
                if turn.is_none() {
                    error!(
                        "hand #{}: {} is open but nobody owes action",
                        self.state.hand_number, self.state.betting_round
                    );
                }
                self.state.current_turn = turn;
                return;
            }

            let contenders = self.players.iter().filter(|p| p.is_in_hand()).count();
            let round = if contenders <= 1 || are_all_capped_or_folded(&self.players) {
                BettingRound::Showdown
            } else {
                self.state.betting_round.next().unwrap_or(BettingRound::Showdown)
            };
            self.open_round(round);
            if round == BettingRound::Showdown {
                return;
            }

            let dealer_seat = self.state.dealer_button_seat.unwrap_or_default();
            let active: Vec<Player> = self.players.iter().filter(|p| p.can_act()).cloned().collect();
            match post_flop_first_to_act(&active, dealer_seat) {
                Some(seat) => {
                    after_seat = seat;
                    proposed = self.player_at_seat(seat).map(|player| player.id);
                }
                None => {
                    after_seat = dealer_seat;
                    proposed = None;
                }
            }
        }
    }

    fn open_round(&mut self, round: BettingRound) {
        debug!(
            "hand #{}: {} -> {round}, pot ${}",
            self.state.hand_number, self.state.betting_round, self.state.pot
        );
        self.state.betting_round = round;
        self.state.current_bet = 0;
        self.state.last_raise_amount = 0;
        self.state.last_aggressor_id = None;
        self.state.players_acted_in_round.clear();
        self.state.current_turn = None;
        for player in &mut self.players {
            player.current_bet = 0;
        }
        if round == BettingRound::Showdown {
            let contributions = contributions_from_players(&self.players);
            self.state.pot_distribution = calculate_side_pots(&contributions, self.state.pot);
            for pot in &self.state.pot_distribution {
                debug!("hand #{}: {pot}", self.state.hand_number);
            }
        }
    }

    /// Pay out the showdown pots to the given winners.
    pub fn award_pots(&self, winners: &BTreeMap<usize, Vec<PlayerId>>) -> EngineResult<Self> {
        if !self.state.in_hand {
            return Err(EngineError::NoHandInProgress);
        }
        if self.state.betting_round != BettingRound::Showdown {
            return Err(EngineError::HandNotFinished);
        }
        if self.state.pot == 0 {
            return Err(EngineError::NothingToAward);
        }
        let dealer_seat = self.state.dealer_button_seat.ok_or(EngineError::InvalidPosition)?;
        let payouts = side_pots::award_pots(&self.state.pot_distribution, winners, &self.players, dealer_seat)?;

        let mut next = self.clone();
        for payout in &payouts {
            if let Some(player) = next.players.iter_mut().find(|p| p.id == payout.player_id) {
                player.balance += payout.amount;
                info!(
                    "hand #{}: player #{} wins ${} from pot {}",
                    next.state.hand_number, payout.player_id, payout.amount, payout.pot_index
                );
            }
        }
        let paid: Chips = payouts.iter().map(|payout| payout.amount).sum();
        next.state.pot = next.state.pot.saturating_sub(paid);
        next.state.payouts = payouts;
        Ok(next)
    }

    /// Finish an awarded hand: eliminate busted players, return the rest to
    /// their seats and move the button.
    pub fn end_hand(&self) -> EngineResult<Self> {
        if !self.state.in_hand {
            return Err(EngineError::NoHandInProgress);
        }
        if self.state.betting_round != BettingRound::Showdown {
            return Err(EngineError::HandNotFinished);
        }
        if self.state.pot > 0 {
            return Err(EngineError::PotsUnawarded(self.state.pot));
        }

        let mut next = self.clone();
        for player in &mut next.players {
            player.current_bet = 0;
            player.total_contributed = 0;
            if player.balance == 0 {
                if player.status != PlayerStatus::Out {
                    info!("hand #{}: player #{} eliminated", next.state.hand_number, player.id);
                }
                player.status = PlayerStatus::Out;
            } else if player.status != PlayerStatus::Out {
                player.status = PlayerStatus::Sitting;
            }
        }
        let remaining: Vec<Player> = next
            .players
            .iter()
            .filter(|p| p.status != PlayerStatus::Out)
            .cloned()
            .collect();
        // The old button seat may have just been vacated by an elimination,
        // so look clockwise of it rather than for it.
        let dealer_button_seat = match self.state.dealer_button_seat {
            Some(seat) => post_flop_first_to_act(&remaining, seat),
            None => move_button_to_next(&remaining, None),
        };
        info!(
            "hand #{} over, {} players remain",
            next.state.hand_number,
            remaining.len()
        );
        next.state = TableState {
            dealer_button_seat,
            hand_number: next.state.hand_number,
            payouts: std::mem::take(&mut next.state.payouts),
            ..TableState::default()
        };
        Ok(next)
    }
}
