//! Betting actions and the rules for turning each one into chips.
//!
//! Every action type resolves itself against the acting player and the
//! table into a [`Wager`]. The state machine then applies wagers the same
//! way no matter which action produced them.

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::entities::{Chips, Player, TableState};

/// Errors from actions that break the betting rules
#[derive(Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ActionError {
    #[error("can't check facing ${owed}")]
    CannotCheck { owed: Chips },
    #[error("a bet of ${current_bet} is already open")]
    BetAlreadyOpen { current_bet: Chips },
    #[error("bet of ${amount} is below the ${min} minimum")]
    BetTooSmall { amount: Chips, min: Chips },
    #[error("nothing to raise")]
    NothingToRaise,
    #[error("raise to ${to} is below the ${min_to} minimum")]
    RaiseTooSmall { to: Chips, min_to: Chips },
    #[error("betting wasn't reopened, call or fold")]
    RaiseNotReopened,
}

/// Chips an action moves once it's been checked against the rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Wager {
    Fold,
    /// Chips to move from the balance into the pot. Zero is a check.
    /// Amounts above the balance get clamped when applied.
    Commit(Chips),
}

/// Smallest total bet a raise has to reach this round.
#[must_use]
pub fn min_raise_to(table: &TableState, big_blind: Chips) -> Chips {
    table.current_bet + table.last_raise_amount.max(big_blind)
}

/// Smallest opening bet.
#[must_use]
pub fn min_bet(big_blind: Chips) -> Chips {
    big_blind.max(1)
}

/// A player who acted since the last full raise can only call or fold
/// when someone goes all-in for less than a full raise.
#[must_use]
pub fn raising_reopened(player: &Player, table: &TableState) -> bool {
    !table.has_acted(player.id)
}

#[enum_dispatch]
pub trait Resolve {
    fn resolve(&self, player: &Player, table: &TableState, big_blind: Chips) -> Result<Wager, ActionError>;
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Fold;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Check;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Call;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Bet {
    pub amount: Chips,
}

/// Raise the bet to `to` chips for this round (not by `to`).
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Raise {
    pub to: Chips,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AllIn;

impl Resolve for Fold {
    fn resolve(&self, _: &Player, _: &TableState, _: Chips) -> Result<Wager, ActionError> {
        Ok(Wager::Fold)
    }
}

impl Resolve for Check {
    fn resolve(&self, player: &Player, table: &TableState, _: Chips) -> Result<Wager, ActionError> {
        match player.owed(table.current_bet) {
            0 => Ok(Wager::Commit(0)),
            owed => Err(ActionError::CannotCheck { owed }),
        }
    }
}

impl Resolve for Call {
    fn resolve(&self, player: &Player, table: &TableState, _: Chips) -> Result<Wager, ActionError> {
        Ok(Wager::Commit(player.owed(table.current_bet)))
    }
}

impl Resolve for Bet {
    fn resolve(&self, player: &Player, table: &TableState, big_blind: Chips) -> Result<Wager, ActionError> {
        if table.current_bet > 0 {
            return Err(ActionError::BetAlreadyOpen {
                current_bet: table.current_bet,
            });
        }
        if self.amount >= player.balance {
            return Ok(Wager::Commit(player.balance));
        }
        let min = min_bet(big_blind);
        if self.amount < min {
            return Err(ActionError::BetTooSmall {
                amount: self.amount,
                min,
            });
        }
        Ok(Wager::Commit(self.amount))
    }
}

impl Resolve for Raise {
    fn resolve(&self, player: &Player, table: &TableState, big_blind: Chips) -> Result<Wager, ActionError> {
        if table.current_bet == 0 {
            return Err(ActionError::NothingToRaise);
        }
        if !raising_reopened(player, table) {
            return Err(ActionError::RaiseNotReopened);
        }
        let needed = self.to.saturating_sub(player.current_bet);
        if needed >= player.balance {
            return Ok(Wager::Commit(player.balance));
        }
        let min_to = min_raise_to(table, big_blind);
        if self.to < min_to {
            return Err(ActionError::RaiseTooSmall { to: self.to, min_to });
        }
        Ok(Wager::Commit(needed))
    }
}

impl Resolve for AllIn {
    fn resolve(&self, player: &Player, table: &TableState, _: Chips) -> Result<Wager, ActionError> {
        let raises = player.current_bet + player.balance > table.current_bet;
        if raises && !raising_reopened(player, table) {
            return Err(ActionError::RaiseNotReopened);
        }
        Ok(Wager::Commit(player.balance))
    }
}

#[enum_dispatch(Resolve)]
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Action {
    Fold(Fold),
    Check(Check),
    Call(Call),
    Bet(Bet),
    Raise(Raise),
    AllIn(AllIn),
}

impl Action {
    #[must_use]
    pub fn bet(amount: Chips) -> Self {
        Bet { amount }.into()
    }

    #[must_use]
    pub fn raise_to(to: Chips) -> Self {
        Raise { to }.into()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold(_) => "folds".to_string(),
            Self::Check(_) => "checks".to_string(),
            Self::Call(_) => "calls".to_string(),
            Self::Bet(bet) => format!("bets ${}", bet.amount),
            Self::Raise(raise) => format!("raises to ${}", raise.to),
            Self::AllIn(_) => "goes all-in".to_string(),
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ActionChoice {
    Fold,
    Check,
    Call(Chips),
    /// Minimum opening bet.
    Bet(Chips),
    /// Minimum total to raise to.
    Raise(Chips),
    /// Chips the player would move.
    AllIn(Chips),
}

impl fmt::Display for ActionChoice {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Fold => "fold".to_string(),
            Self::Check => "check".to_string(),
            Self::Call(amount) => format!("call (== ${amount})"),
            Self::Bet(amount) => format!("bet (>= ${amount})"),
            Self::Raise(amount) => format!("raise to (>= ${amount})"),
            Self::AllIn(amount) => format!("all-in (== ${amount})"),
        };
        write!(f, "{repr}")
    }
}

/// Legal choices for a player, in the order they're usually offered.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ActionChoices(pub Vec<ActionChoice>);

impl ActionChoices {
    #[must_use]
    pub fn for_player(player: &Player, table: &TableState, big_blind: Chips) -> Self {
        let mut choices = vec![ActionChoice::Fold];
        let owed = player.owed(table.current_bet);
        if owed == 0 {
            choices.push(ActionChoice::Check);
        } else if owed < player.balance {
            choices.push(ActionChoice::Call(owed));
        }

        let reopened = raising_reopened(player, table);
        let reachable = player.current_bet + player.balance;
        if table.current_bet == 0 {
            let min = min_bet(big_blind);
            if player.balance > min {
                choices.push(ActionChoice::Bet(min));
            }
        } else if reopened {
            let min_to = min_raise_to(table, big_blind);
            if reachable > min_to {
                choices.push(ActionChoice::Raise(min_to));
            }
        }

        if player.balance > 0 && (reopened || reachable <= table.current_bet) {
            choices.push(ActionChoice::AllIn(player.balance));
        }
        Self(choices)
    }

    /// Whether `action` is one of the choices. Only the kind of action is
    /// compared; amounts are checked when the action is resolved.
    #[must_use]
    pub fn contains(&self, action: &Action) -> bool {
        self.0.iter().any(|choice| {
            matches!(
                (choice, action),
                (ActionChoice::Fold, Action::Fold(_))
                    | (ActionChoice::Check, Action::Check(_))
                    | (ActionChoice::Call(_), Action::Call(_))
                    | (ActionChoice::Bet(_), Action::Bet(_))
                    | (ActionChoice::Raise(_), Action::Raise(_))
                    | (ActionChoice::AllIn(_), Action::AllIn(_))
            )
        })
    }
}

impl fmt::Display for ActionChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_options = self.0.len();
        let repr = self
            .0
            .iter()
            .enumerate()
            .map(|(i, choice)| match i {
                0 => choice.to_string(),
                i if i == num_options - 1 => format!(" or {choice}"),
                _ => format!(", {choice}"),
            })
            .collect::<String>();
        write!(f, "{repr}")
    }
}
