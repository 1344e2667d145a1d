//! Wagering engine: the pure pieces of a hand and the state machine that
//! ties them together.
//!
//! - Eligibility predicate deciding who may still act
//! - Dealer, blind and first-to-act positions
//! - Turn rotation over a seat-sorted snapshot
//! - Betting-round completion
//! - Layered main/side pots and their payout
//! - Betting actions and the table reducer

pub mod actions;
pub mod completion;
pub mod eligibility;
pub mod entities;
pub mod positions;
pub mod rotation;
pub mod side_pots;
pub mod state_machine;

pub use actions::{Action, ActionChoice, ActionChoices, ActionError, Resolve, Wager};
pub use completion::{are_all_capped_or_folded, is_round_complete};
pub use eligibility::can_act;
pub use positions::{calculate_positions, move_button_to_next, post_flop_first_to_act};
pub use rotation::{SeatOrder, next_actor, next_actor_after_seat};
pub use side_pots::{AwardError, Contribution, award_pots, calculate_side_pots, contributions_from_players};
pub use state_machine::{EngineError, EngineResult, Table, TableEvent, reduce};
