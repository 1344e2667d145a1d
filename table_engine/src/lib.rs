//! # Table Engine
//!
//! The wagering core of a live poker tournament table: who may act, whose
//! turn it is, when a betting round closes, and how the chips in the pot
//! split into main and side pots.
//!
//! Cards and hand ranking stay with the humans at the table. The engine
//! only tracks chips and turn order, and the dealer names the winner of
//! each pot at showdown.
//!
//! ## Architecture
//!
//! A hand moves through five phases:
//!
//! - **PreFlop**: Blinds (and antes) posted, first betting round
//! - **Flop/Turn/River**: Later betting rounds, the dealer acts last
//! - **Showdown**: Betting closed, pots split and awarded
//!
//! Each event is applied to a [`Table`] snapshot through [`reduce`], which
//! returns the next snapshot or an [`EngineError`] and never touches its
//! input. Action rules are dispatched through the [`game::Resolve`] trait
//! using `enum_dispatch`.
//!
//! ## Core Modules
//!
//! - [`game`]: Eligibility, positions, rotation, round completion, side pots
//!   and the state machine
//! - [`table`]: Table configuration and random seating
//! - [`tournament`]: Blind levels and schedules
//!
//! ## Example
//!
//! ```
//! use table_engine::{Player, Table, TableEvent, reduce};
//! use table_engine::game::actions::{Call, Check};
//! use table_engine::tournament::BlindLevel;
//!
//! let table = Table::new(vec![Player::new(1, 0, 1000), Player::new(2, 1, 1000)]).unwrap();
//! let blinds = BlindLevel::new(1, 10, 20, 600);
//! let table = reduce(&table, TableEvent::StartHand { blinds }).unwrap();
//! let table = reduce(&table, TableEvent::Act { player_id: 1, action: Call.into() }).unwrap();
//! let table = reduce(&table, TableEvent::Act { player_id: 2, action: Check.into() }).unwrap();
//! assert_eq!(table.state.pot, 40);
//! ```

/// Core wagering logic, entities, and state machine.
pub mod game;
pub use game::{
    EngineError, EngineResult, Table, TableEvent,
    entities::{self, BettingRound, Chips, Player, PlayerId, PlayerStatus, Pot, SeatIndex},
    reduce,
};

/// Table configuration and seating.
pub mod table;

/// Tournament blind structure.
pub mod tournament;
