//! Table setup: configuration and random seating.
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use table_engine::{Table, table::TableConfig};
//!
//! let config = TableConfig::default();
//! let table = Table::seat_players(&config, &[1, 2, 3], StdRng::seed_from_u64(7)).unwrap();
//! assert_eq!(table.players.len(), 3);
//! ```

pub mod config;
pub mod seating;

pub use config::{ConfigError, MAX_SEATS, TableConfig};
pub use seating::SeatRandomizer;
