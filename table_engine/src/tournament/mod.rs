//! Tournament blind structure.
//!
//! Blind levels are plain data. The engine never reads a clock; callers
//! pick the level in effect and hand it to [`crate::Table::start_hand`].
//!
//! ## Example
//!
//! ```
//! use table_engine::tournament::BlindSchedule;
//!
//! let schedule = BlindSchedule::standard(600);
//! let level = schedule.level_at(1500).unwrap();
//! assert_eq!(level.level, 3);
//! assert_eq!(level.big_blind, 50);
//! ```

pub mod models;

pub use models::{BlindLevel, BlindSchedule, DEFAULT_LEVEL_SECS};
