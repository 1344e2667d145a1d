//! Blind structure for tournament tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::entities::Chips;

/// Default level duration of the standard schedule (10 minutes).
pub const DEFAULT_LEVEL_SECS: u32 = 600;

/// One level of the blind structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindLevel {
    /// Level number (1-indexed)
    pub level: u32,
    /// Small blind amount
    pub small_blind: Chips,
    /// Big blind amount
    pub big_blind: Chips,
    /// Ante amount (optional)
    pub ante: Option<Chips>,
    /// Duration of this level in seconds
    pub duration_secs: u32,
}

impl BlindLevel {
    /// Create a new blind level
    #[must_use]
    pub fn new(level: u32, small_blind: Chips, big_blind: Chips, duration_secs: u32) -> Self {
        Self {
            level,
            small_blind,
            big_blind,
            ante: None,
            duration_secs,
        }
    }

    /// Create a blind level with ante
    #[must_use]
    pub fn with_ante(mut self, ante: Chips) -> Self {
        self.ante = Some(ante);
        self
    }

    #[must_use]
    pub fn ante_amount(&self) -> Chips {
        self.ante.unwrap_or(0)
    }
}

/// Ordered blind levels of a tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlindSchedule {
    pub levels: Vec<BlindLevel>,
}

impl BlindSchedule {
    #[must_use]
    pub fn new(levels: Vec<BlindLevel>) -> Self {
        Self { levels }
    }

    /// Standard structure, blinds roughly doubling every two levels with
    /// antes from level 5.
    #[must_use]
    pub fn standard(duration_secs: u32) -> Self {
        let blinds: [(Chips, Chips, Option<Chips>); 10] = [
            (10, 20, None),
            (15, 30, None),
            (25, 50, None),
            (50, 100, None),
            (75, 150, Some(15)),
            (100, 200, Some(25)),
            (150, 300, Some(25)),
            (200, 400, Some(50)),
            (300, 600, Some(75)),
            (400, 800, Some(100)),
        ];
        let levels = blinds
            .iter()
            .zip(1..)
            .map(|(&(small_blind, big_blind, ante), level)| {
                let blind_level = BlindLevel::new(level, small_blind, big_blind, duration_secs);
                match ante {
                    Some(ante) => blind_level.with_ante(ante),
                    None => blind_level,
                }
            })
            .collect();
        Self { levels }
    }

    /// Get blind level by number
    #[must_use]
    pub fn get_blind_level(&self, level: u32) -> Option<&BlindLevel> {
        self.levels.iter().find(|bl| bl.level == level)
    }

    /// Level in effect `elapsed_secs` after the tournament started. Past the
    /// end of the schedule the final level stays in effect.
    #[must_use]
    pub fn level_at(&self, elapsed_secs: u64) -> Option<&BlindLevel> {
        let mut level_end = 0u64;
        for blind_level in &self.levels {
            level_end += u64::from(blind_level.duration_secs);
            if elapsed_secs < level_end {
                return Some(blind_level);
            }
        }
        self.levels.last()
    }

    /// Same as [`BlindSchedule::level_at`] for wall-clock times supplied by
    /// the caller. A `now` before `started_at` is the first level.
    #[must_use]
    pub fn level_at_time(&self, started_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<&BlindLevel> {
        let elapsed = u64::try_from((now - started_at).num_seconds()).unwrap_or(0);
        self.level_at(elapsed)
    }

    /// Seconds until the level after the one in effect at `elapsed_secs`
    /// starts, or nothing once the final level is reached.
    #[must_use]
    pub fn secs_to_next_level(&self, elapsed_secs: u64) -> Option<u64> {
        let mut level_end = 0u64;
        for (idx, blind_level) in self.levels.iter().enumerate() {
            level_end += u64::from(blind_level.duration_secs);
            if elapsed_secs < level_end {
                return (idx + 1 < self.levels.len()).then(|| level_end - elapsed_secs);
            }
        }
        None
    }
}

impl Default for BlindSchedule {
    fn default() -> Self {
        Self::standard(DEFAULT_LEVEL_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_standard_schedule() {
        let schedule = BlindSchedule::standard(300);
        assert_eq!(schedule.levels.len(), 10);
        assert!(schedule.levels.iter().all(|bl| bl.duration_secs == 300));
        assert!(schedule.levels.iter().all(|bl| bl.big_blind == 2 * bl.small_blind));
        assert_eq!(schedule.levels[0].level, 1);
        assert_eq!(schedule.levels[9].level, 10);
    }

    #[test]
    fn test_get_blind_level() {
        let schedule = BlindSchedule::default();
        let level_1 = schedule.get_blind_level(1);
        assert!(level_1.is_some());
        assert_eq!(level_1.unwrap().small_blind, 10);
        assert_eq!(level_1.unwrap().big_blind, 20);

        assert!(schedule.get_blind_level(99).is_none());
    }

    #[test]
    fn test_blind_level_with_ante() {
        let level = BlindLevel::new(5, 100, 200, 300).with_ante(25);
        assert_eq!(level.ante, Some(25));
        assert_eq!(level.ante_amount(), 25);
        assert_eq!(BlindLevel::new(1, 10, 20, 300).ante_amount(), 0);
    }

    #[test]
    fn test_level_at_boundaries() {
        let schedule = BlindSchedule::standard(300);
        assert_eq!(schedule.level_at(0).unwrap().level, 1);
        assert_eq!(schedule.level_at(299).unwrap().level, 1);
        assert_eq!(schedule.level_at(300).unwrap().level, 2);
        assert_eq!(schedule.level_at(2999).unwrap().level, 10);
    }

    #[test]
    fn test_level_at_clamps_to_final_level() {
        let schedule = BlindSchedule::standard(300);
        assert_eq!(schedule.level_at(1_000_000).unwrap().level, 10);
        assert!(BlindSchedule::new(vec![]).level_at(0).is_none());
    }

    #[test]
    fn test_level_at_time() {
        let schedule = BlindSchedule::standard(600);
        let started_at = Utc::now();
        assert_eq!(
            schedule
                .level_at_time(started_at, started_at + Duration::minutes(25))
                .unwrap()
                .level,
            3
        );
        assert_eq!(
            schedule
                .level_at_time(started_at, started_at - Duration::minutes(5))
                .unwrap()
                .level,
            1
        );
    }

    #[test]
    fn test_secs_to_next_level() {
        let schedule = BlindSchedule::standard(300);
        assert_eq!(schedule.secs_to_next_level(0), Some(300));
        assert_eq!(schedule.secs_to_next_level(450), Some(150));
        assert_eq!(schedule.secs_to_next_level(2800), None);
    }
}
