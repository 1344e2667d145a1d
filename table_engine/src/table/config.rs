//! Table configuration models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::entities::Chips;
use crate::tournament::{BlindSchedule, DEFAULT_LEVEL_SECS};

/// Most seats a single table can have.
pub const MAX_SEATS: usize = 10;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("max seats must be between 2 and {MAX_SEATS}, got {0}")]
    InvalidMaxSeats(usize),

    #[error("starting stack must be positive")]
    ZeroStartingStack,

    #[error("blind schedule has no levels")]
    EmptySchedule,

    #[error("level {level}: big blind must be greater than small blind")]
    InvalidBlinds { level: u32 },

    #[error("level {level} has zero duration")]
    ZeroDuration { level: u32 },

    #[error("couldn't parse {key}={value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Table configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name
    pub name: String,

    /// Number of seats (default: 10)
    pub max_seats: usize,

    /// Chips each player starts the tournament with
    pub starting_stack: Chips,

    /// Blind levels in the order they're played
    pub blind_schedule: BlindSchedule,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: "Default Table".to_string(),
            max_seats: MAX_SEATS,
            starting_stack: 10_000,
            blind_schedule: BlindSchedule::standard(DEFAULT_LEVEL_SECS),
        }
    }
}

impl TableConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=MAX_SEATS).contains(&self.max_seats) {
            return Err(ConfigError::InvalidMaxSeats(self.max_seats));
        }

        if self.starting_stack == 0 {
            return Err(ConfigError::ZeroStartingStack);
        }

        if self.blind_schedule.levels.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }

        for level in &self.blind_schedule.levels {
            if level.big_blind <= level.small_blind {
                return Err(ConfigError::InvalidBlinds { level: level.level });
            }
            if level.duration_secs == 0 {
                return Err(ConfigError::ZeroDuration { level: level.level });
            }
        }

        Ok(())
    }

    /// Load configuration from `TABLE_*` environment variables, falling back
    /// to the defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from a variable lookup. `TABLE_BLIND_LEVEL_SECS`
    /// sets the level duration of the standard schedule.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            name: lookup("TABLE_NAME").unwrap_or(defaults.name),
            max_seats: parse_var(&lookup, "TABLE_MAX_SEATS")?.unwrap_or(defaults.max_seats),
            starting_stack: parse_var(&lookup, "TABLE_STARTING_STACK")?.unwrap_or(defaults.starting_stack),
            blind_schedule: match parse_var(&lookup, "TABLE_BLIND_LEVEL_SECS")? {
                Some(secs) => BlindSchedule::standard(secs),
                None => defaults.blind_schedule,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a full configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::BlindLevel;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TableConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_seat_counts() {
        for max_seats in [0, 1, MAX_SEATS + 1] {
            let config = TableConfig {
                max_seats,
                ..TableConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxSeats(n)) if n == max_seats));
        }
    }

    #[test]
    fn test_rejects_inverted_blinds() {
        let config = TableConfig {
            blind_schedule: BlindSchedule::new(vec![
                BlindLevel::new(1, 10, 20, 300),
                BlindLevel::new(2, 40, 40, 300),
            ]),
            ..TableConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBlinds { level: 2 })));
    }

    #[test]
    fn test_rejects_empty_schedule_and_zero_stack() {
        let config = TableConfig {
            blind_schedule: BlindSchedule::new(vec![]),
            ..TableConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptySchedule)));

        let config = TableConfig {
            starting_stack: 0,
            ..TableConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroStartingStack)));
    }

    #[test]
    fn test_from_lookup_uses_defaults() {
        let config = TableConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, TableConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = TableConfig::from_lookup(lookup_from(&[
            ("TABLE_NAME", "Final Table"),
            ("TABLE_MAX_SEATS", "6"),
            ("TABLE_STARTING_STACK", "1500"),
            ("TABLE_BLIND_LEVEL_SECS", "180"),
        ]))
        .unwrap();
        assert_eq!(config.name, "Final Table");
        assert_eq!(config.max_seats, 6);
        assert_eq!(config.starting_stack, 1500);
        assert!(config.blind_schedule.levels.iter().all(|bl| bl.duration_secs == 180));
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let result = TableConfig::from_lookup(lookup_from(&[("TABLE_MAX_SEATS", "lots")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "TABLE_MAX_SEATS", .. })
        ));
        let result = TableConfig::from_lookup(lookup_from(&[("TABLE_MAX_SEATS", "12")]));
        assert!(matches!(result, Err(ConfigError::InvalidMaxSeats(12))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "name": "Turbo",
            "max_seats": 6,
            "starting_stack": 2000,
            "blind_schedule": {"levels": [
                {"level": 1, "small_blind": 25, "big_blind": 50, "ante": null, "duration_secs": 180},
                {"level": 2, "small_blind": 50, "big_blind": 100, "ante": 10, "duration_secs": 180}
            ]}
        }"#;
        let config = TableConfig::from_json(json).unwrap();
        assert_eq!(config.max_seats, 6);
        assert_eq!(config.blind_schedule.levels[1].ante, Some(10));

        assert!(matches!(TableConfig::from_json("{"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_config() {
        let config = TableConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(TableConfig::from_json(&json).unwrap(), config);
    }
}
