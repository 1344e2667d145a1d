//! Random seat assignment so players can't pick their neighbours.

use log::info;
use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::BTreeMap;

use super::config::TableConfig;
use crate::game::entities::{Player, PlayerId, SeatIndex};
use crate::game::state_machine::{EngineError, EngineResult, Table};

/// Seat randomizer, generic over the RNG so seating can be replayed from a
/// seed.
pub struct SeatRandomizer<R> {
    rng: R,
}

impl SeatRandomizer<ThreadRng> {
    #[must_use]
    pub fn from_thread_rng() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for SeatRandomizer<ThreadRng> {
    fn default() -> Self {
        Self::from_thread_rng()
    }
}

impl<R: Rng> SeatRandomizer<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Assign a distinct random seat below `max_seats` to each player.
    /// Players past the number of seats aren't seated.
    pub fn assign_seats(&mut self, player_ids: &[PlayerId], max_seats: usize) -> BTreeMap<PlayerId, SeatIndex> {
        let mut available_seats: Vec<SeatIndex> = (0..max_seats).collect();
        available_seats.shuffle(&mut self.rng);
        player_ids.iter().copied().zip(available_seats).collect()
    }

    /// Pick a random free seat, or nothing if the table is full.
    pub fn find_random_seat(&mut self, occupied_seats: &[SeatIndex], max_seats: usize) -> Option<SeatIndex> {
        let available_seats: Vec<SeatIndex> = (0..max_seats)
            .filter(|seat| !occupied_seats.contains(seat))
            .collect();
        available_seats.choose(&mut self.rng).copied()
    }
}

impl Table {
    /// Seat `player_ids` at random with the configured starting stack. The
    /// table starts between hands with every player Sitting.
    pub fn seat_players<R: Rng>(config: &TableConfig, player_ids: &[PlayerId], rng: R) -> EngineResult<Self> {
        config.validate()?;
        if player_ids.len() > config.max_seats {
            return Err(EngineError::TableFull {
                max_seats: config.max_seats,
            });
        }
        let seats = SeatRandomizer::new(rng).assign_seats(player_ids, config.max_seats);
        if seats.len() != player_ids.len() {
            let duplicate = player_ids
                .iter()
                .copied()
                .find(|id| player_ids.iter().filter(|other| *other == id).count() > 1)
                .unwrap_or_default();
            return Err(EngineError::DuplicatePlayer(duplicate));
        }
        info!("seating {} players at {}", player_ids.len(), config.name);
        let players = seats
            .into_iter()
            .map(|(id, seat)| Player::new(id, seat, config.starting_stack))
            .collect();
        Table::new(players)
    }
}
