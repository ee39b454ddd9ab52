//! Player data structure and cumulative stats.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in race rosters and lookups).
pub type PlayerId = Uuid;

/// A registered player with cumulative tournament stats.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Races finished in first place.
    pub wins: u32,
    /// Accumulated points across all confirmed races.
    pub points: u32,
    /// Races participated in during the current grand prix.
    pub races_played: u32,
}

impl Player {
    /// Create a new player with the given name. Stats start at zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            wins: 0,
            points: 0,
            races_played: 0,
        }
    }

    /// Record a first-place finish.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    /// Award points for a confirmed race.
    pub fn add_points(&mut self, points: u32) {
        self.points += points;
    }

    /// Record participation in one race.
    pub fn record_race(&mut self) {
        self.races_played += 1;
    }

    /// Zero all cumulative stats (new tournament, same roster).
    pub fn reset_stats(&mut self) {
        self.wins = 0;
        self.points = 0;
        self.races_played = 0;
    }
}
