//! Per-race records: finishing positions and the points table.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One finishing position in a race. Ranks start at 1.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RaceResult {
    pub player_id: PlayerId,
    pub rank: u32,
}

/// A confirmed race, appended to the grand prix history.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub race_number: u32,
    pub results: Vec<RaceResult>,
    /// Absent in snapshots written before timestamps were recorded.
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl HistoryEntry {
    pub fn new(race_number: u32, results: Vec<RaceResult>) -> Self {
        Self {
            race_number,
            results,
            recorded_at: Some(Utc::now()),
        }
    }
}

/// Points awarded per finishing rank. Ranks beyond twelfth score a single point.
pub fn points_for_rank(rank: u32) -> u32 {
    match rank {
        1 => 15,
        2 => 12,
        3 => 10,
        4 => 9,
        5 => 8,
        6 => 7,
        7 => 6,
        8 => 5,
        9 => 4,
        10 => 3,
        11 => 2,
        _ => 1,
    }
}
