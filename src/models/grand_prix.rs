//! GrandPrix state machine data and the RaceNight aggregate.

use crate::models::player::{Player, PlayerId};
use crate::models::race::{HistoryEntry, RaceResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors that can occur during grand prix operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GrandPrixError {
    /// Grand prix is not in a phase that allows this action.
    InvalidState,
    /// Not every current racer has a finishing rank yet.
    IncompleteResults,
    /// Not enough registered players to start (need at least 2).
    NotEnoughPlayers { required: usize },
    /// Controller count must be between 1 and the roster size.
    InvalidControllerCount { max: usize },
    /// Player not found in the roster.
    PlayerNotFound(PlayerId),
}

impl std::fmt::Display for GrandPrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrandPrixError::InvalidState => write!(f, "Invalid state for this action"),
            GrandPrixError::IncompleteResults => {
                write!(f, "Not every racer has a finishing position")
            }
            GrandPrixError::NotEnoughPlayers { required } => {
                write!(f, "Need at least {} players to start", required)
            }
            GrandPrixError::InvalidControllerCount { max } => {
                write!(f, "Controller count must be between 1 and {}", max)
            }
            GrandPrixError::PlayerNotFound(_) => write!(f, "Player not found"),
        }
    }
}

/// Current phase of the grand prix.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrandPrixPhase {
    /// Registration open; no races queued.
    #[default]
    NotStarted,
    /// Races running: selecting finishing ranks race by race.
    Active,
    /// Final standings frozen; winners announced.
    Complete,
}

/// Grand prix state: race counter, current racers, in-progress results, history.
///
/// `results`, `history` and the timestamps default when missing so snapshots
/// written before those fields existed still load.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GrandPrix {
    #[serde(default)]
    pub phase: GrandPrixPhase,
    /// 1-based while running; 0 before the first start.
    pub race_number: u32,
    pub max_controllers: usize,
    /// None means no fixed race limit.
    pub max_races: Option<u32>,
    /// Players selected for the active race, in rotation order.
    pub current_racers: Vec<PlayerId>,
    /// In-progress finishing ranks for the active race.
    #[serde(default)]
    pub results: Vec<RaceResult>,
    /// Confirmed races, append-only.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for GrandPrix {
    fn default() -> Self {
        Self {
            phase: GrandPrixPhase::NotStarted,
            race_number: 0,
            max_controllers: 4,
            max_races: None,
            current_racers: Vec::new(),
            results: Vec::new(),
            history: Vec::new(),
            started_at: None,
        }
    }
}

impl GrandPrix {
    pub fn is_active(&self) -> bool {
        self.phase == GrandPrixPhase::Active
    }

    /// All current racers have a rank and there is at least one racer.
    pub fn ready_to_confirm(&self) -> bool {
        !self.current_racers.is_empty() && self.results.len() == self.current_racers.len()
    }

    /// Whether `player_id` already has a finishing rank this race.
    pub fn has_result(&self, player_id: PlayerId) -> bool {
        self.results.iter().any(|r| r.player_id == player_id)
    }
}

/// Everything the app tracks for one tournament night: the roster, a reserved
/// auxiliary race record, and the grand prix.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RaceNight {
    /// Registration order; used only as fallback display order.
    pub players: Vec<Player>,
    /// Reserved record, kept for forward compatibility. Always empty.
    #[serde(default)]
    pub races: Vec<HistoryEntry>,
    pub grand_prix: GrandPrix,
}

impl RaceNight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player. Blank names (after trimming) are a silent no-op.
    /// Duplicate names are allowed.
    pub fn add_player(&mut self, name: impl AsRef<str>) -> Option<PlayerId> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return None;
        }
        let player = Player::new(name);
        let id = player.id;
        self.players.push(player);
        Some(id)
    }

    /// Remove a player from the roster. If the player is in the active race,
    /// they are struck from the current racers and any in-progress results;
    /// remaining ranks are renumbered compactly, preserving selection order.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<(), GrandPrixError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GrandPrixError::PlayerNotFound(id))?;
        self.players.remove(idx);

        let gp = &mut self.grand_prix;
        gp.current_racers.retain(|&r| r != id);
        if gp.results.iter().any(|r| r.player_id == id) {
            gp.results.retain(|r| r.player_id != id);
            for (i, result) in gp.results.iter_mut().enumerate() {
                result.rank = i as u32 + 1;
            }
        }
        Ok(())
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Zero every player's stats (new tournament, same roster).
    pub fn reset_all_stats(&mut self) {
        for p in &mut self.players {
            p.reset_stats();
        }
    }

    /// Wipe the roster, the reserved race record, and the grand prix.
    pub fn reset_everything(&mut self) {
        *self = Self::default();
    }
}
