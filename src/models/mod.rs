//! Data structures for the tournament night: players, races, grand prix state.

mod grand_prix;
mod player;
mod race;

pub use grand_prix::{GrandPrix, GrandPrixError, GrandPrixPhase, RaceNight};
pub use player::{Player, PlayerId};
pub use race::{points_for_rank, HistoryEntry, RaceResult};
