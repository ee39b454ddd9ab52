//! Persistence: three independent JSON records in a data directory.
//!
//! The records are `players`, `races` (reserved, always empty) and
//! `grand-prix`. Each is a standalone blob so a snapshot written by an older
//! build still loads: missing files fall back to defaults, and missing
//! optional fields inside the grand prix record default via serde.

use crate::models::{GrandPrix, HistoryEntry, Player, RaceNight};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

const PLAYERS_RECORD: &str = "players.json";
const RACES_RECORD: &str = "races.json";
const GRAND_PRIX_RECORD: &str = "grand-prix.json";

/// Handle on the data directory holding the three records.
#[derive(Clone, Debug)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load the full state. Missing records default; an unreadable record is
    /// an error for the caller to report.
    pub fn load(&self) -> io::Result<RaceNight> {
        let players: Vec<Player> = self.load_record(PLAYERS_RECORD)?;
        let races: Vec<HistoryEntry> = self.load_record(RACES_RECORD)?;
        let grand_prix: GrandPrix = self.load_record(GRAND_PRIX_RECORD)?;
        Ok(RaceNight {
            players,
            races,
            grand_prix,
        })
    }

    /// Rewrite all three records. Creates the data directory if needed.
    pub fn save(&self, night: &RaceNight) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        self.save_record(PLAYERS_RECORD, &night.players)?;
        self.save_record(RACES_RECORD, &night.races)?;
        self.save_record(GRAND_PRIX_RECORD, &night.grand_prix)?;
        Ok(())
    }

    fn load_record<T: DeserializeOwned + Default>(&self, name: &str) -> io::Result<T> {
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(T::default()),
            Err(e) => Err(e),
        }
    }

    fn save_record<T: Serialize>(&self, name: &str, value: &T) -> io::Result<()> {
        let path = self.dir.join(name);
        let data = serde_json::to_string_pretty(value)?;
        std::fs::write(path, data)
    }
}
