//! Grand prix state machine: start, rank selection, confirmation, teardown.

use crate::logic::rotation::generate_next_race;
use crate::models::{
    points_for_rank, GrandPrix, GrandPrixError, GrandPrixPhase, HistoryEntry, PlayerId, RaceNight,
    RaceResult,
};
use chrono::Utc;
use rand::Rng;

/// Fewest players a grand prix can run with.
const MIN_PLAYERS: usize = 2;

/// Longest fixed race count; anything above is treated as unbounded.
const MAX_BOUNDED_RACES: u32 = 12;

/// Start a grand prix: NotStarted -> Active.
///
/// `races` of `None`, zero, or more than 12 means no fixed limit. Every
/// player's `races_played` is reset so the rotation starts fair, and the
/// first group of racers is drawn immediately.
pub fn start_grand_prix(
    night: &mut RaceNight,
    controllers: usize,
    races: Option<u32>,
    rng: &mut impl Rng,
) -> Result<(), GrandPrixError> {
    if night.grand_prix.phase != GrandPrixPhase::NotStarted {
        return Err(GrandPrixError::InvalidState);
    }
    if night.players.len() < MIN_PLAYERS {
        return Err(GrandPrixError::NotEnoughPlayers {
            required: MIN_PLAYERS,
        });
    }
    if controllers < 1 || controllers > night.players.len() {
        return Err(GrandPrixError::InvalidControllerCount {
            max: night.players.len(),
        });
    }

    for p in &mut night.players {
        p.races_played = 0;
    }

    night.grand_prix = GrandPrix {
        phase: GrandPrixPhase::Active,
        race_number: 1,
        max_controllers: controllers,
        max_races: races.filter(|&r| (1..=MAX_BOUNDED_RACES).contains(&r)),
        started_at: Some(Utc::now()),
        ..GrandPrix::default()
    };
    generate_next_race(night, rng);
    Ok(())
}

/// Assign the next finishing rank (1, 2, 3, ...) to `player_id`.
///
/// A second click on an already-ranked racer, or a click on someone not in
/// the current race, is silently ignored.
pub fn select_rank(night: &mut RaceNight, player_id: PlayerId) -> Result<(), GrandPrixError> {
    let gp = &mut night.grand_prix;
    if !gp.is_active() {
        return Err(GrandPrixError::InvalidState);
    }
    if gp.has_result(player_id) || !gp.current_racers.contains(&player_id) {
        return Ok(());
    }
    let rank = gp.results.len() as u32 + 1;
    gp.results.push(RaceResult { player_id, rank });
    Ok(())
}

/// Clear the in-progress ranks for the current race. History and stats are
/// untouched.
pub fn reset_selection(night: &mut RaceNight) -> Result<(), GrandPrixError> {
    if !night.grand_prix.is_active() {
        return Err(GrandPrixError::InvalidState);
    }
    night.grand_prix.results.clear();
    Ok(())
}

/// Confirm the current race: award points per the table, count the winner's
/// win, append a history entry, then either finish the grand prix or queue
/// the next race.
pub fn confirm_results(night: &mut RaceNight, rng: &mut impl Rng) -> Result<(), GrandPrixError> {
    if !night.grand_prix.is_active() {
        return Err(GrandPrixError::InvalidState);
    }
    if !night.grand_prix.ready_to_confirm() {
        return Err(GrandPrixError::IncompleteResults);
    }

    let results = night.grand_prix.results.clone();
    for result in &results {
        if let Some(player) = night.get_player_mut(result.player_id) {
            player.add_points(points_for_rank(result.rank));
            if result.rank == 1 {
                player.add_win();
            }
            player.record_race();
        }
    }

    let race_number = night.grand_prix.race_number;
    night
        .grand_prix
        .history
        .push(HistoryEntry::new(race_number, results));

    if let Some(max_races) = night.grand_prix.max_races {
        if race_number >= max_races {
            finish(&mut night.grand_prix);
            return Ok(());
        }
    }

    night.grand_prix.race_number += 1;
    night.grand_prix.results.clear();
    generate_next_race(night, rng);
    Ok(())
}

/// End the grand prix early: Active -> Complete regardless of the race
/// counter.
pub fn end_grand_prix(night: &mut RaceNight) -> Result<(), GrandPrixError> {
    if !night.grand_prix.is_active() {
        return Err(GrandPrixError::InvalidState);
    }
    finish(&mut night.grand_prix);
    Ok(())
}

/// Soft teardown: Active or Complete -> NotStarted. The roster and its
/// accumulated stats stay as they are.
pub fn reset_grand_prix(night: &mut RaceNight) -> Result<(), GrandPrixError> {
    if night.grand_prix.phase == GrandPrixPhase::NotStarted {
        return Err(GrandPrixError::InvalidState);
    }
    night.grand_prix = GrandPrix::default();
    Ok(())
}

/// Start over with the same roster: discard the grand prix and zero every
/// player's stats.
pub fn start_new_tournament(night: &mut RaceNight) -> Result<(), GrandPrixError> {
    reset_grand_prix(night)?;
    night.reset_all_stats();
    Ok(())
}

fn finish(gp: &mut GrandPrix) {
    gp.phase = GrandPrixPhase::Complete;
    gp.current_racers.clear();
    gp.results.clear();
}
