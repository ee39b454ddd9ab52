//! Fair-queue rotation: picking who races next so everyone gets equal track
//! time over the night.

use crate::models::{PlayerId, RaceNight};
use rand::Rng;

/// Populate `current_racers` for the next race.
///
/// 1. Sort players by `races_played` (ascending).
/// 2. Break ties with a random key so repeated groupings vary.
/// 3. Take the first `min(max_controllers, players.len())`.
///
/// Re-run once per race; nothing is precomputed further ahead. The caller
/// supplies the randomness source so outcomes can be pinned in tests.
pub fn generate_next_race(night: &mut RaceNight, rng: &mut impl Rng) {
    let mut with_tiebreak: Vec<(PlayerId, u32, u32)> = night
        .players
        .iter()
        .map(|p| (p.id, p.races_played, rng.gen::<u32>()))
        .collect();
    with_tiebreak.sort_by_key(|&(_, played, tiebreak)| (played, tiebreak));

    let count = night.grand_prix.max_controllers.min(night.players.len());
    night.grand_prix.current_racers = with_tiebreak
        .into_iter()
        .take(count)
        .map(|(id, _, _)| id)
        .collect();
}

/// Project the group likely to race after the current one, for display.
///
/// Assumes every current racer finishes (one more race played each), then
/// applies the same ascending-count rule with a lexicographic name tie-break
/// so the preview is stable across re-renders. Does not mutate real state.
pub fn project_on_deck(night: &RaceNight) -> Vec<PlayerId> {
    if !night.grand_prix.is_active() {
        return Vec::new();
    }
    let racing = &night.grand_prix.current_racers;
    let mut projected: Vec<(u32, &str, PlayerId)> = night
        .players
        .iter()
        .map(|p| {
            let played = p.races_played + u32::from(racing.contains(&p.id));
            (played, p.name.as_str(), p.id)
        })
        .collect();
    projected.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));

    let count = night.grand_prix.max_controllers.min(night.players.len());
    projected.into_iter().take(count).map(|(_, _, id)| id).collect()
}

/// Race counts in 1..=12 after which every player has raced equally often:
/// R is fair iff `(R * controllers) % players == 0`. Empty for fewer than
/// two players or no controllers.
pub fn calculate_fair_race_counts(players: usize, controllers: usize) -> Vec<u32> {
    if players < 2 || controllers < 1 {
        return Vec::new();
    }
    (1..=12)
        .filter(|r| (r * controllers) % players == 0)
        .map(|r| r as u32)
        .collect()
}
