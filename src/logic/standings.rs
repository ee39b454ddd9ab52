//! Standings projections and the view-model snapshot handlers re-render
//! from. Pure view computations with no side effects.

use crate::logic::rotation::{calculate_fair_race_counts, project_on_deck};
use crate::models::{GrandPrix, GrandPrixPhase, Player, PlayerId, RaceNight};
use serde::Serialize;

/// One leaderboard row: a player and their competition rank.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub player: Player,
}

/// Rank players by points, descending. Equal totals share a rank and the
/// next distinct total gets one plus the number of players strictly ahead
/// (dense "1224" ranking). The sort is stable, so tied players keep
/// registration order.
pub fn leaderboard(players: &[Player]) -> Vec<LeaderboardRow> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.points.cmp(&a.points));

    let mut rows = Vec::with_capacity(sorted.len());
    let mut rank = 1;
    for (i, player) in sorted.iter().enumerate() {
        if i > 0 && player.points < sorted[i - 1].points {
            rank = i as u32 + 1;
        }
        rows.push(LeaderboardRow {
            rank,
            player: (*player).clone(),
        });
    }
    rows
}

/// Every player sharing the maximum point total. Ties produce co-winners;
/// there is no secondary tie-break.
pub fn tournament_winners(players: &[Player]) -> Vec<Player> {
    let Some(max_points) = players.iter().map(|p| p.points).max() else {
        return Vec::new();
    };
    players
        .iter()
        .filter(|p| p.points == max_points)
        .cloned()
        .collect()
}

/// Snapshot of everything the page renders, rebuilt after each operation.
#[derive(Debug, Serialize)]
pub struct StateView<'a> {
    pub players: &'a [Player],
    pub grand_prix: &'a GrandPrix,
    pub leaderboard: Vec<LeaderboardRow>,
    /// Projected group for the race after the current one.
    pub on_deck: Vec<PlayerId>,
    /// Race counts in 1..=12 that give everyone equal track time with the
    /// current roster and controller count.
    pub fair_race_counts: Vec<u32>,
    /// Co-winners once the grand prix is complete, otherwise empty.
    pub winners: Vec<Player>,
}

pub fn state_view(night: &RaceNight) -> StateView<'_> {
    let winners = if night.grand_prix.phase == GrandPrixPhase::Complete {
        tournament_winners(&night.players)
    } else {
        Vec::new()
    };
    StateView {
        players: &night.players,
        grand_prix: &night.grand_prix,
        leaderboard: leaderboard(&night.players),
        on_deck: project_on_deck(night),
        fair_race_counts: calculate_fair_race_counts(
            night.players.len(),
            night.grand_prix.max_controllers,
        ),
        winners,
    }
}
