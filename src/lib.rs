//! Racing-game tournament night organizer: library with models and business logic.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    calculate_fair_race_counts, confirm_results, end_grand_prix, generate_next_race, leaderboard,
    project_on_deck, reset_grand_prix, reset_selection, select_rank, start_grand_prix,
    start_new_tournament, state_view, tournament_winners, LeaderboardRow, StateView,
};
pub use models::{
    points_for_rank, GrandPrix, GrandPrixError, GrandPrixPhase, HistoryEntry, Player, PlayerId,
    RaceNight, RaceResult,
};
pub use storage::Storage;
