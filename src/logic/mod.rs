//! Tournament night business logic: rotation, race flow, standings.

mod race_flow;
mod rotation;
mod standings;

pub use race_flow::{
    confirm_results, end_grand_prix, reset_grand_prix, reset_selection, select_rank,
    start_grand_prix, start_new_tournament,
};
pub use rotation::{calculate_fair_race_counts, generate_next_race, project_on_deck};
pub use standings::{leaderboard, state_view, tournament_winners, LeaderboardRow, StateView};
