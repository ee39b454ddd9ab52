//! Integration tests for the grand prix flow: start, rank selection,
//! confirmation, completion, and resets.

use grand_prix_web::{
    confirm_results, end_grand_prix, reset_grand_prix, reset_selection, select_rank,
    start_grand_prix, start_new_tournament, tournament_winners, GrandPrixError, GrandPrixPhase,
    RaceNight,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn night_with_players(n: usize) -> RaceNight {
    let mut night = RaceNight::new();
    for i in 0..n {
        night.add_player(format!("P{i}"));
    }
    night
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn start_populates_first_race() {
    let mut night = night_with_players(6);
    start_grand_prix(&mut night, 4, Some(8), &mut rng()).unwrap();

    let gp = &night.grand_prix;
    assert_eq!(gp.phase, GrandPrixPhase::Active);
    assert_eq!(gp.race_number, 1);
    assert_eq!(gp.max_races, Some(8));
    assert_eq!(gp.current_racers.len(), 4);
    assert!(gp.results.is_empty());
    assert!(gp.history.is_empty());
    assert!(gp.started_at.is_some());
    assert!(night.players.iter().all(|p| p.races_played == 0));
}

#[test]
fn start_twice_is_invalid() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 2, None, &mut rng()).unwrap();
    assert_eq!(
        start_grand_prix(&mut night, 2, None, &mut rng()),
        Err(GrandPrixError::InvalidState)
    );
}

#[test]
fn start_requires_two_players() {
    let mut night = night_with_players(1);
    assert_eq!(
        start_grand_prix(&mut night, 1, None, &mut rng()),
        Err(GrandPrixError::NotEnoughPlayers { required: 2 })
    );
}

#[test]
fn start_rejects_bad_controller_counts() {
    let mut night = night_with_players(3);
    assert_eq!(
        start_grand_prix(&mut night, 0, None, &mut rng()),
        Err(GrandPrixError::InvalidControllerCount { max: 3 })
    );
    assert_eq!(
        start_grand_prix(&mut night, 4, None, &mut rng()),
        Err(GrandPrixError::InvalidControllerCount { max: 3 })
    );
}

#[test]
fn race_count_above_twelve_is_unbounded() {
    let mut night = night_with_players(2);
    start_grand_prix(&mut night, 2, Some(13), &mut rng()).unwrap();
    assert_eq!(night.grand_prix.max_races, None);
}

#[test]
fn points_and_wins_follow_the_table() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in &racers {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();

    let expected_points = [15, 12, 10, 9];
    for (i, &id) in racers.iter().enumerate() {
        let p = night.get_player(id).unwrap();
        assert_eq!(p.points, expected_points[i]);
        assert_eq!(p.wins, u32::from(i == 0));
        assert_eq!(p.races_played, 1);
    }

    assert_eq!(night.grand_prix.history.len(), 1);
    let entry = &night.grand_prix.history[0];
    assert_eq!(entry.race_number, 1);
    assert_eq!(entry.results.len(), 4);
    assert!(entry.recorded_at.is_some());
}

#[test]
fn rank_beyond_table_scores_one_point() {
    let mut night = night_with_players(13);
    start_grand_prix(&mut night, 13, None, &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in &racers {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();

    let twelfth = night.get_player(racers[11]).unwrap();
    let thirteenth = night.get_player(racers[12]).unwrap();
    assert_eq!(twelfth.points, 1);
    assert_eq!(thirteenth.points, 1);
}

#[test]
fn select_rank_is_idempotent() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let id = night.grand_prix.current_racers[0];
    select_rank(&mut night, id).unwrap();
    select_rank(&mut night, id).unwrap();

    assert_eq!(night.grand_prix.results.len(), 1);
    assert_eq!(night.grand_prix.results[0].rank, 1);
}

#[test]
fn select_rank_ignores_players_outside_the_race() {
    let mut night = night_with_players(5);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let sitting_out = night
        .players
        .iter()
        .map(|p| p.id)
        .find(|id| !night.grand_prix.current_racers.contains(id))
        .unwrap();
    select_rank(&mut night, sitting_out).unwrap();
    assert!(night.grand_prix.results.is_empty());
}

#[test]
fn ranks_form_a_permutation_prefix() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in racers.iter().take(3) {
        select_rank(&mut night, id).unwrap();
    }

    let gp = &night.grand_prix;
    assert!(gp.results.len() <= gp.current_racers.len());
    let ranks: Vec<u32> = gp.results.iter().map(|r| r.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[test]
fn confirm_requires_every_rank() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let id = night.grand_prix.current_racers[0];
    select_rank(&mut night, id).unwrap();
    assert_eq!(
        confirm_results(&mut night, &mut rng()),
        Err(GrandPrixError::IncompleteResults)
    );
}

#[test]
fn reset_selection_clears_only_the_current_race() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in &racers {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();

    let id = night.grand_prix.current_racers[0];
    select_rank(&mut night, id).unwrap();
    reset_selection(&mut night).unwrap();

    assert!(night.grand_prix.results.is_empty());
    assert_eq!(night.grand_prix.history.len(), 1);
    assert_eq!(night.get_player(racers[0]).unwrap().points, 15);
}

#[test]
fn completes_once_the_race_limit_is_reached() {
    let mut night = night_with_players(2);
    start_grand_prix(&mut night, 2, Some(1), &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in &racers {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();

    let gp = &night.grand_prix;
    assert_eq!(gp.phase, GrandPrixPhase::Complete);
    assert!(gp.current_racers.is_empty());
    assert!(gp.results.is_empty());
    assert_eq!(gp.history.len(), 1);
}

#[test]
fn rotation_queues_the_rested_players_next() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 2, None, &mut rng()).unwrap();

    let first_race = night.grand_prix.current_racers.clone();
    for &id in &first_race {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();

    let gp = &night.grand_prix;
    assert_eq!(gp.race_number, 2);
    assert_eq!(gp.current_racers.len(), 2);
    assert!(gp.current_racers.iter().all(|id| !first_race.contains(id)));
}

#[test]
fn races_played_spread_never_exceeds_one() {
    let mut night = night_with_players(5);
    let mut rng = rng();
    start_grand_prix(&mut night, 2, None, &mut rng).unwrap();

    for _ in 0..20 {
        let racers = night.grand_prix.current_racers.clone();
        for &id in &racers {
            select_rank(&mut night, id).unwrap();
        }
        confirm_results(&mut night, &mut rng).unwrap();

        let min = night.players.iter().map(|p| p.races_played).min().unwrap();
        let max = night.players.iter().map(|p| p.races_played).max().unwrap();
        assert!(max - min <= 1, "spread {} after race", max - min);
    }
}

#[test]
fn end_early_freezes_standings() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, Some(10), &mut rng()).unwrap();
    end_grand_prix(&mut night).unwrap();

    assert_eq!(night.grand_prix.phase, GrandPrixPhase::Complete);
    assert!(night.grand_prix.current_racers.is_empty());
    assert_eq!(end_grand_prix(&mut night), Err(GrandPrixError::InvalidState));
}

#[test]
fn tied_top_scores_share_the_win() {
    let mut night = night_with_players(3);
    start_grand_prix(&mut night, 3, None, &mut rng()).unwrap();

    let ids: Vec<_> = night.players.iter().map(|p| p.id).collect();
    night.get_player_mut(ids[0]).unwrap().points = 30;
    night.get_player_mut(ids[1]).unwrap().points = 30;
    night.get_player_mut(ids[2]).unwrap().points = 20;
    end_grand_prix(&mut night).unwrap();

    let winners = tournament_winners(&night.players);
    assert_eq!(winners.len(), 2);
    assert!(winners.iter().all(|w| w.points == 30));
}

#[test]
fn removing_a_racer_strikes_and_renumbers() {
    let mut night = night_with_players(4);
    start_grand_prix(&mut night, 4, None, &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    select_rank(&mut night, racers[0]).unwrap();
    select_rank(&mut night, racers[1]).unwrap();
    night.remove_player(racers[0]).unwrap();

    let gp = &night.grand_prix;
    assert_eq!(gp.current_racers.len(), 3);
    assert!(!gp.current_racers.contains(&racers[0]));
    assert_eq!(gp.results.len(), 1);
    assert_eq!(gp.results[0].player_id, racers[1]);
    assert_eq!(gp.results[0].rank, 1);
}

#[test]
fn new_tournament_keeps_roster_and_zeroes_stats() {
    let mut night = night_with_players(2);
    start_grand_prix(&mut night, 2, Some(1), &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in &racers {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();
    start_new_tournament(&mut night).unwrap();

    assert_eq!(night.grand_prix.phase, GrandPrixPhase::NotStarted);
    assert!(night.grand_prix.history.is_empty());
    assert_eq!(night.players.len(), 2);
    assert!(night
        .players
        .iter()
        .all(|p| p.points == 0 && p.wins == 0 && p.races_played == 0));
}

#[test]
fn soft_reset_keeps_accumulated_stats() {
    let mut night = night_with_players(2);
    start_grand_prix(&mut night, 2, None, &mut rng()).unwrap();

    let racers = night.grand_prix.current_racers.clone();
    for &id in &racers {
        select_rank(&mut night, id).unwrap();
    }
    confirm_results(&mut night, &mut rng()).unwrap();
    reset_grand_prix(&mut night).unwrap();

    assert_eq!(night.grand_prix.phase, GrandPrixPhase::NotStarted);
    assert_eq!(night.get_player(racers[0]).unwrap().points, 15);
}

#[test]
fn blank_names_are_ignored() {
    let mut night = RaceNight::new();
    assert_eq!(night.add_player("   "), None);
    assert_eq!(night.add_player(""), None);
    assert!(night.add_player("  Mia  ").is_some());
    assert_eq!(night.players.len(), 1);
    assert_eq!(night.players[0].name, "Mia");
}
