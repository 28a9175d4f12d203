//! Integration tests for knockout and group draws with seeded random sources.

use chrono::NaiveDate;
use football_tournament_web::{
    default_kickoff, draw_groups, draw_round, pair_in_order, MatchState, Team, TeamId,
    TournamentError,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;

fn teams(n: usize) -> Vec<Team> {
    (0..n)
        .map(|i| Team::confirmed(format!("T{i}"), format!("owner{i}")))
        .collect()
}

fn kickoff() -> chrono::NaiveDateTime {
    default_kickoff(NaiveDate::from_ymd_opt(2026, 9, 12).unwrap())
}

#[test]
fn fewer_than_two_teams_is_insufficient() {
    let mut rng = StdRng::seed_from_u64(1);
    for n in 0..2 {
        assert_eq!(
            draw_round(&teams(n), None, kickoff(), &mut rng),
            Err(TournamentError::InsufficientTeams { available: n })
        );
        assert_eq!(
            draw_groups(&teams(n), 1, kickoff(), &mut rng),
            Err(TournamentError::InsufficientTeams { available: n })
        );
    }
}

#[test]
fn round_pairs_everyone_once_and_marks_a_single_bye() {
    for n in 2..=13 {
        let pool = teams(n);
        let draw = draw_round(&pool, None, kickoff(), &mut StdRng::seed_from_u64(n as u64)).unwrap();

        assert_eq!(draw.matches.len(), n / 2);
        let mut seen: HashSet<TeamId> = HashSet::new();
        for m in &draw.matches {
            assert_ne!(m.team1_id, m.team2_id);
            assert!(seen.insert(m.team1_id));
            assert!(seen.insert(m.team2_id));
            assert_eq!(m.state, MatchState::Upcoming);
            assert_eq!((m.score1, m.score2), (0, 0));
            assert_eq!(m.round.as_deref(), Some("Round 1"));
        }
        match &draw.bye {
            Some(bye) => {
                assert_eq!(n % 2, 1);
                assert!(!seen.contains(&bye.id));
                seen.insert(bye.id);
            }
            None => assert_eq!(n % 2, 0),
        }
        assert_eq!(seen.len(), n);
    }
}

#[test]
fn same_seed_same_draw() {
    let pool = teams(8);
    let a = draw_round(&pool, Some("Quarter-finals"), kickoff(), &mut StdRng::seed_from_u64(42)).unwrap();
    let b = draw_round(&pool, Some("Quarter-finals"), kickoff(), &mut StdRng::seed_from_u64(42)).unwrap();
    let pairs = |d: &football_tournament_web::RoundDraw| -> Vec<(TeamId, TeamId)> {
        d.matches.iter().map(|m| (m.team1_id, m.team2_id)).collect()
    };
    assert_eq!(pairs(&a), pairs(&b));
    assert!(a.matches.iter().all(|m| m.round.as_deref() == Some("Quarter-finals")));
}

#[test]
fn pairing_follows_the_shuffled_order() {
    let pool = teams(6);
    let mut expected = pool.clone();
    expected.shuffle(&mut StdRng::seed_from_u64(2026));

    let draw = draw_round(&pool, None, kickoff(), &mut StdRng::seed_from_u64(2026)).unwrap();
    let got: Vec<(TeamId, TeamId)> = draw.matches.iter().map(|m| (m.team1_id, m.team2_id)).collect();
    let want: Vec<(TeamId, TeamId)> = expected.chunks(2).map(|c| (c[0].id, c[1].id)).collect();
    assert_eq!(got, want);
}

#[test]
fn three_teams_shuffled_to_c_a_b() {
    let a = Team::confirmed("A", "a");
    let b = Team::confirmed("B", "b");
    let c = Team::confirmed("C", "c");
    let pool = vec![a.clone(), b.clone(), c.clone()];

    // Find a seed whose shuffle puts the pool in the order [C, A, B].
    let seed = (0..10_000u64)
        .find(|seed| {
            let mut order = pool.clone();
            order.shuffle(&mut StdRng::seed_from_u64(*seed));
            order.iter().map(|t| t.id).eq([c.id, a.id, b.id])
        })
        .expect("some seed yields [C, A, B]");

    let draw = draw_round(&pool, None, kickoff(), &mut StdRng::seed_from_u64(seed)).unwrap();
    assert_eq!(draw.matches.len(), 1);
    assert_eq!(draw.matches[0].team1_id, c.id);
    assert_eq!(draw.matches[0].team2_id, a.id);
    assert_eq!(draw.bye.map(|t| t.id), Some(b.id));

    // Same ordering without randomness.
    let direct = pair_in_order(&[c.clone(), a.clone(), b.clone()], "Round 1", kickoff()).unwrap();
    assert_eq!(direct.matches[0].team1_name, "C");
    assert_eq!(direct.matches[0].team2_name, "A");
    assert_eq!(direct.bye.map(|t| t.name), Some("B".to_string()));
}

#[test]
fn invalid_group_counts() {
    let mut rng = StdRng::seed_from_u64(3);
    assert_eq!(
        draw_groups(&teams(4), 0, kickoff(), &mut rng),
        Err(TournamentError::InvalidGroupCount(0))
    );
    assert_eq!(
        draw_groups(&teams(4), 5, kickoff(), &mut rng),
        Err(TournamentError::InvalidGroupCount(5))
    );
}

#[test]
fn groups_partition_teams_and_play_round_robin() {
    for (n, k) in [(2, 1), (8, 2), (9, 2), (10, 3), (12, 4), (5, 4), (7, 7)] {
        let pool = teams(n);
        let groups = draw_groups(&pool, k, kickoff(), &mut StdRng::seed_from_u64(99)).unwrap();
        let size = n.div_ceil(k);

        let mut seen: HashSet<TeamId> = HashSet::new();
        let mut expected_matches = 0;
        let mut total_matches = 0;
        for g in &groups {
            assert!(g.team_ids.len() <= size);
            for id in &g.team_ids {
                assert!(seen.insert(*id), "team drawn twice");
            }
            let gs = g.team_ids.len();
            expected_matches += gs * (gs.saturating_sub(1)) / 2;
            total_matches += g.matches.len();

            let mut pairings: HashSet<(TeamId, TeamId)> = HashSet::new();
            for m in &g.matches {
                assert!(g.team_ids.contains(&m.team1_id) && g.team_ids.contains(&m.team2_id));
                assert_eq!(m.round.as_deref(), Some(g.name.as_str()));
                let key = if m.team1_id < m.team2_id {
                    (m.team1_id, m.team2_id)
                } else {
                    (m.team2_id, m.team1_id)
                };
                assert!(pairings.insert(key), "pairing scheduled twice");
            }
        }
        assert_eq!(seen.len(), n);
        assert_eq!(total_matches, expected_matches);
        assert!(groups.len() <= k);
    }
}

#[test]
fn group_names_are_lettered() {
    let groups = draw_groups(&teams(6), 3, kickoff(), &mut StdRng::seed_from_u64(5)).unwrap();
    let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["Group A", "Group B", "Group C"]);
    assert!(groups.iter().all(|g| g.matches.len() == 1));
}
