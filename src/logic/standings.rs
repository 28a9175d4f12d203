//! Standings: applying match results to team statistics, ranking, and replaying history.

use crate::models::{GameMatch, Team, TournamentError};
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Points for a win and a draw (a loss gives nothing).
pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// Highest score accepted for one side of a match.
pub const MAX_SCORE: u32 = 999;

/// Check that a score is a whole number in `0..=MAX_SCORE`.
pub fn validate_score(score: i64) -> Result<u32, TournamentError> {
    u32::try_from(score)
        .ok()
        .filter(|s| *s <= MAX_SCORE)
        .ok_or(TournamentError::InvalidScore)
}

/// Parse a score as sent by clients: a JSON integer or a numeric string ("3", " 2 ").
/// Fractions, words, booleans, null and negative values are `InvalidScore`.
pub fn parse_score(value: &Value) -> Result<u32, TournamentError> {
    let raw = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    validate_score(raw.ok_or(TournamentError::InvalidScore)?)
}

/// Apply one reported result to both teams.
///
/// Both scores are validated and every counter is added with overflow checks before anything
/// is written back, so a failed call leaves the teams as they were. The update is additive: calling it twice for the same match counts the match
/// twice, and guarding against that is the caller's job (see [`crate::logic::report_result`]).
pub fn apply_result(
    team1: &mut Team,
    team2: &mut Team,
    score1: i64,
    score2: i64,
) -> Result<(), TournamentError> {
    let s1 = validate_score(score1)?;
    let s2 = validate_score(score2)?;
    apply_validated(team1, team2, s1, s2)
}

fn add(counter: u32, amount: u32) -> Result<u32, TournamentError> {
    counter.checked_add(amount).ok_or(TournamentError::InvalidScore)
}

fn apply_validated(team1: &mut Team, team2: &mut Team, s1: u32, s2: u32) -> Result<(), TournamentError> {
    let mut a = team1.stats.clone();
    let mut b = team2.stats.clone();

    a.goals_for = add(a.goals_for, s1)?;
    b.goals_against = add(b.goals_against, s1)?;
    b.goals_for = add(b.goals_for, s2)?;
    a.goals_against = add(a.goals_against, s2)?;
    a.played = add(a.played, 1)?;
    b.played = add(b.played, 1)?;

    match s1.cmp(&s2) {
        Ordering::Greater => {
            a.wins = add(a.wins, 1)?;
            a.points = add(a.points, POINTS_FOR_WIN)?;
            b.losses = add(b.losses, 1)?;
        }
        Ordering::Less => {
            b.wins = add(b.wins, 1)?;
            b.points = add(b.points, POINTS_FOR_WIN)?;
            a.losses = add(a.losses, 1)?;
        }
        Ordering::Equal => {
            a.draws = add(a.draws, 1)?;
            b.draws = add(b.draws, 1)?;
            a.points = add(a.points, POINTS_FOR_DRAW)?;
            b.points = add(b.points, POINTS_FOR_DRAW)?;
        }
    }

    a.refresh_derived();
    b.refresh_derived();
    team1.stats = a;
    team2.stats = b;
    Ok(())
}

/// One row of the standings table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Standing {
    /// 1-based; teams level on every criterion still get distinct positions.
    pub position: usize,
    #[serde(flatten)]
    pub team: Team,
}

/// Order used by the table: points, then goal difference, then goals scored (all descending).
pub fn compare_teams(a: &Team, b: &Team) -> Ordering {
    b.stats
        .points
        .cmp(&a.stats.points)
        .then_with(|| b.stats.goal_difference.cmp(&a.stats.goal_difference))
        .then_with(|| b.stats.goals_for.cmp(&a.stats.goals_for))
}

/// Rank the given teams. The sort is stable, so complete ties keep their input order.
pub fn rank(teams: &[Team]) -> Vec<Standing> {
    let mut sorted: Vec<&Team> = teams.iter().collect();
    sorted.sort_by(|a, b| compare_teams(a, b));
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, team)| Standing {
            position: i + 1,
            team: team.clone(),
        })
        .collect()
}

/// Rebuild every confirmed team's statistics from the completed matches.
///
/// Matches are replayed in kick-off order. A completed match is skipped when either side is no
/// longer a confirmed team in `teams` (a deleted team takes its results with it, for the
/// opponent too). Returns how many matches were applied.
pub fn recompute(teams: &mut [Team], matches: &[GameMatch]) -> usize {
    for team in teams.iter_mut().filter(|t| t.is_confirmed()) {
        team.stats.reset();
    }

    let mut completed: Vec<&GameMatch> = matches.iter().filter(|m| m.is_completed()).collect();
    completed.sort_by_key(|m| m.scheduled_at);

    let mut applied = 0;
    for m in completed {
        let i = teams.iter().position(|t| t.id == m.team1_id && t.is_confirmed());
        let j = teams.iter().position(|t| t.id == m.team2_id && t.is_confirmed());
        let (Some(i), Some(j)) = (i, j) else {
            log::warn!("Skipping match {} in recompute: team no longer confirmed", m.id);
            continue;
        };
        let Some((t1, t2)) = pair_mut(teams, i, j) else {
            continue;
        };
        let replayed = match (validate_score(m.score1.into()), validate_score(m.score2.into())) {
            (Ok(s1), Ok(s2)) => apply_validated(t1, t2, s1, s2),
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        match replayed {
            Ok(()) => applied += 1,
            Err(e) => log::warn!("Skipping match {} in recompute: {}", m.id, e),
        }
    }
    applied
}

/// Two distinct mutable elements of a slice, in the order asked for.
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> Option<(&mut T, &mut T)> {
    match i.cmp(&j) {
        Ordering::Less => {
            let (left, right) = items.split_at_mut(j);
            Some((&mut left[i], &mut right[0]))
        }
        Ordering::Greater => {
            let (left, right) = items.split_at_mut(i);
            Some((&mut right[0], &mut left[j]))
        }
        Ordering::Equal => None,
    }
}

/// Render the table as CSV (header row plus one row per team).
pub fn standings_csv(rows: &[Standing]) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    {
        let mut wtr = csv::Writer::from_writer(&mut buf);
        wtr.write_record([
            "position",
            "team",
            "owner",
            "played",
            "wins",
            "draws",
            "losses",
            "goals_for",
            "goals_against",
            "goal_difference",
            "points",
        ])?;
        for row in rows {
            let s = &row.team.stats;
            wtr.write_record([
                row.position.to_string(),
                row.team.name.clone(),
                row.team.owner.clone(),
                s.played.to_string(),
                s.wins.to_string(),
                s.draws.to_string(),
                s.losses.to_string(),
                s.goals_for.to_string(),
                s.goals_against.to_string(),
                s.goal_difference.to_string(),
                s.points.to_string(),
            ])?;
        }
        wtr.flush()?;
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TeamStats;
    use serde_json::json;

    fn pair() -> (Team, Team) {
        (Team::confirmed("A", "a"), Team::confirmed("B", "b"))
    }

    #[test]
    fn parse_score_accepts_integers_and_numeric_strings() {
        assert_eq!(parse_score(&json!(3)), Ok(3));
        assert_eq!(parse_score(&json!("4")), Ok(4));
        assert_eq!(parse_score(&json!(" 0 ")), Ok(0));
    }

    #[test]
    fn parse_score_rejects_garbage() {
        for v in [json!(-1), json!("-2"), json!(1.5), json!("two"), json!(null), json!(true)] {
            assert_eq!(parse_score(&v), Err(TournamentError::InvalidScore), "{v}");
        }
    }

    #[test]
    fn negative_score_leaves_teams_untouched() {
        let (mut a, mut b) = pair();
        assert_eq!(
            apply_result(&mut a, &mut b, 2, -1),
            Err(TournamentError::InvalidScore)
        );
        assert_eq!(a.stats, TeamStats::default());
        assert_eq!(b.stats, TeamStats::default());
    }

    #[test]
    fn scores_above_the_limit_are_rejected() {
        assert_eq!(validate_score(i64::from(MAX_SCORE)), Ok(MAX_SCORE));
        assert_eq!(validate_score(1000), Err(TournamentError::InvalidScore));
        assert_eq!(validate_score(2_147_483_648), Err(TournamentError::InvalidScore));
        assert_eq!(parse_score(&json!("4294967295")), Err(TournamentError::InvalidScore));
    }

    #[test]
    fn counter_overflow_leaves_both_teams_untouched() {
        let (mut a, mut b) = pair();
        a.stats.goals_for = u32::MAX - 2;
        a.stats.wins = 1;
        a.stats.points = 3;
        b.stats.goals_against = u32::MAX - 2;
        b.stats.losses = 1;
        a.stats.refresh_derived();
        b.stats.refresh_derived();
        let (before_a, before_b) = (a.stats.clone(), b.stats.clone());

        assert_eq!(apply_result(&mut a, &mut b, 5, 0), Err(TournamentError::InvalidScore));
        assert_eq!(a.stats, before_a);
        assert_eq!(b.stats, before_b);
    }

    #[test]
    fn points_per_match_are_three_or_two() {
        for (s1, s2) in [(0, 0), (1, 0), (0, 4), (5, 5), (7, 2)] {
            let (mut a, mut b) = pair();
            apply_result(&mut a, &mut b, s1, s2).unwrap();
            let total = a.stats.points + b.stats.points;
            if s1 == s2 {
                assert_eq!(total, 2);
            } else {
                assert_eq!(total, 3);
            }
            assert!(a.stats.is_consistent() && b.stats.is_consistent());
        }
    }

    #[test]
    fn rank_breaks_ties_by_goal_difference_then_goals_for() {
        let mut a = Team::confirmed("A", "a");
        let mut b = Team::confirmed("B", "b");
        let mut c = Team::confirmed("C", "c");
        let mut d = Team::confirmed("D", "d");
        a.stats = TeamStats { points: 3, goals_for: 1, goals_against: 0, ..Default::default() };
        b.stats = TeamStats { points: 3, goals_for: 4, goals_against: 1, ..Default::default() };
        c.stats = TeamStats { points: 3, goals_for: 5, goals_against: 2, ..Default::default() };
        d.stats = TeamStats { points: 4, ..Default::default() };
        for t in [&mut a, &mut b, &mut c, &mut d] {
            t.stats.refresh_derived();
        }

        let table = rank(&[a, b, c, d]);
        let names: Vec<_> = table.iter().map(|s| s.team.name.as_str()).collect();
        assert_eq!(names, ["D", "C", "B", "A"]);
        let positions: Vec<_> = table.iter().map(|s| s.position).collect();
        assert_eq!(positions, [1, 2, 3, 4]);
    }

    #[test]
    fn complete_ties_keep_input_order() {
        let table = rank(&[Team::confirmed("X", "x"), Team::confirmed("Y", "y")]);
        assert_eq!(table[0].team.name, "X");
        assert_eq!(table[1].position, 2);
    }

    #[test]
    fn pair_mut_returns_requested_order() {
        let mut v = vec![1, 2, 3];
        let (x, y) = pair_mut(&mut v, 2, 0).unwrap();
        assert_eq!((*x, *y), (3, 1));
        assert!(pair_mut(&mut v, 1, 1).is_none());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let (mut a, mut b) = pair();
        apply_result(&mut a, &mut b, 2, 0).unwrap();
        let csv = standings_csv(&rank(&[b, a])).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("position,team,owner"));
        assert_eq!(lines[1], "1,A,a,1,1,0,0,2,0,2,3");
        assert_eq!(lines[2], "2,B,b,1,0,0,1,0,2,-2,0");
    }
}
