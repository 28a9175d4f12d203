//! Draws: randomized knockout pairing and round-robin group draws.
//!
//! The random source is always passed in, so a seeded generator reproduces a draw exactly.

use crate::models::{GameMatch, Team, TeamId, TournamentError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Round label used when the caller does not supply one.
pub const DEFAULT_ROUND_LABEL: &str = "Round 1";

/// Default kick-off for drawn matches: 20:00 on the given day.
pub fn default_kickoff(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_opt(20, 0, 0).unwrap_or(NaiveTime::MIN))
}

/// Result of a knockout draw: the matches, plus the team sitting out when the count is odd.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoundDraw {
    pub matches: Vec<GameMatch>,
    pub bye: Option<Team>,
}

/// One group of a group draw with its round-robin fixtures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub name: String,
    pub team_ids: Vec<TeamId>,
    pub matches: Vec<GameMatch>,
}

/// Either kind of draw, as returned by the service layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawOutcome {
    Knockout(RoundDraw),
    Groups { groups: Vec<Group> },
}

impl DrawOutcome {
    /// Every match produced by the draw, in draw order.
    pub fn matches(&self) -> Vec<GameMatch> {
        match self {
            DrawOutcome::Knockout(round) => round.matches.clone(),
            DrawOutcome::Groups { groups } => {
                groups.iter().flat_map(|g| g.matches.iter().cloned()).collect()
            }
        }
    }
}

/// Knockout draw: shuffle (Fisher-Yates) and pair neighbours (0,1), (2,3), ...
///
/// With an odd count the last team after the shuffle gets a bye.
pub fn draw_round<R: Rng + ?Sized>(
    teams: &[Team],
    round: Option<&str>,
    scheduled_at: NaiveDateTime,
    rng: &mut R,
) -> Result<RoundDraw, TournamentError> {
    if teams.len() < 2 {
        return Err(TournamentError::InsufficientTeams {
            available: teams.len(),
        });
    }
    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);
    pair_in_order(&shuffled, round.unwrap_or(DEFAULT_ROUND_LABEL), scheduled_at)
}

/// Pair teams in the order given, without shuffling.
pub fn pair_in_order(
    ordered: &[Team],
    round: &str,
    scheduled_at: NaiveDateTime,
) -> Result<RoundDraw, TournamentError> {
    let mut matches = Vec::with_capacity(ordered.len() / 2);
    let mut bye = None;
    for chunk in ordered.chunks(2) {
        match chunk {
            [home, away] => matches.push(GameMatch::new(
                home,
                away,
                scheduled_at,
                Some(round.to_string()),
            )?),
            [odd] => bye = Some(odd.clone()),
            _ => {}
        }
    }
    Ok(RoundDraw { matches, bye })
}

/// Group draw: shuffle, split into contiguous chunks of `ceil(n / group_count)` teams
/// (the last group may be smaller) and schedule every pairing inside each group once.
///
/// Because chunks are filled first, fewer than `group_count` groups come back when the
/// teams run out early (5 teams into 4 groups gives groups of 2, 2 and 1).
pub fn draw_groups<R: Rng + ?Sized>(
    teams: &[Team],
    group_count: usize,
    scheduled_at: NaiveDateTime,
    rng: &mut R,
) -> Result<Vec<Group>, TournamentError> {
    if teams.len() < 2 {
        return Err(TournamentError::InsufficientTeams {
            available: teams.len(),
        });
    }
    if group_count == 0 || group_count > teams.len() {
        return Err(TournamentError::InvalidGroupCount(group_count));
    }

    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);

    let size = shuffled.len().div_ceil(group_count);
    shuffled
        .chunks(size)
        .enumerate()
        .map(|(i, members)| -> Result<Group, TournamentError> {
            let name = group_name(i);
            let matches = round_robin(members, &name, scheduled_at)?;
            Ok(Group {
                team_ids: members.iter().map(|t| t.id).collect(),
                name,
                matches,
            })
        })
        .collect()
}

/// "Group A" .. "Group Z", then "Group 27", "Group 28", ...
fn group_name(index: usize) -> String {
    match u8::try_from(index) {
        Ok(i) if i < 26 => format!("Group {}", char::from(b'A' + i)),
        _ => format!("Group {}", index + 1),
    }
}

/// All `g * (g - 1) / 2` pairings of a group.
fn round_robin(
    members: &[Team],
    label: &str,
    scheduled_at: NaiveDateTime,
) -> Result<Vec<GameMatch>, TournamentError> {
    let mut matches = Vec::new();
    for (i, home) in members.iter().enumerate() {
        for away in &members[i + 1..] {
            matches.push(GameMatch::new(
                home,
                away,
                scheduled_at,
                Some(label.to_string()),
            )?);
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kickoff() -> NaiveDateTime {
        default_kickoff(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap())
    }

    #[test]
    fn kickoff_is_eight_pm() {
        assert_eq!(kickoff().format("%H:%M").to_string(), "20:00");
    }

    #[test]
    fn group_names() {
        assert_eq!(group_name(0), "Group A");
        assert_eq!(group_name(25), "Group Z");
        assert_eq!(group_name(26), "Group 27");
    }

    #[test]
    fn round_robin_counts() {
        let teams: Vec<Team> = (0..5).map(|i| Team::confirmed(format!("T{i}"), format!("o{i}"))).collect();
        let matches = round_robin(&teams, "Group A", kickoff()).unwrap();
        assert_eq!(matches.len(), 10);
        assert!(matches.iter().all(|m| m.round.as_deref() == Some("Group A")));
    }

    #[test]
    fn duplicate_team_in_pool_is_same_team_error() {
        let a = Team::confirmed("A", "a");
        assert_eq!(
            pair_in_order(&[a.clone(), a], "R", kickoff()),
            Err(TournamentError::SameTeam)
        );
    }
}
