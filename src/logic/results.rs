//! Match results and scheduling: reporting, corrections, recompute, manual matches and the draw.
//!
//! Every function here does load -> compute -> save against the repositories and only saves
//! once every step has succeeded. Callers hold the store exclusively for the whole call.

use crate::logic::draw::{draw_groups, draw_round, DrawOutcome};
use crate::logic::standings::{apply_result, recompute, validate_score};
use crate::models::{GameMatch, MatchId, MatchState, Team, TeamId, TournamentError};
use crate::store::{MatchRepository, TeamRepository};
use chrono::NaiveDateTime;
use rand::Rng;

/// Resolve a team id to a confirmed team (anything else counts as not found).
pub fn confirmed_team<S>(store: &S, id: TeamId) -> Result<Team, TournamentError>
where
    S: TeamRepository + ?Sized,
{
    store
        .team_by_id(id)
        .ok()
        .filter(Team::is_confirmed)
        .ok_or(TournamentError::TeamNotFound(id))
}

/// Record a score and/or move a match forward in its lifecycle.
///
/// Team statistics change only on the edge into `Completed`, exactly once. A completed match is
/// closed: reporting it again is `DuplicateApplication` (fix scores with [`correct_result`]), and
/// moving any match backwards is `InvalidTransition`.
pub fn report_result<S>(
    store: &mut S,
    match_id: MatchId,
    score1: i64,
    score2: i64,
    new_state: MatchState,
) -> Result<GameMatch, TournamentError>
where
    S: TeamRepository + MatchRepository + ?Sized,
{
    let s1 = validate_score(score1)?;
    let s2 = validate_score(score2)?;
    let mut game = store.match_by_id(match_id)?;

    if game.state == MatchState::Completed {
        if new_state == MatchState::Completed {
            log::warn!("Rejected second completion of match {}", match_id);
            return Err(TournamentError::DuplicateApplication(match_id));
        }
        return Err(TournamentError::InvalidTransition {
            from: game.state,
            to: new_state,
        });
    }
    if new_state < game.state {
        return Err(TournamentError::InvalidTransition {
            from: game.state,
            to: new_state,
        });
    }

    let completing = new_state == MatchState::Completed;
    game.score1 = s1;
    game.score2 = s2;
    game.state = new_state;

    if completing {
        let mut team1 = confirmed_team(&*store, game.team1_id)?;
        let mut team2 = confirmed_team(&*store, game.team2_id)?;
        apply_result(&mut team1, &mut team2, score1, score2)?;
        log::info!(
            "Match {} completed: {} {}:{} {}",
            game.id,
            team1.name,
            s1,
            s2,
            team2.name
        );
        store.save_team(team1);
        store.save_team(team2);
    }
    store.save_match(game.clone());
    Ok(game)
}

/// Change the score of an already completed match and rebuild the standings from history.
pub fn correct_result<S>(
    store: &mut S,
    match_id: MatchId,
    score1: i64,
    score2: i64,
) -> Result<GameMatch, TournamentError>
where
    S: TeamRepository + MatchRepository + ?Sized,
{
    let s1 = validate_score(score1)?;
    let s2 = validate_score(score2)?;
    let mut game = store.match_by_id(match_id)?;
    if game.state != MatchState::Completed {
        return Err(TournamentError::InvalidState);
    }
    log::info!(
        "Correcting match {}: {}:{} -> {}:{}",
        game.id,
        game.score1,
        game.score2,
        s1,
        s2
    );
    game.score1 = s1;
    game.score2 = s2;
    store.save_match(game.clone());
    recompute_standings(store);
    Ok(game)
}

/// Zero all confirmed teams and replay every completed match. Returns the number replayed.
pub fn recompute_standings<S>(store: &mut S) -> usize
where
    S: TeamRepository + MatchRepository + ?Sized,
{
    let mut teams = store.list_teams();
    let applied = recompute(&mut teams, &store.list_matches());
    for team in teams.into_iter().filter(Team::is_confirmed) {
        store.save_team(team);
    }
    log::info!("Standings recomputed from {} completed match(es)", applied);
    applied
}

/// Schedule a single match between two confirmed teams.
pub fn create_match<S>(
    store: &mut S,
    team1_id: TeamId,
    team2_id: TeamId,
    scheduled_at: NaiveDateTime,
    round: Option<String>,
) -> Result<GameMatch, TournamentError>
where
    S: TeamRepository + MatchRepository + ?Sized,
{
    if team1_id == team2_id {
        return Err(TournamentError::SameTeam);
    }
    let team1 = confirmed_team(&*store, team1_id)?;
    let team2 = confirmed_team(&*store, team2_id)?;
    let game = GameMatch::new(&team1, &team2, scheduled_at, round)?;
    store.save_match(game.clone());
    Ok(game)
}

/// Remove a match. Removing a completed one also takes its result out of the standings.
pub fn delete_match<S>(store: &mut S, match_id: MatchId) -> Result<GameMatch, TournamentError>
where
    S: TeamRepository + MatchRepository + ?Sized,
{
    let removed = store.delete_match(match_id)?;
    if removed.is_completed() {
        recompute_standings(store);
    }
    Ok(removed)
}

/// Draw the confirmed teams and replace the upcoming fixtures with the result.
///
/// `group_count: None` is a knockout round (odd team out gets a bye), `Some(k)` a group draw.
/// Nothing is stored when the draw fails.
pub fn run_draw<S, R>(
    store: &mut S,
    group_count: Option<usize>,
    round: Option<&str>,
    scheduled_at: NaiveDateTime,
    rng: &mut R,
) -> Result<DrawOutcome, TournamentError>
where
    S: TeamRepository + MatchRepository + ?Sized,
    R: Rng + ?Sized,
{
    let teams = store.confirmed_teams();
    let outcome = match group_count {
        None => DrawOutcome::Knockout(draw_round(&teams, round, scheduled_at, rng)?),
        Some(k) => DrawOutcome::Groups {
            groups: draw_groups(&teams, k, scheduled_at, rng)?,
        },
    };
    let matches = outcome.matches();
    log::info!(
        "Draw over {} team(s) produced {} match(es)",
        teams.len(),
        matches.len()
    );
    store.replace_upcoming(matches);
    Ok(outcome)
}
