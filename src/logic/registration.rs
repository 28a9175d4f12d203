//! Team registration and the admin approval workflow.

use crate::logic::results::recompute_standings;
use crate::models::{GameMatch, Team, TeamId, TeamStatus, TournamentError};
use crate::store::{MatchRepository, TeamRepository};

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Register a new team as pending. Name and owner are trimmed and must be non-empty, and
/// neither may already be used by a pending or confirmed team (case-insensitive).
pub fn register_team<S>(store: &mut S, name: &str, owner: &str) -> Result<Team, TournamentError>
where
    S: TeamRepository + ?Sized,
{
    let name = name.trim();
    let owner = owner.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyField("teamName"));
    }
    if owner.is_empty() {
        return Err(TournamentError::EmptyField("ownerName"));
    }
    let taken = store
        .list_teams()
        .iter()
        .filter(|t| t.is_active())
        .any(|t| same_name(&t.name, name) || same_name(&t.owner, owner));
    if taken {
        return Err(TournamentError::DuplicateTeam);
    }
    let team = Team::new(name, owner);
    log::info!("Team '{}' registered by {} (pending)", team.name, team.owner);
    store.save_team(team.clone());
    Ok(team)
}

fn set_status<S>(
    store: &mut S,
    id: TeamId,
    allowed_from: &[TeamStatus],
    to: TeamStatus,
) -> Result<Team, TournamentError>
where
    S: TeamRepository + ?Sized,
{
    let mut team = store.team_by_id(id)?;
    if !allowed_from.contains(&team.status) {
        return Err(TournamentError::InvalidState);
    }
    team.status = to;
    log::info!("Team '{}' is now {:?}", team.name, to);
    store.save_team(team.clone());
    Ok(team)
}

/// Pending -> confirmed. The team starts taking part in draws and standings.
pub fn confirm_team<S>(store: &mut S, id: TeamId) -> Result<Team, TournamentError>
where
    S: TeamRepository + ?Sized,
{
    set_status(store, id, &[TeamStatus::Pending], TeamStatus::Confirmed)
}

/// Pending -> rejected.
pub fn reject_team<S>(store: &mut S, id: TeamId) -> Result<Team, TournamentError>
where
    S: TeamRepository + ?Sized,
{
    set_status(store, id, &[TeamStatus::Pending], TeamStatus::Rejected)
}

/// Pending or confirmed -> deleted. Fixtures of the team that have not been completed are
/// dropped; completed ones stay in the history but no longer count, so the standings are
/// rebuilt when the team had any.
pub fn delete_team<S>(store: &mut S, id: TeamId) -> Result<Team, TournamentError>
where
    S: TeamRepository + MatchRepository + ?Sized,
{
    let team = set_status(
        store,
        id,
        &[TeamStatus::Pending, TeamStatus::Confirmed],
        TeamStatus::Deleted,
    )?;
    let open: Vec<GameMatch> = store
        .list_matches()
        .into_iter()
        .filter(|m| m.involves(id) && !m.is_completed())
        .collect();
    for m in &open {
        store.delete_match(m.id)?;
    }
    if !open.is_empty() {
        log::info!("Dropped {} open fixture(s) of '{}'", open.len(), team.name);
    }
    if store
        .list_matches()
        .iter()
        .any(|m| m.involves(id) && m.is_completed())
    {
        recompute_standings(store);
    }
    Ok(team)
}
