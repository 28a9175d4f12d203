//! Errors returned by the standings/draw engines and the service layer.

use crate::models::game::{MatchId, MatchState};
use crate::models::news::NewsId;
use crate::models::team::TeamId;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// A score is not a whole number in 0..=999, or would overflow a team's counters.
    InvalidScore,
    /// Team id does not resolve to a confirmed team.
    TeamNotFound(TeamId),
    /// Match id does not exist.
    MatchNotFound(MatchId),
    /// News id does not exist.
    NewsNotFound(NewsId),
    /// A draw needs at least two confirmed teams.
    InsufficientTeams { available: usize },
    /// Group count must be at least 1 and not exceed the number of teams.
    InvalidGroupCount(usize),
    /// The match is already completed; its result was applied once already.
    DuplicateApplication(MatchId),
    /// Match lifecycle only moves forward (upcoming -> live -> completed).
    InvalidTransition { from: MatchState, to: MatchState },
    /// Both sides of a match are the same team.
    SameTeam,
    /// A pending or confirmed team already uses this name or owner (case-insensitive).
    DuplicateTeam,
    /// A required text field is empty.
    EmptyField(&'static str),
    /// The entity is not in a state that allows this action.
    InvalidState,
}

impl TournamentError {
    /// True for the "id does not resolve" family (mapped to 404 by the web layer).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TeamNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::NewsNotFound(_)
        )
    }
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidScore => write!(f, "Scores must be whole numbers from 0 to 999"),
            TournamentError::TeamNotFound(id) => write!(f, "Team {} not found", id),
            TournamentError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            TournamentError::NewsNotFound(id) => write!(f, "News item {} not found", id),
            TournamentError::InsufficientTeams { available } => {
                write!(f, "Need at least 2 confirmed teams for a draw (have {})", available)
            }
            TournamentError::InvalidGroupCount(count) => {
                write!(f, "Invalid group count: {}", count)
            }
            TournamentError::DuplicateApplication(id) => {
                write!(f, "Match {} is already completed; use a correction instead", id)
            }
            TournamentError::InvalidTransition { from, to } => {
                write!(f, "Match cannot move from {} to {}", from, to)
            }
            TournamentError::SameTeam => write!(f, "A team cannot play against itself"),
            TournamentError::DuplicateTeam => {
                write!(f, "A team with this name or owner is already registered")
            }
            TournamentError::EmptyField(field) => write!(f, "Field '{}' must not be empty", field),
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
        }
    }
}

impl std::error::Error for TournamentError {}
