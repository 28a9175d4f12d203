//! Match (game) and its lifecycle state.

use crate::models::error::TournamentError;
use crate::models::team::{Team, TeamId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Lifecycle of a match. Declaration order is the only allowed direction
/// (upcoming -> live -> completed); `Ord` follows it.
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    #[default]
    Upcoming,
    Live,
    Completed,
}

impl MatchState {
    pub const ALL: [MatchState; 3] = [MatchState::Upcoming, MatchState::Live, MatchState::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchState::Upcoming => "upcoming",
            MatchState::Live => "live",
            MatchState::Completed => "completed",
        }
    }
}

impl std::fmt::Display for MatchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single match between two distinct teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    pub team1_id: TeamId,
    /// Denormalized display name, so clients can render without a join.
    pub team1_name: String,
    pub team2_id: TeamId,
    pub team2_name: String,
    pub scheduled_at: NaiveDateTime,
    pub score1: u32,
    pub score2: u32,
    #[serde(rename = "status")]
    pub state: MatchState,
    /// Round or group label, e.g. "Round 1" or "Group B".
    pub round: Option<String>,
}

impl GameMatch {
    /// New upcoming match with a 0:0 score. Fails with `SameTeam` if both sides are one team.
    pub fn new(
        team1: &Team,
        team2: &Team,
        scheduled_at: NaiveDateTime,
        round: Option<String>,
    ) -> Result<Self, TournamentError> {
        if team1.id == team2.id {
            return Err(TournamentError::SameTeam);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            team1_id: team1.id,
            team1_name: team1.name.clone(),
            team2_id: team2.id,
            team2_name: team2.name.clone(),
            scheduled_at,
            score1: 0,
            score2: 0,
            state: MatchState::Upcoming,
            round,
        })
    }

    pub fn involves(&self, team_id: TeamId) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    pub fn is_completed(&self) -> bool {
        self.state == MatchState::Completed
    }
}
