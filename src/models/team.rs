//! Team, TeamStatus and the TeamStats block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// Approval state of a registered team.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamStatus {
    /// Registered, waiting for an admin decision.
    #[default]
    Pending,
    /// Approved: takes part in draws and standings.
    Confirmed,
    Rejected,
    /// Removed by an admin after confirmation.
    Deleted,
}

/// Aggregate match statistics for one team.
///
/// `played = wins + draws + losses` and `goal_difference = goals_for - goals_against`
/// hold after every mutation done through [`crate::logic::apply_result`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl TeamStats {
    /// Zero every counter (used before replaying match history).
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Recompute the derived fields from the raw counters.
    pub fn refresh_derived(&mut self) {
        self.played = self
            .wins
            .saturating_add(self.draws)
            .saturating_add(self.losses);
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);
    }

    pub fn is_consistent(&self) -> bool {
        u64::from(self.played)
            == u64::from(self.wins) + u64::from(self.draws) + u64::from(self.losses)
            && self.goal_difference == i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

/// A registered team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    #[serde(rename = "teamName")]
    pub name: String,
    /// Captain / owner display name.
    #[serde(rename = "ownerName")]
    pub owner: String,
    pub status: TeamStatus,
    #[serde(flatten)]
    pub stats: TeamStats,
    #[serde(rename = "registrationDate")]
    pub registered_at: DateTime<Utc>,
}

impl Team {
    /// Create a new pending team with zeroed statistics.
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            owner: owner.into(),
            status: TeamStatus::Pending,
            stats: TeamStats::default(),
            registered_at: Utc::now(),
        }
    }

    /// Shorthand for tests and seeding: a team that is already confirmed.
    pub fn confirmed(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            status: TeamStatus::Confirmed,
            ..Self::new(name, owner)
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == TeamStatus::Confirmed
    }

    /// Pending and confirmed teams block their name and owner from being registered again.
    pub fn is_active(&self) -> bool {
        matches!(self.status, TeamStatus::Pending | TeamStatus::Confirmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_client_field_names() {
        let t = Team::confirmed("Lions", "Ali");
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["teamName"], "Lions");
        assert_eq!(v["ownerName"], "Ali");
        assert_eq!(v["status"], "confirmed");
        assert_eq!(v["goalDifference"], 0);
        assert_eq!(v["goalsFor"], 0);
        assert!(v.get("registrationDate").is_some());
    }

    #[test]
    fn refresh_derived_restores_invariants() {
        let mut s = TeamStats {
            wins: 2,
            draws: 1,
            losses: 3,
            goals_for: 4,
            goals_against: 7,
            ..TeamStats::default()
        };
        assert!(!s.is_consistent());
        s.refresh_derived();
        assert_eq!(s.played, 6);
        assert_eq!(s.goal_difference, -3);
        assert!(s.is_consistent());
    }
}
