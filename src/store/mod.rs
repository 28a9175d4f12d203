//! Storage seams: repository traits plus the in-memory document store and its JSON file backing.
//!
//! The engines in [`crate::logic`] never touch these; only the service functions do.

pub mod file;
mod memory;

pub use memory::MemoryStore;

use crate::models::{
    GameMatch, MatchId, MatchState, NewsId, NewsItem, Team, TeamId, TeamStatus, TournamentError,
};

/// Team records, partitioned by approval state.
pub trait TeamRepository {
    /// All teams in registration order.
    fn list_teams(&self) -> Vec<Team>;

    fn teams_by_status(&self, status: TeamStatus) -> Vec<Team> {
        self.list_teams()
            .into_iter()
            .filter(|t| t.status == status)
            .collect()
    }

    fn confirmed_teams(&self) -> Vec<Team> {
        self.teams_by_status(TeamStatus::Confirmed)
    }

    /// Any team with this id, whatever its status.
    fn team_by_id(&self, id: TeamId) -> Result<Team, TournamentError>;

    /// Insert or replace by id.
    fn save_team(&mut self, team: Team);
}

/// Match records, partitioned by lifecycle state.
pub trait MatchRepository {
    fn list_matches(&self) -> Vec<GameMatch>;

    fn matches_by_state(&self, state: MatchState) -> Vec<GameMatch> {
        self.list_matches()
            .into_iter()
            .filter(|m| m.state == state)
            .collect()
    }

    fn match_by_id(&self, id: MatchId) -> Result<GameMatch, TournamentError>;

    /// Drop every upcoming match and store `matches` in their place.
    fn replace_upcoming(&mut self, matches: Vec<GameMatch>);

    /// Insert or replace by id.
    fn save_match(&mut self, game: GameMatch);

    fn delete_match(&mut self, id: MatchId) -> Result<GameMatch, TournamentError>;
}

/// News feed items, newest first.
pub trait NewsRepository {
    fn list_news(&self) -> Vec<NewsItem>;

    fn news_by_id(&self, id: NewsId) -> Result<NewsItem, TournamentError>;

    /// Replace by id, or insert at the top of the feed.
    fn save_news(&mut self, item: NewsItem);

    fn delete_news(&mut self, id: NewsId) -> Result<NewsItem, TournamentError>;
}
