//! In-memory store: one serializable document with teams, matches and news.

use crate::models::{GameMatch, MatchId, MatchState, NewsId, NewsItem, Team, TeamId, TournamentError};
use crate::store::{MatchRepository, NewsRepository, TeamRepository};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with teams (e.g. in tests).
    pub fn with_teams(teams: Vec<Team>) -> Self {
        Self {
            teams,
            ..Self::default()
        }
    }
}

impl TeamRepository for MemoryStore {
    fn list_teams(&self) -> Vec<Team> {
        self.teams.clone()
    }

    fn team_by_id(&self, id: TeamId) -> Result<Team, TournamentError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(TournamentError::TeamNotFound(id))
    }

    fn save_team(&mut self, team: Team) {
        match self.teams.iter_mut().find(|t| t.id == team.id) {
            Some(slot) => *slot = team,
            None => self.teams.push(team),
        }
    }
}

impl MatchRepository for MemoryStore {
    fn list_matches(&self) -> Vec<GameMatch> {
        self.matches.clone()
    }

    fn match_by_id(&self, id: MatchId) -> Result<GameMatch, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(id))
    }

    fn replace_upcoming(&mut self, matches: Vec<GameMatch>) {
        self.matches.retain(|m| m.state != MatchState::Upcoming);
        self.matches.extend(matches);
    }

    fn save_match(&mut self, game: GameMatch) {
        match self.matches.iter_mut().find(|m| m.id == game.id) {
            Some(slot) => *slot = game,
            None => self.matches.push(game),
        }
    }

    fn delete_match(&mut self, id: MatchId) -> Result<GameMatch, TournamentError> {
        let idx = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))?;
        Ok(self.matches.remove(idx))
    }
}

impl NewsRepository for MemoryStore {
    fn list_news(&self) -> Vec<NewsItem> {
        self.news.clone()
    }

    fn news_by_id(&self, id: NewsId) -> Result<NewsItem, TournamentError> {
        self.news
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or(TournamentError::NewsNotFound(id))
    }

    fn save_news(&mut self, item: NewsItem) {
        match self.news.iter_mut().find(|n| n.id == item.id) {
            Some(slot) => *slot = item,
            None => self.news.insert(0, item),
        }
    }

    fn delete_news(&mut self, id: NewsId) -> Result<NewsItem, TournamentError> {
        let idx = self
            .news
            .iter()
            .position(|n| n.id == id)
            .ok_or(TournamentError::NewsNotFound(id))?;
        Ok(self.news.remove(idx))
    }
}
