//! Data structures for the tournament: teams, matches, news, errors.

mod error;
mod game;
mod news;
mod team;

pub use error::TournamentError;
pub use game::{GameMatch, MatchId, MatchState};
pub use news::{NewsId, NewsItem};
pub use team::{Team, TeamId, TeamStats, TeamStatus};
