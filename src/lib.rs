//! Football tournament web app: library with models, standings/draw logic and storage.

pub mod config;
pub mod logic;
pub mod models;
pub mod store;

pub use config::Config;
pub use logic::{
    add_news, apply_result, confirm_team, correct_result, create_match, default_kickoff,
    delete_match, delete_news, delete_team, draw_groups, draw_round, edit_news, pair_in_order,
    parse_score, rank, recompute_standings, register_team, reject_team, report_result, run_draw,
    standings_csv, DrawOutcome, Group, NewsEdit, RoundDraw, Standing,
};
pub use models::{
    GameMatch, MatchId, MatchState, NewsId, NewsItem, Team, TeamId, TeamStats, TeamStatus,
    TournamentError,
};
pub use store::{MatchRepository, MemoryStore, NewsRepository, TeamRepository};
