//! Tournament business logic: standings and draw engines, plus the service functions that run
//! them against the repositories.

mod draw;
mod news;
mod registration;
mod results;
mod standings;

pub use draw::{
    default_kickoff, draw_groups, draw_round, pair_in_order, DrawOutcome, Group, RoundDraw,
    DEFAULT_ROUND_LABEL,
};
pub use news::{add_news, delete_news, edit_news, NewsEdit};
pub use registration::{confirm_team, delete_team, register_team, reject_team};
pub use results::{
    confirmed_team, correct_result, create_match, delete_match, recompute_standings,
    report_result, run_draw,
};
pub use standings::{
    apply_result, compare_teams, parse_score, rank, recompute, standings_csv, validate_score,
    Standing, POINTS_FOR_DRAW, POINTS_FOR_WIN,
};
