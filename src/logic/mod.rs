//! Tournament business logic: draw generation, progression, scoring, and match play.

mod bracket;
mod import;
mod play;
mod progression;
mod scoring;
mod seeding;
mod setup;

pub use bracket::{generate_bracket, generate_bracket_with_rng, round_name};
pub use import::import_roster_csv;
pub use play::{record_walkover, reopen_tournament_match, score_point, start_match, undo_point};
pub use progression::{advance_winner, auto_advance_byes, reopen_match};
pub use scoring::{
    apply_point, format_game_score, replay, start_tiebreak, GAMES_PER_SET, POINTS_PER_GAME,
    TIEBREAK_POINTS,
};
pub use seeding::{rank_entries, seeding_order, validate_manual_seeds};
pub use setup::make_draw;
