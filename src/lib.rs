//! Tennis tournament web app: library with models and business logic.

pub mod logic;
pub mod models;

pub use logic::{
    advance_winner, apply_point, format_game_score, generate_bracket, generate_bracket_with_rng,
    import_roster_csv, make_draw, record_walkover, reopen_match, reopen_tournament_match, replay,
    round_name, score_point, seeding_order, start_match, undo_point,
};
pub use models::{
    Bracket, BracketError, BracketNode, BracketOptions, DrawSize, GameScore, MatchController,
    MatchFormat, MatchScore, MatchState, MatchStatus, Player, PlayerId, PointEvent, PointType,
    ProgressionError, RosterEntry, ScoringError, SeedingMode, SetScore, Side, Slot, Tournament,
    TournamentError, TournamentId, TournamentState, UnseededPlacement,
};
