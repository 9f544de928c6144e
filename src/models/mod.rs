//! Data structures for the tennis tournament: players, draw, scores, live matches.

mod bracket;
mod game;
mod player;
mod score;
mod tournament;

pub use bracket::{
    Bracket, BracketError, BracketNode, BracketOptions, DrawSize, MatchStatus, ProgressionError,
    SeedingMode, Slot, UnseededPlacement, DEFAULT_MAX_SEEDS, MAX_DRAW_SIZE, MIN_DRAW_SIZE,
};
pub use game::MatchController;
pub use player::{Player, PlayerId, RosterEntry};
pub use score::{
    GameScore, MatchFormat, MatchScore, MatchState, PointEvent, PointType, ScoringError, SetScore,
    Side,
};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentState};
