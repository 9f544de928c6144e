//! Tennis score values: game, set, match, and the point log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors from the scoring engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ScoringError {
    /// The match already has a winner; the point was not applied.
    ScoringAfterCompletion,
    /// Aces must be won by the server, double faults by the receiver.
    InconsistentPointType { point_type: PointType, scorer: Side },
    /// The point log is empty.
    NothingToUndo,
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::ScoringAfterCompletion => write!(f, "Match is already decided"),
            ScoringError::InconsistentPointType { point_type, scorer } => write!(
                f,
                "A {} cannot be scored by player {}",
                point_type, scorer
            ),
            ScoringError::NothingToUndo => write!(f, "No points to undo"),
        }
    }
}

impl std::error::Error for ScoringError {}

/// Which player of a match.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    A,
    B,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

/// How a point ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointType {
    Ace,
    Winner,
    ForcedError,
    UnforcedError,
    DoubleFault,
}

impl std::fmt::Display for PointType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PointType::Ace => "ace",
            PointType::Winner => "winner",
            PointType::ForcedError => "forced error",
            PointType::UnforcedError => "unforced error",
            PointType::DoubleFault => "double fault",
        };
        f.write_str(s)
    }
}

/// Points within one game (or tiebreak).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameScore {
    pub points_a: u32,
    pub points_b: u32,
}

impl GameScore {
    pub fn new(points_a: u32, points_b: u32) -> Self {
        Self { points_a, points_b }
    }

    pub fn points(&self, side: Side) -> u32 {
        match side {
            Side::A => self.points_a,
            Side::B => self.points_b,
        }
    }

    pub(crate) fn add_point(&mut self, side: Side) {
        match side {
            Side::A => self.points_a += 1,
            Side::B => self.points_b += 1,
        }
    }

    /// `"AD-40"` style for regular games, raw counts for tiebreaks.
    pub fn display(&self, tiebreak: bool) -> String {
        if tiebreak {
            format!("{}-{}", self.points_a, self.points_b)
        } else {
            format!(
                "{}-{}",
                crate::logic::format_game_score(self.points_a, self.points_b),
                crate::logic::format_game_score(self.points_b, self.points_a)
            )
        }
    }
}

/// Games within one set.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub games_a: u32,
    pub games_b: u32,
    pub completed_games: Vec<GameScore>,
    pub winner: Option<Side>,
}

impl SetScore {
    pub fn games(&self, side: Side) -> u32 {
        match side {
            Side::A => self.games_a,
            Side::B => self.games_b,
        }
    }

    pub(crate) fn add_game(&mut self, side: Side, game: GameScore) {
        self.completed_games.push(game);
        match side {
            Side::A => self.games_a += 1,
            Side::B => self.games_b += 1,
        }
    }
}

/// Sets needed to win, and whether 6-6 goes to a tiebreak.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchFormat {
    pub sets_to_win: u32,
    /// False plays advantage sets (two-game lead, no tiebreak).
    #[serde(default = "default_tiebreak_sets")]
    pub tiebreak_sets: bool,
}

fn default_tiebreak_sets() -> bool {
    true
}

impl MatchFormat {
    pub fn best_of_three() -> Self {
        Self {
            sets_to_win: 2,
            tiebreak_sets: true,
        }
    }

    pub fn best_of_five() -> Self {
        Self {
            sets_to_win: 3,
            tiebreak_sets: true,
        }
    }

    /// `best_of` must be odd (1, 3, 5, ...).
    pub fn best_of(best_of: u32) -> Option<Self> {
        if best_of % 2 == 1 {
            Some(Self {
                sets_to_win: best_of / 2 + 1,
                tiebreak_sets: true,
            })
        } else {
            None
        }
    }
}

impl Default for MatchFormat {
    fn default() -> Self {
        Self::best_of_three()
    }
}

/// Coarse state of a match. Deuce, advantage, and tiebreak are derived views, not states.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    InProgress,
    Completed,
}

/// Full score of one match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub format: MatchFormat,
    pub sets: Vec<SetScore>,
    pub current_set_index: usize,
    pub current_game: GameScore,
    pub server: Side,
    pub sets_won_a: u32,
    pub sets_won_b: u32,
    pub winner: Option<Side>,
    /// Set while a tiebreak is being played: who served its first point.
    pub tiebreak_first_server: Option<Side>,
}

impl MatchScore {
    pub fn new(format: MatchFormat, first_server: Side) -> Self {
        Self {
            format,
            sets: vec![SetScore::default()],
            current_set_index: 0,
            current_game: GameScore::default(),
            server: first_server,
            sets_won_a: 0,
            sets_won_b: 0,
            winner: None,
            tiebreak_first_server: None,
        }
    }

    pub fn state(&self) -> MatchState {
        if self.winner.is_some() {
            MatchState::Completed
        } else {
            MatchState::InProgress
        }
    }

    pub fn sets_won(&self, side: Side) -> u32 {
        match side {
            Side::A => self.sets_won_a,
            Side::B => self.sets_won_b,
        }
    }

    pub fn current_set(&self) -> &SetScore {
        &self.sets[self.current_set_index]
    }

    pub fn in_tiebreak(&self) -> bool {
        self.tiebreak_first_server.is_some()
    }

    /// Both players on 40 or more and level (regular games only).
    pub fn is_deuce(&self) -> bool {
        let g = self.current_game;
        !self.in_tiebreak() && g.points_a >= 3 && g.points_a == g.points_b
    }

    /// Player one point ahead after deuce (regular games only).
    pub fn advantage(&self) -> Option<Side> {
        let g = self.current_game;
        if self.in_tiebreak() || g.points_a < 3 || g.points_b < 3 {
            return None;
        }
        if g.points_a == g.points_b + 1 {
            Some(Side::A)
        } else if g.points_b == g.points_a + 1 {
            Some(Side::B)
        } else {
            None
        }
    }

    /// e.g. `"6-4 3-2 30-15"`; the game part is omitted once the match is over.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self
            .sets
            .iter()
            .map(|s| format!("{}-{}", s.games_a, s.games_b))
            .collect();
        if self.winner.is_none() {
            parts.push(self.current_game.display(self.in_tiebreak()));
        }
        parts.join(" ")
    }
}

/// One entry of a match's point log. Never mutated after it is appended.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PointEvent {
    pub timestamp: DateTime<Utc>,
    pub scorer: Side,
    pub server_at_time: Side,
    pub resulting_score_display: String,
    pub point_type: PointType,
}
