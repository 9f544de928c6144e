//! Tournament and TournamentState.

use crate::models::bracket::{
    Bracket, BracketError, BracketOptions, DrawSize, ProgressionError, SeedingMode,
};
use crate::models::game::MatchController;
use crate::models::player::{Player, PlayerId, RosterEntry};
use crate::models::score::{MatchFormat, ScoringError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Tournament is not in a state that allows this action.
    InvalidState,
    /// Player names must not be blank.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player not found in the roster.
    PlayerNotFound(PlayerId),
    /// The draw has not been generated yet.
    NoBracket,
    /// No live match at (round, position).
    MatchNotFound { round: usize, position: usize },
    /// The match does not have two players yet.
    MatchNotReady { round: usize, position: usize },
    /// Matches must be best of an odd number of sets.
    InvalidMatchFormat,
    /// A roster import row could not be read.
    ImportFailed(String),
    Bracket(BracketError),
    Progression(ProgressionError),
    Scoring(ScoringError),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::EmptyName => write!(f, "Player name must not be empty"),
            TournamentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            TournamentError::PlayerNotFound(_) => write!(f, "Player not found"),
            TournamentError::NoBracket => write!(f, "The draw has not been made yet"),
            TournamentError::MatchNotFound { round, position } => {
                write!(f, "No live match at round {} position {}", round, position)
            }
            TournamentError::MatchNotReady { round, position } => write!(
                f,
                "Match at round {} position {} is waiting for its players",
                round, position
            ),
            TournamentError::InvalidMatchFormat => {
                write!(f, "Match format must be best of an odd number of sets")
            }
            TournamentError::ImportFailed(msg) => write!(f, "Import failed: {}", msg),
            TournamentError::Bracket(e) => write!(f, "{}", e),
            TournamentError::Progression(e) => write!(f, "{}", e),
            TournamentError::Scoring(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for TournamentError {}

impl From<BracketError> for TournamentError {
    fn from(e: BracketError) -> Self {
        TournamentError::Bracket(e)
    }
}

impl From<ProgressionError> for TournamentError {
    fn from(e: ProgressionError) -> Self {
        TournamentError::Progression(e)
    }
}

impl From<ScoringError> for TournamentError {
    fn from(e: ScoringError) -> Self {
        TournamentError::Scoring(e)
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Adding players, choosing draw size, seeding, and format.
    #[default]
    Setup,
    /// Draw generated; no match started yet. Setup changes discard the draw.
    Drawn,
    /// At least one match started or decided.
    InProgress,
    /// Final decided; a champion exists.
    Completed,
}

/// Full tournament state: roster, settings, draw, and live matches.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub players: Vec<Player>,
    pub state: TournamentState,
    pub options: BracketOptions,
    pub format: MatchFormat,
    pub bracket: Option<Bracket>,
    /// Matches scored point by point (started, live, or finished).
    pub matches: Vec<MatchController>,
}

impl Tournament {
    /// Create a new tournament in Setup state with no players.
    pub fn new(name: impl Into<String>, options: BracketOptions, format: MatchFormat) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
            state: TournamentState::Setup,
            options,
            format,
            bracket: None,
            matches: Vec::new(),
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Bracket input, in registration order.
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.players.iter().map(Player::roster_entry).collect()
    }

    pub fn live_match(&self, round: usize, position: usize) -> Option<&MatchController> {
        self.matches
            .iter()
            .find(|m| m.round == round && m.position == position)
    }

    pub fn live_match_mut(&mut self, round: usize, position: usize) -> Option<&mut MatchController> {
        self.matches
            .iter_mut()
            .find(|m| m.round == round && m.position == position)
    }

    pub fn champion(&self) -> Option<&RosterEntry> {
        self.bracket.as_ref()?.champion()
    }

    /// Roster and settings edits are allowed until a match starts. Editing a drawn tournament
    /// discards the draw.
    fn begin_setup_edit(&mut self) -> Result<(), TournamentError> {
        match self.state {
            TournamentState::Setup => Ok(()),
            TournamentState::Drawn => {
                log::info!("Tournament {}: setup changed, discarding draw", self.id);
                self.bracket = None;
                self.matches.clear();
                self.state = TournamentState::Setup;
                Ok(())
            }
            _ => Err(TournamentError::InvalidState),
        }
    }

    /// Add a player. Names must be non-empty and unique (case-insensitive).
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        ranking: Option<u32>,
    ) -> Result<PlayerId, TournamentError> {
        if !matches!(self.state, TournamentState::Setup | TournamentState::Drawn) {
            return Err(TournamentError::InvalidState);
        }
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicatePlayerName);
        }
        self.begin_setup_edit()?;
        let player = Player::with_ranking(name_trimmed, ranking);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player by id.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), TournamentError> {
        if !matches!(self.state, TournamentState::Setup | TournamentState::Drawn) {
            return Err(TournamentError::InvalidState);
        }
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(TournamentError::PlayerNotFound(player_id))?;
        self.begin_setup_edit()?;
        self.players.remove(idx);
        Ok(())
    }

    /// Set or clear a player's manual seed. Seeds must be positive and not held by another player.
    pub fn set_seed(&mut self, player_id: PlayerId, seed: Option<u32>) -> Result<(), TournamentError> {
        if !matches!(self.state, TournamentState::Setup | TournamentState::Drawn) {
            return Err(TournamentError::InvalidState);
        }
        if self.get_player(player_id).is_none() {
            return Err(TournamentError::PlayerNotFound(player_id));
        }
        if let Some(s) = seed {
            if s == 0 || s > self.options.max_seeds {
                return Err(BracketError::SeedOutOfRange {
                    seed: s,
                    max_seeds: self.options.max_seeds,
                }
                .into());
            }
            if self
                .players
                .iter()
                .any(|p| p.id != player_id && p.seed == Some(s))
            {
                return Err(BracketError::DuplicateSeed(s).into());
            }
        }
        self.begin_setup_edit()?;
        if let Some(p) = self.get_player_mut(player_id) {
            p.seed = seed;
        }
        Ok(())
    }

    /// Set the draw size (2, 4, 8, ..., 256).
    pub fn set_draw_size(&mut self, draw_size: u32) -> Result<(), TournamentError> {
        let draw_size = DrawSize::new(draw_size)?;
        self.begin_setup_edit()?;
        self.options.draw_size = draw_size;
        Ok(())
    }

    /// Set the seeding mode and number of seeds.
    pub fn set_seeding(&mut self, seeding: SeedingMode, max_seeds: u32) -> Result<(), TournamentError> {
        self.begin_setup_edit()?;
        self.options.seeding = seeding;
        self.options.max_seeds = max_seeds;
        Ok(())
    }

    /// Set the match format (sets to win, tiebreak or advantage sets).
    pub fn set_match_format(&mut self, format: MatchFormat) -> Result<(), TournamentError> {
        if format.sets_to_win == 0 {
            return Err(TournamentError::InvalidMatchFormat);
        }
        self.begin_setup_edit()?;
        self.format = format;
        Ok(())
    }
}
