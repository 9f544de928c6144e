//! Draw size, bracket slots, and the single-elimination bracket tree.

use crate::models::player::{PlayerId, RosterEntry};
use serde::{Deserialize, Serialize};

/// Errors from bracket generation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BracketError {
    /// Draw size is not one of 2, 4, 8, ..., 256.
    InvalidDrawSize(u32),
    /// More roster entries than the draw has slots.
    InsufficientCapacity { entries: usize, draw_size: u32 },
    /// Two entries carry the same seed.
    DuplicateSeed(u32),
    /// Seed is zero or above the configured number of seeds.
    SeedOutOfRange { seed: u32, max_seeds: u32 },
    /// Auto-seeding needs at least `max_seeds` entries.
    NotEnoughPlayersToSeed { seeds: u32, players: usize },
    /// The same player appears twice in the roster.
    DuplicatePlayer(PlayerId),
    /// Byes could not be carried forward through the new draw.
    ByePropagation(ProgressionError),
}

impl std::fmt::Display for BracketError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BracketError::InvalidDrawSize(n) => {
                write!(f, "Draw size {} is invalid (must be a power of two from 2 to 256)", n)
            }
            BracketError::InsufficientCapacity { entries, draw_size } => write!(
                f,
                "Too many players for the draw: {} players, {} slots",
                entries, draw_size
            ),
            BracketError::DuplicateSeed(seed) => write!(f, "Seed {} is assigned more than once", seed),
            BracketError::SeedOutOfRange { seed, max_seeds } => {
                write!(f, "Seed {} is out of range (1 to {})", seed, max_seeds)
            }
            BracketError::NotEnoughPlayersToSeed { seeds, players } => write!(
                f,
                "Not enough players to seed {} ({} registered)",
                seeds, players
            ),
            BracketError::DuplicatePlayer(_) => write!(f, "A player appears twice in the roster"),
            BracketError::ByePropagation(e) => write!(f, "Could not advance byes: {}", e),
        }
    }
}

impl std::error::Error for BracketError {}

impl From<ProgressionError> for BracketError {
    fn from(e: ProgressionError) -> Self {
        BracketError::ByePropagation(e)
    }
}

/// Errors from advancing or reopening bracket results.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgressionError {
    /// No node at (round, position).
    NodeNotFound { round: usize, position: usize },
    /// The node already has a different winner.
    MatchAlreadyDecided { round: usize, position: usize },
    /// One or both slots still wait for a feeder match (or hold a bye).
    ParticipantsUnresolved { round: usize, position: usize },
    /// The given winner is not in this match.
    NotAParticipant(PlayerId),
    /// Reopen on a node that has no result.
    MatchNotDecided { round: usize, position: usize },
    /// Reopen would retract a result that a later match already depends on.
    DownstreamMatchStarted { round: usize, position: usize },
    /// The next-round node for a result does not exist. Structural bug.
    ProgressionTargetMissing { round: usize, position: usize },
}

impl std::fmt::Display for ProgressionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressionError::NodeNotFound { round, position } => {
                write!(f, "No match at round {} position {}", round, position)
            }
            ProgressionError::MatchAlreadyDecided { round, position } => write!(
                f,
                "Match at round {} position {} is already decided",
                round, position
            ),
            ProgressionError::ParticipantsUnresolved { round, position } => write!(
                f,
                "Match at round {} position {} does not have two players yet",
                round, position
            ),
            ProgressionError::NotAParticipant(_) => write!(f, "Winner is not a player in this match"),
            ProgressionError::MatchNotDecided { round, position } => write!(
                f,
                "Match at round {} position {} has no result to reopen",
                round, position
            ),
            ProgressionError::DownstreamMatchStarted { round, position } => write!(
                f,
                "Cannot reopen: match at round {} position {} has already started",
                round, position
            ),
            ProgressionError::ProgressionTargetMissing { round, position } => write!(
                f,
                "Bracket is corrupt: no match at round {} position {}",
                round, position
            ),
        }
    }
}

impl std::error::Error for ProgressionError {}

/// Smallest and largest supported draw.
pub const MIN_DRAW_SIZE: u32 = 2;
pub const MAX_DRAW_SIZE: u32 = 256;

/// Number of slots in round 1. Always a power of two from 2 to 256.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct DrawSize(u32);

impl DrawSize {
    pub fn new(size: u32) -> Result<Self, BracketError> {
        if (MIN_DRAW_SIZE..=MAX_DRAW_SIZE).contains(&size) && size.is_power_of_two() {
            Ok(Self(size))
        } else {
            Err(BracketError::InvalidDrawSize(size))
        }
    }

    /// Smallest draw that holds `entries` players (None if more than 256).
    pub fn fitting(entries: usize) -> Option<Self> {
        let size = entries.max(MIN_DRAW_SIZE as usize).checked_next_power_of_two()?;
        u32::try_from(size).ok().and_then(|s| Self::new(s).ok())
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn slots(self) -> usize {
        self.0 as usize
    }

    /// log2 of the draw size.
    pub fn total_rounds(self) -> usize {
        self.0.trailing_zeros() as usize
    }
}

impl Default for DrawSize {
    fn default() -> Self {
        Self(32)
    }
}

impl TryFrom<u32> for DrawSize {
    type Error = BracketError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        Self::new(size)
    }
}

impl From<DrawSize> for u32 {
    fn from(size: DrawSize) -> u32 {
        size.0
    }
}

impl std::fmt::Display for DrawSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How seeds are chosen when generating the draw.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedingMode {
    /// Ignore seeds; everyone is placed as unseeded.
    Unseeded,
    /// Use the seed numbers carried on roster entries.
    #[default]
    Manual,
    /// Seed the best-ranked entries, 1..=max_seeds.
    Auto,
}

/// How unseeded players fill the remaining slots.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnseededPlacement {
    #[default]
    Random,
    RosterOrder,
}

/// Default number of seeds for a 32-draw.
pub const DEFAULT_MAX_SEEDS: u32 = 8;

/// Parameters for bracket generation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketOptions {
    pub draw_size: DrawSize,
    #[serde(default)]
    pub seeding: SeedingMode,
    #[serde(default = "default_max_seeds")]
    pub max_seeds: u32,
    #[serde(default)]
    pub unseeded_placement: UnseededPlacement,
}

fn default_max_seeds() -> u32 {
    DEFAULT_MAX_SEEDS
}

impl Default for BracketOptions {
    fn default() -> Self {
        Self {
            draw_size: DrawSize::default(),
            seeding: SeedingMode::default(),
            max_seeds: DEFAULT_MAX_SEEDS,
            unseeded_placement: UnseededPlacement::default(),
        }
    }
}

impl BracketOptions {
    pub fn new(draw_size: DrawSize, seeding: SeedingMode) -> Self {
        Self {
            draw_size,
            seeding,
            ..Self::default()
        }
    }
}

/// One side of a bracket node.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "snake_case")]
pub enum Slot {
    Player(RosterEntry),
    Bye,
    /// Waiting for the feeder match.
    #[default]
    Unresolved,
}

impl Slot {
    pub fn entry(&self) -> Option<&RosterEntry> {
        match self {
            Slot::Player(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Slot::Unresolved)
    }

    pub fn holds(&self, id: PlayerId) -> bool {
        self.entry().is_some_and(|e| e.player_id == id)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// A single match slot in the draw.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketNode {
    /// 1-based.
    pub round: usize,
    /// 1-based within the round.
    pub position: usize,
    pub slot_a: Slot,
    pub slot_b: Slot,
    /// Set once Completed; None only for a void (bye against bye) node.
    pub winner: Option<RosterEntry>,
    pub status: MatchStatus,
    /// True when the result came from a bye rather than play.
    #[serde(default)]
    pub auto_advanced: bool,
}

impl BracketNode {
    pub fn new(round: usize, position: usize) -> Self {
        Self {
            round,
            position,
            slot_a: Slot::Unresolved,
            slot_b: Slot::Unresolved,
            winner: None,
            status: MatchStatus::Pending,
            auto_advanced: false,
        }
    }

    /// Both slots hold players.
    pub fn is_ready(&self) -> bool {
        self.slot_a.entry().is_some() && self.slot_b.entry().is_some()
    }

    /// Bye against bye: completed with nobody to advance.
    pub fn is_void(&self) -> bool {
        self.slot_a.is_bye() && self.slot_b.is_bye()
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }
}

/// Full single-elimination draw. `rounds[r - 1]` holds round r.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub draw_size: DrawSize,
    pub rounds: Vec<Vec<BracketNode>>,
}

impl Bracket {
    /// Empty tree: round r has draw_size / 2^r pending nodes with unresolved slots.
    pub fn empty(draw_size: DrawSize) -> Self {
        let rounds = (1..=draw_size.total_rounds())
            .map(|round| {
                let nodes = draw_size.slots() >> round;
                (1..=nodes).map(|position| BracketNode::new(round, position)).collect()
            })
            .collect();
        Self { draw_size, rounds }
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    pub fn node(&self, round: usize, position: usize) -> Option<&BracketNode> {
        self.rounds
            .get(round.checked_sub(1)?)?
            .get(position.checked_sub(1)?)
    }

    pub fn node_mut(&mut self, round: usize, position: usize) -> Option<&mut BracketNode> {
        self.rounds
            .get_mut(round.checked_sub(1)?)?
            .get_mut(position.checked_sub(1)?)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &BracketNode> {
        self.rounds.iter().flatten()
    }

    /// Total number of match nodes (draw_size - 1).
    pub fn match_count(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    /// Bye markers in round 1.
    pub fn bye_count(&self) -> usize {
        self.rounds
            .first()
            .map(|r| {
                r.iter()
                    .map(|n| usize::from(n.slot_a.is_bye()) + usize::from(n.slot_b.is_bye()))
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn round_names(&self) -> Vec<String> {
        let total = self.total_rounds();
        (1..=total)
            .map(|r| crate::logic::round_name(r, total))
            .collect()
    }

    /// Winner of the final, once decided.
    pub fn champion(&self) -> Option<&RosterEntry> {
        self.rounds.last()?.first()?.winner.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    /// Pending nodes with two players, ready to be played.
    pub fn playable_matches(&self) -> impl Iterator<Item = &BracketNode> {
        self.nodes()
            .filter(|n| n.status == MatchStatus::Pending && n.is_ready())
    }

    /// Round-1 node and side (true = slot A) holding the given player.
    pub fn first_round_position(&self, id: PlayerId) -> Option<(usize, bool)> {
        self.rounds.first()?.iter().find_map(|n| {
            if n.slot_a.holds(id) {
                Some((n.position, true))
            } else if n.slot_b.holds(id) {
                Some((n.position, false))
            } else {
                None
            }
        })
    }
}
