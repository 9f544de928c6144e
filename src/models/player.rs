//! Player and RosterEntry data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in bracket slots and lookups).
pub type PlayerId = Uuid;

/// A player as seen by the bracket engine: identity, name, and optional seed.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player_id: PlayerId,
    pub display_name: String,
    /// Positive, unique among entries. None for unseeded players.
    #[serde(default)]
    pub seed: Option<u32>,
    /// World ranking (1 is best). Auto-seeding picks seeds from this.
    #[serde(default)]
    pub ranking: Option<u32>,
}

impl RosterEntry {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            player_id: Uuid::new_v4(),
            display_name: display_name.into(),
            seed: None,
            ranking: None,
        }
    }

    pub fn seeded(display_name: impl Into<String>, seed: u32) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(display_name)
        }
    }

    pub fn ranked(display_name: impl Into<String>, ranking: u32) -> Self {
        Self {
            ranking: Some(ranking),
            ..Self::new(display_name)
        }
    }
}

/// A player registered in the tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// World ranking (1 is best). Used for auto-seeding.
    pub ranking: Option<u32>,
    /// Manual seed, used when the tournament seeds manually.
    pub seed: Option<u32>,
}

impl Player {
    /// Create a new player with the given name. Ranking and seed start empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            ranking: None,
            seed: None,
        }
    }

    pub fn with_ranking(name: impl Into<String>, ranking: Option<u32>) -> Self {
        Self {
            ranking,
            ..Self::new(name)
        }
    }

    /// Projection used as input to bracket generation.
    pub fn roster_entry(&self) -> RosterEntry {
        RosterEntry {
            player_id: self.id,
            display_name: self.name.clone(),
            seed: self.seed,
            ranking: self.ranking,
        }
    }
}
