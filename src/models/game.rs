//! A live match: the two players, its running score, and the point log.

use crate::logic::{apply_point, replay};
use crate::models::player::RosterEntry;
use crate::models::score::{MatchFormat, MatchScore, PointEvent, PointType, ScoringError, Side};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Owns the scoring state for one bracket match. Points are applied one at a time; the log is
/// append-only except for undo, which rebuilds the score from the remaining points.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchController {
    pub round: usize,
    pub position: usize,
    pub player_a: RosterEntry,
    pub player_b: RosterEntry,
    pub first_server: Side,
    pub score: MatchScore,
    /// Oldest first.
    pub history: Vec<PointEvent>,
}

impl MatchController {
    pub fn new(
        round: usize,
        position: usize,
        player_a: RosterEntry,
        player_b: RosterEntry,
        format: MatchFormat,
        first_server: Side,
    ) -> Self {
        Self {
            round,
            position,
            player_a,
            player_b,
            first_server,
            score: MatchScore::new(format, first_server),
            history: Vec::new(),
        }
    }

    pub fn entry(&self, side: Side) -> &RosterEntry {
        match side {
            Side::A => &self.player_a,
            Side::B => &self.player_b,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.score.winner.is_some()
    }

    pub fn winner_entry(&self) -> Option<&RosterEntry> {
        self.score.winner.map(|side| self.entry(side))
    }

    /// Apply a point and log it.
    pub fn score_point(
        &mut self,
        scorer: Side,
        point_type: PointType,
    ) -> Result<&MatchScore, ScoringError> {
        let server_at_time = self.score.server;
        let next = apply_point(&self.score, scorer, point_type)?;
        self.history.push(PointEvent {
            timestamp: Utc::now(),
            scorer,
            server_at_time,
            resulting_score_display: next.display(),
            point_type,
        });
        self.score = next;
        Ok(&self.score)
    }

    /// Drop the latest point and replay the rest of the log. Returns the removed point.
    pub fn undo_last_point(&mut self) -> Result<PointEvent, ScoringError> {
        let last = self.history.pop().ok_or(ScoringError::NothingToUndo)?;
        match replay(self.score.format, self.first_server, &self.history) {
            Ok(score) => {
                self.score = score;
                Ok(last)
            }
            Err(e) => {
                self.history.push(last);
                Err(e)
            }
        }
    }
}
