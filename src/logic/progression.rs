//! Match progression: moving winners into the next round, completing bye matches, and reopening
//! decided matches.

use crate::models::{Bracket, MatchStatus, PlayerId, ProgressionError, Slot};

/// Put `slot` into the next-round node fed by (round, position). No-op after the final.
fn fill_next(
    bracket: &mut Bracket,
    round: usize,
    position: usize,
    slot: Slot,
) -> Result<(), ProgressionError> {
    if round >= bracket.total_rounds() {
        return Ok(());
    }
    let (next_round, next_position) = (round + 1, position.div_ceil(2));
    let target = match bracket.node_mut(next_round, next_position) {
        Some(t) => t,
        None => return Err(target_missing(next_round, next_position)),
    };
    if position % 2 == 1 {
        target.slot_a = slot;
    } else {
        target.slot_b = slot;
    }
    Ok(())
}

fn target_missing(round: usize, position: usize) -> ProgressionError {
    let err = ProgressionError::ProgressionTargetMissing { round, position };
    log::error!("{}", err);
    err
}

/// Complete every pending node that has a bye on one side (the player advances) or on both
/// sides (a bye advances). Runs round by round so byes carry through several rounds.
pub fn auto_advance_byes(bracket: &mut Bracket) -> Result<(), ProgressionError> {
    for r in 0..bracket.rounds.len() {
        for p in 0..bracket.rounds[r].len() {
            let node = &mut bracket.rounds[r][p];
            if node.status != MatchStatus::Pending {
                continue;
            }
            let advancing = match (&node.slot_a, &node.slot_b) {
                (Slot::Bye, Slot::Bye) => Slot::Bye,
                (Slot::Player(e), Slot::Bye) | (Slot::Bye, Slot::Player(e)) => {
                    node.winner = Some(e.clone());
                    Slot::Player(e.clone())
                }
                _ => continue,
            };
            node.status = MatchStatus::Completed;
            node.auto_advanced = true;
            let (round, position) = (node.round, node.position);
            log::debug!("Auto-advanced bye at round {} position {}", round, position);
            fill_next(bracket, round, position, advancing)?;
        }
    }
    Ok(())
}

/// Record `winner` for node (round, position) and carry them into the next round.
///
/// Calling again with the same winner is a no-op; a different winner is rejected. Nothing is
/// changed when an error is returned.
pub fn advance_winner(
    bracket: &mut Bracket,
    round: usize,
    position: usize,
    winner: PlayerId,
) -> Result<(), ProgressionError> {
    let total_rounds = bracket.total_rounds();
    let node = bracket
        .node(round, position)
        .ok_or(ProgressionError::NodeNotFound { round, position })?;

    if node.is_completed() {
        return match &node.winner {
            Some(w) if w.player_id == winner => Ok(()),
            _ => Err(ProgressionError::MatchAlreadyDecided { round, position }),
        };
    }
    if !node.is_ready() {
        return Err(ProgressionError::ParticipantsUnresolved { round, position });
    }
    let entry = [&node.slot_a, &node.slot_b]
        .into_iter()
        .filter_map(|s| s.entry())
        .find(|e| e.player_id == winner)
        .cloned()
        .ok_or(ProgressionError::NotAParticipant(winner))?;
    if round < total_rounds && bracket.node(round + 1, position.div_ceil(2)).is_none() {
        return Err(target_missing(round + 1, position.div_ceil(2)));
    }

    log::info!(
        "{} wins round {} position {}",
        entry.display_name,
        round,
        position
    );
    if let Some(node) = bracket.node_mut(round, position) {
        node.winner = Some(entry.clone());
        node.status = MatchStatus::Completed;
        node.auto_advanced = false;
    }
    fill_next(bracket, round, position, Slot::Player(entry))?;
    // The next match may be against a bye carried from a void sub-draw.
    auto_advance_byes(bracket)
}

/// Undo the result of node (round, position) and retract the winner from later rounds.
///
/// Later nodes that only completed because of a bye are reset along the way. The reopen is
/// rejected if the winner already reached a match that is in progress or was played.
pub fn reopen_match(
    bracket: &mut Bracket,
    round: usize,
    position: usize,
) -> Result<(), ProgressionError> {
    let node = bracket
        .node(round, position)
        .ok_or(ProgressionError::NodeNotFound { round, position })?;
    if !node.is_completed() || node.winner.is_none() || node.auto_advanced {
        return Err(ProgressionError::MatchNotDecided { round, position });
    }

    // Nodes whose slot holds the retracted winner, in order.
    let mut chain = Vec::new();
    let (mut r, mut p) = (round, position);
    while r < bracket.total_rounds() {
        let (nr, np) = (r + 1, p.div_ceil(2));
        let next = bracket.node(nr, np).ok_or_else(|| target_missing(nr, np))?;
        match next.status {
            MatchStatus::Pending => {
                chain.push((nr, np, p % 2 == 1));
                break;
            }
            MatchStatus::Completed if next.auto_advanced => {
                chain.push((nr, np, p % 2 == 1));
                r = nr;
                p = np;
            }
            _ => return Err(ProgressionError::DownstreamMatchStarted { round: nr, position: np }),
        }
    }

    for (r, p, is_slot_a) in chain {
        if let Some(n) = bracket.node_mut(r, p) {
            if is_slot_a {
                n.slot_a = Slot::Unresolved;
            } else {
                n.slot_b = Slot::Unresolved;
            }
            n.winner = None;
            n.status = MatchStatus::Pending;
            n.auto_advanced = false;
        }
    }
    if let Some(n) = bracket.node_mut(round, position) {
        n.winner = None;
        n.status = MatchStatus::Pending;
    }
    log::info!("Reopened round {} position {}", round, position);
    Ok(())
}
