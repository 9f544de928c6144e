//! Match play: starting matches, scoring points, and feeding results into the draw.

use crate::logic::{advance_winner, reopen_match};
use crate::models::{
    MatchController, MatchStatus, PlayerId, PointEvent, PointType, ProgressionError,
    ScoringError, Side, Tournament, TournamentError, TournamentState,
};
use rand::Rng;

fn require_play_state(tournament: &Tournament) -> Result<(), TournamentError> {
    if matches!(
        tournament.state,
        TournamentState::Drawn | TournamentState::InProgress
    ) {
        Ok(())
    } else {
        Err(TournamentError::InvalidState)
    }
}

/// Record a bracket result and mark the tournament completed once the final is decided.
fn decide_match(
    tournament: &mut Tournament,
    round: usize,
    position: usize,
    winner: PlayerId,
) -> Result<(), TournamentError> {
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    advance_winner(bracket, round, position, winner)?;
    if let Some(champion) = bracket.champion() {
        log::info!(
            "Tournament {}: {} is champion",
            tournament.id,
            champion.display_name
        );
        tournament.state = TournamentState::Completed;
    } else {
        tournament.state = TournamentState::InProgress;
    }
    Ok(())
}

/// Start point-by-point scoring for match (round, position). Without a first server, a coin toss
/// decides.
pub fn start_match(
    tournament: &mut Tournament,
    round: usize,
    position: usize,
    first_server: Option<Side>,
) -> Result<(), TournamentError> {
    require_play_state(tournament)?;
    let format = tournament.format;
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    let node = bracket
        .node_mut(round, position)
        .ok_or(ProgressionError::NodeNotFound { round, position })?;
    match node.status {
        MatchStatus::Pending => {}
        MatchStatus::InProgress => return Err(TournamentError::InvalidState),
        MatchStatus::Completed => {
            return Err(ProgressionError::MatchAlreadyDecided { round, position }.into())
        }
    }
    let (player_a, player_b) = match (node.slot_a.entry(), node.slot_b.entry()) {
        (Some(a), Some(b)) => (a.clone(), b.clone()),
        _ => return Err(TournamentError::MatchNotReady { round, position }),
    };
    let server = first_server.unwrap_or_else(|| {
        if rand::thread_rng().gen_bool(0.5) {
            Side::A
        } else {
            Side::B
        }
    });
    node.status = MatchStatus::InProgress;

    log::info!(
        "Starting {} vs {} (round {} position {}), {} serves",
        player_a.display_name,
        player_b.display_name,
        round,
        position,
        server
    );
    tournament
        .matches
        .retain(|m| !(m.round == round && m.position == position));
    tournament.matches.push(MatchController::new(
        round, position, player_a, player_b, format, server,
    ));
    tournament.state = TournamentState::InProgress;
    Ok(())
}

/// Score one point in a live match. When it ends the match, the winner advances in the draw.
pub fn score_point(
    tournament: &mut Tournament,
    round: usize,
    position: usize,
    scorer: Side,
    point_type: PointType,
) -> Result<(), TournamentError> {
    if tournament.state == TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    let m = tournament
        .live_match_mut(round, position)
        .ok_or(TournamentError::MatchNotFound { round, position })?;
    m.score_point(scorer, point_type)?;
    log::debug!("Round {} position {}: {}", round, position, m.score.display());
    let winner = m.winner_entry().map(|e| e.player_id);
    if let Some(winner) = winner {
        decide_match(tournament, round, position, winner)?;
    }
    Ok(())
}

/// Take back the latest point of a match. If that point had decided the match, the result is
/// first withdrawn from the draw, which fails if the winner has already started the next match.
pub fn undo_point(
    tournament: &mut Tournament,
    round: usize,
    position: usize,
) -> Result<PointEvent, TournamentError> {
    if tournament.state == TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    let m = tournament
        .live_match(round, position)
        .ok_or(TournamentError::MatchNotFound { round, position })?;
    if m.history.is_empty() {
        return Err(ScoringError::NothingToUndo.into());
    }

    if m.is_complete() {
        let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
        reopen_match(bracket, round, position)?;
        if let Some(node) = bracket.node_mut(round, position) {
            node.status = MatchStatus::InProgress;
        }
        tournament.state = TournamentState::InProgress;
    }
    let m = tournament
        .live_match_mut(round, position)
        .ok_or(TournamentError::MatchNotFound { round, position })?;
    let event = m.undo_last_point()?;
    log::debug!("Undid point for {} at round {} position {}", event.scorer, round, position);
    Ok(event)
}

/// Decide a match without scoring (walkover, retirement, or a result entered after play).
pub fn record_walkover(
    tournament: &mut Tournament,
    round: usize,
    position: usize,
    winner: PlayerId,
) -> Result<(), TournamentError> {
    require_play_state(tournament)?;
    let already_decided = tournament
        .bracket
        .as_ref()
        .and_then(|b| b.node(round, position))
        .is_some_and(|n| n.is_completed());
    decide_match(tournament, round, position, winner)?;
    if !already_decided {
        tournament
            .matches
            .retain(|m| !(m.round == round && m.position == position));
    }
    Ok(())
}

/// Withdraw a decided result so the match can be replayed. Any point log for it is discarded.
pub fn reopen_tournament_match(
    tournament: &mut Tournament,
    round: usize,
    position: usize,
) -> Result<(), TournamentError> {
    if !matches!(
        tournament.state,
        TournamentState::InProgress | TournamentState::Completed
    ) {
        return Err(TournamentError::InvalidState);
    }
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    reopen_match(bracket, round, position)?;
    tournament
        .matches
        .retain(|m| !(m.round == round && m.position == position));
    tournament.state = TournamentState::InProgress;
    Ok(())
}
