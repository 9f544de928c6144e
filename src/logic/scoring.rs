//! Tennis scoring: a pure transition from one `MatchScore` to the next, one point at a time.

use crate::models::{MatchFormat, MatchScore, PointEvent, PointType, ScoringError, SetScore, Side};

/// Points needed to win a regular game (with a two-point lead).
pub const POINTS_PER_GAME: u32 = 4;
/// Games needed to win a set (with a two-game lead).
pub const GAMES_PER_SET: u32 = 6;
/// Points needed to win a tiebreak (with a two-point lead).
pub const TIEBREAK_POINTS: u32 = 7;

/// Reached `target` and leads by at least two.
fn won_with_margin(won: u32, lost: u32, target: u32) -> bool {
    won >= target && won >= lost + 2
}

/// Apply one point won by `scorer` and return the new score.
///
/// Rejected once the match has a winner. Aces must go to the server and double faults to the
/// receiver.
pub fn apply_point(
    score: &MatchScore,
    scorer: Side,
    point_type: PointType,
) -> Result<MatchScore, ScoringError> {
    if score.winner.is_some() {
        log::warn!("Point for {} dropped: match already decided", scorer);
        return Err(ScoringError::ScoringAfterCompletion);
    }
    let consistent = match point_type {
        PointType::Ace => scorer == score.server,
        PointType::DoubleFault => scorer != score.server,
        _ => true,
    };
    if !consistent {
        return Err(ScoringError::InconsistentPointType { point_type, scorer });
    }

    let mut next = score.clone();
    next.current_game.add_point(scorer);
    let game = next.current_game;
    let (won, lost) = (game.points(scorer), game.points(scorer.other()));

    match next.tiebreak_first_server {
        Some(first) => {
            if won_with_margin(won, lost, TIEBREAK_POINTS) {
                complete_tiebreak(&mut next, scorer, first);
            } else {
                next.server = tiebreak_server(first, game.points_a + game.points_b);
            }
        }
        None => {
            if won_with_margin(won, lost, POINTS_PER_GAME) {
                complete_game(&mut next, scorer);
            }
        }
    }
    Ok(next)
}

fn complete_game(score: &mut MatchScore, winner: Side) {
    let game = std::mem::take(&mut score.current_game);
    let set_index = score.current_set_index;
    score.sets[set_index].add_game(winner, game);
    score.server = score.server.other();

    let set = &score.sets[set_index];
    let (won, lost) = (set.games(winner), set.games(winner.other()));
    if won_with_margin(won, lost, GAMES_PER_SET) {
        complete_set(score, winner);
    } else if score.format.tiebreak_sets && won == GAMES_PER_SET && lost == GAMES_PER_SET {
        start_tiebreak(score);
    }
}

/// Switch the current set into its tiebreak at 6-6. The player due to serve next serves first.
pub fn start_tiebreak(score: &mut MatchScore) {
    log::debug!("Tiebreak in set {}", score.current_set_index + 1);
    score.tiebreak_first_server = Some(score.server);
}

/// Tiebreak serve: first server takes point 1, then it alternates every two points.
fn tiebreak_server(first: Side, points_played: u32) -> Side {
    if (points_played + 1) / 2 % 2 == 0 {
        first
    } else {
        first.other()
    }
}

fn complete_tiebreak(score: &mut MatchScore, winner: Side, first_server: Side) {
    let game = std::mem::take(&mut score.current_game);
    score.sets[score.current_set_index].add_game(winner, game);
    score.tiebreak_first_server = None;
    // The player who received first in the tiebreak serves the next set.
    score.server = first_server.other();
    complete_set(score, winner);
}

fn complete_set(score: &mut MatchScore, winner: Side) {
    score.sets[score.current_set_index].winner = Some(winner);
    match winner {
        Side::A => score.sets_won_a += 1,
        Side::B => score.sets_won_b += 1,
    }
    if score.sets_won(winner) >= score.format.sets_to_win {
        score.winner = Some(winner);
        log::info!("Match won by {} ({})", winner, score.display());
    } else {
        score.sets.push(SetScore::default());
        score.current_set_index += 1;
    }
}

/// Display for one player's points in a regular game, given the opponent's points.
///
/// `0`, `15`, `30`, `40`; at 40-40 both show `40`; one point ahead after that shows `AD` for the
/// leader and `40` for the trailer; a finished game shows `GAME`.
pub fn format_game_score(points: u32, opponent_points: u32) -> String {
    let s = if won_with_margin(points, opponent_points, POINTS_PER_GAME) {
        "GAME"
    } else if points >= 3 && opponent_points >= 3 {
        if points > opponent_points {
            "AD"
        } else {
            "40"
        }
    } else {
        match points {
            0 => "0",
            1 => "15",
            2 => "30",
            _ => "40",
        }
    };
    s.to_string()
}

/// Rebuild a score from scratch by applying every logged point in order.
pub fn replay(
    format: MatchFormat,
    first_server: Side,
    events: &[PointEvent],
) -> Result<MatchScore, ScoringError> {
    events
        .iter()
        .try_fold(MatchScore::new(format, first_server), |score, e| {
            apply_point(&score, e.scorer, e.point_type)
        })
}

