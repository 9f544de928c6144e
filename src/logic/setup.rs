//! Setup phase: make the draw (transition from Setup to Drawn).

use crate::logic::generate_bracket;
use crate::models::{Tournament, TournamentError, TournamentState};

/// Generate the draw from the current roster and options. Allowed until a match starts; a
/// previous draw is replaced only when the new one is built successfully.
pub fn make_draw(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if !matches!(
        tournament.state,
        TournamentState::Setup | TournamentState::Drawn
    ) {
        return Err(TournamentError::InvalidState);
    }
    let roster = tournament.roster();
    let bracket = generate_bracket(&roster, &tournament.options)?;
    let complete = bracket.is_complete();
    tournament.bracket = Some(bracket);
    tournament.matches.clear();
    tournament.state = if complete {
        TournamentState::Completed
    } else {
        TournamentState::Drawn
    };
    Ok(())
}
