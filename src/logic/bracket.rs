//! Single-elimination draw generation and round naming.

use crate::logic::progression::auto_advance_byes;
use crate::logic::seeding::{rank_entries, seeding_order};
use crate::models::{Bracket, BracketError, BracketOptions, RosterEntry, Slot};
use rand::Rng;
use std::collections::HashSet;

/// Build the full draw for `roster`, shuffling unseeded players with the thread RNG when asked to.
pub fn generate_bracket(
    roster: &[RosterEntry],
    options: &BracketOptions,
) -> Result<Bracket, BracketError> {
    generate_bracket_with_rng(roster, options, &mut rand::thread_rng())
}

/// Build the full draw:
///
/// 1. Validate capacity, player ids and seeds.
/// 2. Rank entries: seeds, then unseeded players, then byes for the leftover slots.
/// 3. Lay ranks out in the standard draw order (byes land against the top ranks).
/// 4. Complete every bye match and carry the winners forward.
pub fn generate_bracket_with_rng<R: Rng + ?Sized>(
    roster: &[RosterEntry],
    options: &BracketOptions,
    rng: &mut R,
) -> Result<Bracket, BracketError> {
    let draw_size = options.draw_size;
    if roster.len() > draw_size.slots() {
        return Err(BracketError::InsufficientCapacity {
            entries: roster.len(),
            draw_size: draw_size.get(),
        });
    }
    let mut ids = HashSet::new();
    if let Some(dup) = roster.iter().find(|e| !ids.insert(e.player_id)) {
        return Err(BracketError::DuplicatePlayer(dup.player_id));
    }

    let ranked = rank_entries(roster, options, rng)?;
    let slot_for = |rank: usize| {
        ranked
            .get(rank - 1)
            .cloned()
            .map(Slot::Player)
            .unwrap_or(Slot::Bye)
    };

    let mut bracket = Bracket::empty(draw_size);
    let order = seeding_order(draw_size.slots());
    for (node, pair) in bracket.rounds[0].iter_mut().zip(order.chunks_exact(2)) {
        node.slot_a = slot_for(pair[0]);
        node.slot_b = slot_for(pair[1]);
    }

    auto_advance_byes(&mut bracket)?;
    log::info!(
        "Generated {}-draw for {} players ({} byes, {} rounds)",
        draw_size,
        roster.len(),
        bracket.bye_count(),
        bracket.total_rounds()
    );
    Ok(bracket)
}

/// Display name of a round: Final, Semifinals, Quarterfinals, otherwise "Round of N".
pub fn round_name(round: usize, total_rounds: usize) -> String {
    match total_rounds.saturating_sub(round) {
        0 => "Final".to_string(),
        1 => "Semifinals".to_string(),
        2 => "Quarterfinals".to_string(),
        left => format!("Round of {}", 1u64 << (left + 1).min(63)),
    }
}
