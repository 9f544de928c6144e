//! Seed validation and the standard draw order.
//!
//! Every player gets a rank: seeds first (1..=s), then unseeded players, then byes for the
//! remaining slots. The draw order places rank k against rank `slots + 1 - k` in round 1 and
//! keeps the top ranks apart until the latest possible round.

use crate::models::{BracketError, BracketOptions, RosterEntry, SeedingMode, UnseededPlacement};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Rank occupying each round-1 slot, top of the draw first.
///
/// Built by doubling: `[1, 2]` becomes `[1, 4, 2, 3]`, then `[1, 8, 4, 5, 2, 7, 3, 6]`, and so on.
/// Seeds 1 and 2 end up in opposite halves, 3 and 4 in the remaining quarters, etc.
pub fn seeding_order(slots: usize) -> Vec<usize> {
    let mut order = vec![1];
    let mut size = 1;
    while size < slots {
        size *= 2;
        order = order.iter().flat_map(|&rank| [rank, size + 1 - rank]).collect();
    }
    order
}

/// Check seed numbers on the roster for manual seeding.
pub fn validate_manual_seeds(roster: &[RosterEntry], max_seeds: u32) -> Result<(), BracketError> {
    let mut seen = HashSet::new();
    for seed in roster.iter().filter_map(|e| e.seed) {
        if seed == 0 || seed > max_seeds {
            return Err(BracketError::SeedOutOfRange { seed, max_seeds });
        }
        if !seen.insert(seed) {
            return Err(BracketError::DuplicateSeed(seed));
        }
    }
    Ok(())
}

/// Seeds for auto mode: best `max_seeds` by ranking (unranked last), ties in roster order.
fn auto_seeded(roster: &[RosterEntry], max_seeds: u32) -> Result<Vec<RosterEntry>, BracketError> {
    if roster.len() < max_seeds as usize {
        return Err(BracketError::NotEnoughPlayersToSeed {
            seeds: max_seeds,
            players: roster.len(),
        });
    }
    let mut by_rank: Vec<(usize, &RosterEntry)> = roster.iter().enumerate().collect();
    by_rank.sort_by_key(|(i, e)| (e.ranking.is_none(), e.ranking, *i));
    let mut seeds = vec![None; roster.len()];
    for (seed, (i, _)) in by_rank.into_iter().take(max_seeds as usize).enumerate() {
        seeds[i] = Some(seed as u32 + 1);
    }
    Ok(roster
        .iter()
        .zip(seeds)
        .map(|(e, seed)| RosterEntry {
            seed,
            ..e.clone()
        })
        .collect())
}

/// Roster in rank order (index 0 is rank 1). Seed values are rewritten to match the mode.
pub fn rank_entries<R: Rng + ?Sized>(
    roster: &[RosterEntry],
    options: &BracketOptions,
    rng: &mut R,
) -> Result<Vec<RosterEntry>, BracketError> {
    let entries: Vec<RosterEntry> = match options.seeding {
        SeedingMode::Unseeded => roster
            .iter()
            .map(|e| RosterEntry {
                seed: None,
                ..e.clone()
            })
            .collect(),
        SeedingMode::Manual => {
            validate_manual_seeds(roster, options.max_seeds)?;
            roster.to_vec()
        }
        SeedingMode::Auto => auto_seeded(roster, options.max_seeds)?,
    };

    let (mut seeded, mut unseeded): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(|e| e.seed.is_some());
    seeded.sort_by_key(|e| e.seed);
    if options.unseeded_placement == UnseededPlacement::Random {
        unseeded.shuffle(rng);
    }
    seeded.append(&mut unseeded);
    Ok(seeded)
}
