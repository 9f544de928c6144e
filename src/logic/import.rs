//! Roster import from CSV: `name[,ranking[,seed]]`, one player per line, optional header.

use crate::models::{PlayerId, Tournament, TournamentError};
use std::io::Read;

fn parse_number(field: Option<&str>, what: &str, line: u64) -> Result<Option<u32>, TournamentError> {
    match field.map(str::trim).filter(|f| !f.is_empty()) {
        None => Ok(None),
        Some(f) => f.parse::<u32>().map(Some).map_err(|_| {
            TournamentError::ImportFailed(format!("line {}: invalid {} '{}'", line, what, f))
        }),
    }
}

/// Add every player in the CSV. Either all rows are added or none are.
pub fn import_roster_csv<R: Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<Vec<PlayerId>, TournamentError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut staged = tournament.clone();
    let mut added = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|e| TournamentError::ImportFailed(e.to_string()))?;
        let line = record.position().map(|p| p.line()).unwrap_or(i as u64 + 1);
        let name = record.get(0).unwrap_or("");
        if i == 0 && name.eq_ignore_ascii_case("name") {
            continue;
        }
        if name.is_empty() && record.len() <= 1 {
            continue;
        }
        let ranking = parse_number(record.get(1), "ranking", line)?;
        let seed = parse_number(record.get(2), "seed", line)?;
        let id = staged
            .add_player(name, ranking)
            .map_err(|e| TournamentError::ImportFailed(format!("line {}: {}", line, e)))?;
        if seed.is_some() {
            staged
                .set_seed(id, seed)
                .map_err(|e| TournamentError::ImportFailed(format!("line {}: {}", line, e)))?;
        }
        added.push(id);
    }

    log::info!("Imported {} players into tournament {}", added.len(), tournament.id);
    *tournament = staged;
    Ok(added)
}
