//! Integration tests for the tournament lifecycle: setup, roster import, draw, and match play.

use tennis_tournament_web::{
    import_roster_csv, make_draw, record_walkover, reopen_tournament_match, score_point,
    start_match, undo_point, BracketError, BracketOptions, DrawSize, MatchFormat, MatchStatus,
    PlayerId, PointType, ProgressionError, ScoringError, SeedingMode, Side, Slot, Tournament,
    TournamentError, TournamentState, UnseededPlacement,
};

fn options(draw_size: u32) -> BracketOptions {
    BracketOptions {
        draw_size: DrawSize::new(draw_size).unwrap(),
        seeding: SeedingMode::Unseeded,
        max_seeds: 8,
        unseeded_placement: UnseededPlacement::RosterOrder,
    }
}

/// Four players in a 4-draw, one-set matches. Round 1 is Ana v Dot and Bea v Cid.
fn four_player_tournament() -> (Tournament, Vec<PlayerId>) {
    let mut t = Tournament::new("Club Open", options(4), MatchFormat::best_of(1).unwrap());
    let ids = ["Ana", "Bea", "Cid", "Dot"]
        .iter()
        .map(|name| t.add_player(*name, None).unwrap())
        .collect();
    (t, ids)
}

/// Score a 6-0 set for `side`.
fn win_set(t: &mut Tournament, round: usize, position: usize, side: Side) {
    for _ in 0..24 {
        score_point(t, round, position, side, PointType::Winner).unwrap();
    }
}

#[test]
fn add_player_validation() {
    let mut t = Tournament::new("Club Open", options(4), MatchFormat::default());
    let ana = t.add_player("  Ana ", Some(12)).unwrap();
    assert_eq!(t.get_player(ana).unwrap().name, "Ana");
    assert_eq!(t.get_player(ana).unwrap().ranking, Some(12));

    assert_eq!(t.add_player("", None), Err(TournamentError::EmptyName));
    assert_eq!(t.add_player("   ", None), Err(TournamentError::EmptyName));
    assert_eq!(
        t.add_player("ANA", None),
        Err(TournamentError::DuplicatePlayerName)
    );
    assert_eq!(t.players.len(), 1);

    t.remove_player(ana).unwrap();
    assert!(t.players.is_empty());
    assert_eq!(
        t.remove_player(ana),
        Err(TournamentError::PlayerNotFound(ana))
    );
}

#[test]
fn manual_seeds_are_checked_when_set() {
    let (mut t, ids) = four_player_tournament();
    t.set_seeding(SeedingMode::Manual, 2).unwrap();
    t.set_seed(ids[2], Some(1)).unwrap();
    assert_eq!(
        t.set_seed(ids[3], Some(1)),
        Err(TournamentError::Bracket(BracketError::DuplicateSeed(1)))
    );
    assert_eq!(
        t.set_seed(ids[3], Some(3)),
        Err(TournamentError::Bracket(BracketError::SeedOutOfRange {
            seed: 3,
            max_seeds: 2
        }))
    );
    assert!(matches!(
        t.set_seed(ids[3], Some(0)),
        Err(TournamentError::Bracket(BracketError::SeedOutOfRange { seed: 0, .. }))
    ));
    let stranger = uuid::Uuid::new_v4();
    assert_eq!(
        t.set_seed(stranger, Some(2)),
        Err(TournamentError::PlayerNotFound(stranger))
    );

    // Cid holds seed 1 and so opens the draw.
    make_draw(&mut t).unwrap();
    let bracket = t.bracket.as_ref().unwrap();
    assert!(bracket.rounds[0][0].slot_a.holds(ids[2]));

    t.set_seed(ids[2], None).unwrap();
    assert_eq!(t.state, TournamentState::Setup);
    t.set_seed(ids[3], Some(1)).unwrap();
}

#[test]
fn csv_import_adds_every_row() {
    let mut t = Tournament::new("Club Open", options(8), MatchFormat::default());
    let csv = "name,ranking,seed\nAna,3,1\nBea,,\n\nCid,10\n";
    let added = import_roster_csv(&mut t, csv.as_bytes()).unwrap();
    assert_eq!(added.len(), 3);

    let names: Vec<_> = t.players.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Ana", "Bea", "Cid"]);
    let ana = t.get_player(added[0]).unwrap();
    assert_eq!((ana.ranking, ana.seed), (Some(3), Some(1)));
    let bea = t.get_player(added[1]).unwrap();
    assert_eq!((bea.ranking, bea.seed), (None, None));
    assert_eq!(t.get_player(added[2]).unwrap().ranking, Some(10));
}

#[test]
fn csv_import_is_all_or_nothing() {
    let mut t = Tournament::new("Club Open", options(8), MatchFormat::default());
    t.add_player("Zoe", None).unwrap();

    let bad_ranking = "Ana,1\nBea,first\n";
    assert!(matches!(
        import_roster_csv(&mut t, bad_ranking.as_bytes()),
        Err(TournamentError::ImportFailed(msg)) if msg.contains("line 2")
    ));
    let clash = "Ana\nzoe\n";
    assert!(matches!(
        import_roster_csv(&mut t, clash.as_bytes()),
        Err(TournamentError::ImportFailed(_))
    ));
    assert_eq!(t.players.len(), 1);
}

#[test]
fn full_tournament_to_a_champion() {
    let (mut t, ids) = four_player_tournament();
    assert_eq!(t.state, TournamentState::Setup);
    make_draw(&mut t).unwrap();
    assert_eq!(t.state, TournamentState::Drawn);

    start_match(&mut t, 1, 1, Some(Side::A)).unwrap();
    assert_eq!(t.state, TournamentState::InProgress);
    let node = t.bracket.as_ref().unwrap().node(1, 1).unwrap();
    assert_eq!(node.status, MatchStatus::InProgress);

    score_point(&mut t, 1, 1, Side::A, PointType::Ace).unwrap();
    assert_eq!(t.live_match(1, 1).unwrap().score.display(), "0-0 15-0");
    for _ in 0..23 {
        score_point(&mut t, 1, 1, Side::A, PointType::Winner).unwrap();
    }
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.node(1, 1).unwrap().status, MatchStatus::Completed);
    assert!(bracket.node(2, 1).unwrap().slot_a.holds(ids[0]));

    record_walkover(&mut t, 1, 2, ids[2]).unwrap();
    assert!(t.bracket.as_ref().unwrap().node(2, 1).unwrap().is_ready());

    start_match(&mut t, 2, 1, Some(Side::B)).unwrap();
    win_set(&mut t, 2, 1, Side::B);
    assert_eq!(t.state, TournamentState::Completed);
    assert_eq!(t.champion().unwrap().player_id, ids[2]);

    assert_eq!(
        score_point(&mut t, 2, 1, Side::A, PointType::Winner),
        Err(TournamentError::Scoring(ScoringError::ScoringAfterCompletion))
    );
}

#[test]
fn undo_of_a_deciding_point_reopens_the_match() {
    let (mut t, ids) = four_player_tournament();
    make_draw(&mut t).unwrap();
    start_match(&mut t, 1, 1, Some(Side::A)).unwrap();
    win_set(&mut t, 1, 1, Side::B);
    assert!(t.bracket.as_ref().unwrap().node(2, 1).unwrap().slot_a.holds(ids[3]));

    let undone = undo_point(&mut t, 1, 1).unwrap();
    assert_eq!(undone.scorer, Side::B);
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.node(1, 1).unwrap().status, MatchStatus::InProgress);
    assert_eq!(bracket.node(1, 1).unwrap().winner, None);
    assert_eq!(bracket.node(2, 1).unwrap().slot_a, Slot::Unresolved);
    assert_eq!(t.live_match(1, 1).unwrap().score.display(), "0-5 0-40");

    score_point(&mut t, 1, 1, Side::B, PointType::Winner).unwrap();
    assert!(t.bracket.as_ref().unwrap().node(2, 1).unwrap().slot_a.holds(ids[3]));
}

#[test]
fn undo_is_refused_once_the_next_match_started() {
    let (mut t, ids) = four_player_tournament();
    make_draw(&mut t).unwrap();
    start_match(&mut t, 1, 1, Some(Side::A)).unwrap();
    win_set(&mut t, 1, 1, Side::A);
    record_walkover(&mut t, 1, 2, ids[1]).unwrap();
    start_match(&mut t, 2, 1, None).unwrap();

    assert_eq!(
        undo_point(&mut t, 1, 1),
        Err(TournamentError::Progression(
            ProgressionError::DownstreamMatchStarted {
                round: 2,
                position: 1
            }
        ))
    );
    assert_eq!(t.live_match(1, 1).unwrap().history.len(), 24);
    assert_eq!(
        reopen_tournament_match(&mut t, 1, 2),
        Err(TournamentError::Progression(
            ProgressionError::DownstreamMatchStarted {
                round: 2,
                position: 1
            }
        ))
    );
}

#[test]
fn reopen_discards_the_point_log() {
    let (mut t, ids) = four_player_tournament();
    make_draw(&mut t).unwrap();
    start_match(&mut t, 1, 2, Some(Side::A)).unwrap();
    win_set(&mut t, 1, 2, Side::A);

    reopen_tournament_match(&mut t, 1, 2).unwrap();
    assert!(t.live_match(1, 2).is_none());
    let node = t.bracket.as_ref().unwrap().node(1, 2).unwrap();
    assert_eq!(node.status, MatchStatus::Pending);

    record_walkover(&mut t, 1, 2, ids[2]).unwrap();
    assert!(t.bracket.as_ref().unwrap().node(2, 1).unwrap().slot_b.holds(ids[2]));
}

#[test]
fn setup_changes_discard_the_draw_until_play_starts() {
    let (mut t, _) = four_player_tournament();
    make_draw(&mut t).unwrap();
    assert!(t.bracket.is_some());

    t.set_match_format(MatchFormat::best_of_three()).unwrap();
    assert_eq!(t.state, TournamentState::Setup);
    assert!(t.bracket.is_none());

    // Drawing again replaces the draw without going through setup.
    make_draw(&mut t).unwrap();
    make_draw(&mut t).unwrap();
    assert_eq!(t.state, TournamentState::Drawn);

    start_match(&mut t, 1, 1, None).unwrap();
    assert_eq!(t.add_player("Eve", None), Err(TournamentError::InvalidState));
    assert_eq!(t.set_draw_size(8), Err(TournamentError::InvalidState));
    assert_eq!(
        t.set_seeding(SeedingMode::Auto, 2),
        Err(TournamentError::InvalidState)
    );
    assert_eq!(make_draw(&mut t), Err(TournamentError::InvalidState));
    assert!(t.bracket.is_some());
}

#[test]
fn failed_redraw_keeps_the_previous_draw() {
    let (mut t, _) = four_player_tournament();
    make_draw(&mut t).unwrap();
    let before = t.bracket.clone();

    t.options.draw_size = DrawSize::new(2).unwrap();
    assert_eq!(
        make_draw(&mut t),
        Err(TournamentError::Bracket(BracketError::InsufficientCapacity {
            entries: 4,
            draw_size: 2
        }))
    );
    assert_eq!(t.bracket, before);
    assert_eq!(t.state, TournamentState::Drawn);
}

#[test]
fn bad_settings_are_rejected() {
    let (mut t, _) = four_player_tournament();
    assert_eq!(
        t.set_draw_size(12),
        Err(TournamentError::Bracket(BracketError::InvalidDrawSize(12)))
    );
    assert_eq!(
        t.set_match_format(MatchFormat {
            sets_to_win: 0,
            tiebreak_sets: true
        }),
        Err(TournamentError::InvalidMatchFormat)
    );
    assert_eq!(t.format, MatchFormat::best_of(1).unwrap());
    assert_eq!(t.options.draw_size.get(), 4);
}

#[test]
fn matches_must_exist_and_be_ready() {
    let (mut t, _) = four_player_tournament();
    assert_eq!(
        start_match(&mut t, 1, 1, None),
        Err(TournamentError::InvalidState)
    );
    make_draw(&mut t).unwrap();

    assert_eq!(
        start_match(&mut t, 2, 1, None),
        Err(TournamentError::MatchNotReady {
            round: 2,
            position: 1
        })
    );
    assert_eq!(
        start_match(&mut t, 3, 1, None),
        Err(TournamentError::Progression(ProgressionError::NodeNotFound {
            round: 3,
            position: 1
        }))
    );
    assert_eq!(
        score_point(&mut t, 1, 1, Side::A, PointType::Winner),
        Err(TournamentError::MatchNotFound {
            round: 1,
            position: 1
        })
    );
    start_match(&mut t, 1, 1, None).unwrap();
    assert_eq!(
        start_match(&mut t, 1, 1, None),
        Err(TournamentError::InvalidState)
    );
    assert_eq!(
        undo_point(&mut t, 1, 1),
        Err(TournamentError::Scoring(ScoringError::NothingToUndo))
    );
}

#[test]
fn auto_seeding_uses_rankings() {
    let mut t = Tournament::new("Masters", options(32), MatchFormat::default());
    for i in 0..24u32 {
        t.add_player(format!("Player {i}"), Some(24 - i)).unwrap();
    }
    t.set_seeding(SeedingMode::Auto, 8).unwrap();
    make_draw(&mut t).unwrap();

    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.bye_count(), 8);
    let top = bracket.rounds[0][0].slot_a.entry().unwrap();
    assert_eq!(top.display_name, "Player 23");
    assert_eq!(top.seed, Some(1));
    // Seed 2 opens the bottom half.
    let second = bracket.rounds[0][8].slot_a.entry().unwrap();
    assert_eq!(second.display_name, "Player 22");
    // The eight seeds all get byes into round 2.
    for node in &bracket.rounds[1] {
        let seed = node.slot_a.entry().and_then(|e| e.seed);
        assert!(matches!(seed, Some(1..=8)), "{:?}", node.slot_a);
    }
}

#[test]
fn repeating_a_played_result_as_walkover_keeps_the_point_log() {
    let (mut t, ids) = four_player_tournament();
    make_draw(&mut t).unwrap();
    start_match(&mut t, 1, 1, Some(Side::A)).unwrap();
    win_set(&mut t, 1, 1, Side::A);

    record_walkover(&mut t, 1, 1, ids[0]).unwrap();
    let m = t.live_match(1, 1).unwrap();
    assert_eq!(m.history.len(), 24);
    assert!(m.is_complete());

    // A walkover on an unplayed match still drops any controller.
    start_match(&mut t, 1, 2, Some(Side::A)).unwrap();
    score_point(&mut t, 1, 2, Side::A, PointType::Winner).unwrap();
    record_walkover(&mut t, 1, 2, ids[2]).unwrap();
    assert!(t.live_match(1, 2).is_none());
}
