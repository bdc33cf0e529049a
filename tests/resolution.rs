//! Integration tests for match resolution.

use chrono::NaiveDate;
use pickleball_journal::logic::{derive_winner_from_scores, is_set_included};
use pickleball_journal::{resolve_match, GameMatch, Player, SetEntry, Side};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
}

fn singles(sets: Vec<SetEntry>) -> GameMatch {
    let a = Player::new("Ari");
    let b = Player::new("Blake");
    GameMatch::singles(date(), a.id, b.id, sets)
}

fn set(score_a: u32, score_b: u32, winner: Side) -> SetEntry {
    SetEntry {
        winner_side: Some(winner),
        ..SetEntry::scored(score_a, score_b)
    }
}

#[test]
fn two_set_sweep_resolves_to_side_a() {
    let m = singles(vec![set(11, 8, Side::A), set(11, 7, Side::A)]);
    let res = resolve_match(&m);
    assert_eq!(res.winner_side, Some(Side::A));
    assert_eq!(res.set_wins_a, 2);
    assert_eq!(res.set_wins_b, 0);
}

#[test]
fn more_set_wins_beats_the_override() {
    let mut m = singles(vec![
        set(9, 11, Side::B),
        set(11, 5, Side::A),
        set(8, 11, Side::B),
    ]);
    m.match_winner_side = Some(Side::A);
    let res = resolve_match(&m);
    assert_eq!(res.winner_side, Some(Side::B));
    assert_eq!((res.set_wins_a, res.set_wins_b), (1, 2));
}

#[test]
fn tied_sets_without_override_have_no_winner() {
    let m = singles(vec![set(11, 9, Side::A), set(9, 11, Side::B)]);
    assert_eq!(resolve_match(&m).winner_side, None);
}

#[test]
fn tied_sets_fall_back_to_override() {
    let mut m = singles(vec![set(11, 9, Side::A), set(9, 11, Side::B)]);
    m.match_winner_side = Some(Side::B);
    let res = resolve_match(&m);
    assert_eq!(res.winner_side, Some(Side::B));
    assert_eq!((res.set_wins_a, res.set_wins_b), (1, 1));
}

#[test]
fn no_sets_uses_override_or_nothing() {
    let mut m = singles(vec![SetEntry::default(), SetEntry::default()]);
    assert_eq!(resolve_match(&m).winner_side, None);
    m.match_winner_side = Some(Side::A);
    assert_eq!(resolve_match(&m).winner_side, Some(Side::A));
}

#[test]
fn included_set_without_winner_counts_for_nobody() {
    // 0-0 is a present score: the set is included but undecided.
    let zero = SetEntry::scored(0, 0);
    assert!(is_set_included(&zero));
    let m = singles(vec![zero, set(11, 3, Side::A)]);
    let res = resolve_match(&m);
    assert_eq!(res.winner_side, Some(Side::A));
    assert_eq!((res.set_wins_a, res.set_wins_b), (1, 0));
}

#[test]
fn blank_sets_are_not_included() {
    assert!(!is_set_included(&SetEntry::default()));
    let empty_note = SetEntry {
        note: Some(String::new()),
        ..SetEntry::default()
    };
    assert!(!is_set_included(&empty_note));
    let noted = SetEntry {
        note: Some("rain delay".into()),
        ..SetEntry::default()
    };
    assert!(is_set_included(&noted));
}

#[test]
fn winner_derived_from_scores() {
    assert_eq!(derive_winner_from_scores(Some(11), Some(9)), Some(Side::A));
    assert_eq!(derive_winner_from_scores(Some(4), Some(11)), Some(Side::B));
    assert_eq!(derive_winner_from_scores(Some(10), Some(10)), None);
    assert_eq!(derive_winner_from_scores(Some(11), None), None);
}
