//! Integration tests for weekly snapshots.

use chrono::NaiveDate;
use pickleball_journal::logic::{week_key, week_label};
use pickleball_journal::{
    compute_weekly_snapshots, GameMatch, MatchStatus, Player, PlayerId, SetEntry, Side,
};

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn players(names: &[&str]) -> Vec<Player> {
    names.iter().map(|n| Player::new(*n)).collect()
}

fn singles(on: NaiveDate, a: PlayerId, b: PlayerId, sets: Vec<SetEntry>) -> GameMatch {
    GameMatch::singles(on, a, b, sets)
}

fn won(side: Side, n: usize) -> Vec<SetEntry> {
    vec![SetEntry::won_by(side); n]
}

#[test]
fn week_key_is_monday_on_or_before() {
    assert_eq!(week_key(date(5, 6)), date(5, 6)); // Monday
    assert_eq!(week_key(date(5, 9)), date(5, 6));
    assert_eq!(week_key(date(5, 12)), date(5, 6)); // Sunday
    assert_eq!(week_key(date(5, 13)), date(5, 13));
    assert_eq!(week_key(date(3, 3)), date(2, 26)); // across a month boundary
}

#[test]
fn week_label_spans_monday_to_sunday() {
    assert_eq!(week_label(date(5, 6)), "May 6 – May 12");
    assert_eq!(week_label(date(4, 29)), "Apr 29 – May 5");
}

#[test]
fn weeks_most_recent_first_with_all_players() {
    let ps = players(&["Ari", "Blake", "Casey"]);
    let matches = vec![
        singles(date(5, 7), ps[0].id, ps[1].id, won(Side::A, 2)),
        singles(date(5, 14), ps[1].id, ps[2].id, won(Side::A, 2)),
        singles(date(5, 12), ps[2].id, ps[0].id, won(Side::A, 2)),
    ];
    let weeks = compute_weekly_snapshots(&ps, &matches);
    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].week_key, date(5, 13));
    assert_eq!(weeks[1].week_key, date(5, 6));
    for w in &weeks {
        assert_eq!(w.rows.len(), 3);
    }

    assert_eq!(weeks[0].top_player_name.as_deref(), Some("Blake"));
    let first_week = &weeks[1];
    // Ari and Casey both 1 win, +0 and +2 set diff
    assert_eq!(first_week.top_player_name.as_deref(), Some("Casey"));
    assert_eq!(first_week.top_player_id, Some(ps[2].id));
}

#[test]
fn weekly_ranking_puts_wins_before_set_diff() {
    let ps = players(&["Ari", "Blake", "Casey"]);
    let sweep = won(Side::A, 3);
    let narrow = vec![
        SetEntry::won_by(Side::A),
        SetEntry::won_by(Side::B),
        SetEntry::won_by(Side::A),
    ];
    let matches = vec![
        // Blake: one sweep (+3, 1 win). Ari: two narrow wins (+2, 2 wins) over Casey.
        singles(date(5, 6), ps[1].id, ps[2].id, sweep),
        singles(date(5, 7), ps[0].id, ps[2].id, narrow.clone()),
        singles(date(5, 8), ps[0].id, ps[2].id, narrow),
    ];
    let weeks = compute_weekly_snapshots(&ps, &matches);
    let names: Vec<&str> = weeks[0].rows.iter().map(|r| r.player_name.as_str()).collect();
    assert_eq!(names, vec!["Ari", "Blake", "Casey"]);
}

#[test]
fn not_completed_matches_ignored() {
    let ps = players(&["Ari", "Blake"]);
    let mut m = singles(date(5, 7), ps[0].id, ps[1].id, won(Side::A, 2));
    m.status = MatchStatus::NotCompleted;
    assert!(compute_weekly_snapshots(&ps, &[m]).is_empty());
}

#[test]
fn week_without_decided_match_has_no_top_player() {
    let ps = players(&["Ari", "Blake"]);
    let tied = vec![SetEntry::won_by(Side::A), SetEntry::won_by(Side::B)];
    let weeks = compute_weekly_snapshots(&ps, &[singles(date(5, 7), ps[0].id, ps[1].id, tied)]);
    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].top_player_id, None);
    assert_eq!(weeks[0].rows.len(), 2);
}
