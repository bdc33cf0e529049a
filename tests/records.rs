//! Integration tests for record rules: merge, deletion eligibility, validation, filters.

use chrono::{NaiveDate, TimeZone, Utc};
use pickleball_journal::logic::{check_schema_version, count_references};
use pickleball_journal::{
    compute_standings, ensure_player_deletable, filter_matches, match_winner_names,
    merge_player_matches, validate_match, GameMatch, JournalError, MatchFilter, MatchFormat,
    MatchStatus, Player, PlayerStanding, SetEntry, Side, Snapshot, StoredData, ValidationError,
    SCHEMA_VERSION,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
}

fn players(names: &[&str]) -> Vec<Player> {
    names.iter().map(|n| Player::new(*n)).collect()
}

fn won(side: Side, n: usize) -> Vec<SetEntry> {
    vec![SetEntry::won_by(side); n]
}

fn row<'a>(rows: &'a [PlayerStanding], p: &Player) -> &'a PlayerStanding {
    rows.iter().find(|r| r.player_id == p.id).unwrap()
}

#[test]
fn merge_rewrites_references_and_touches_every_match() {
    let ps = players(&["Ari", "Ari B.", "Casey", "Dev"]);
    let (ari, dup, casey, dev) = (ps[0].id, ps[1].id, ps[2].id, ps[3].id);
    let matches = vec![
        GameMatch::singles(date(1), dup, casey, won(Side::A, 2)),
        GameMatch::singles(date(2), casey, dev, won(Side::A, 2)),
        GameMatch::doubles(date(3), [casey, dup], [dev, ari], won(Side::B, 2)),
    ];
    let now = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let rewritten = merge_player_matches(&matches, dup, ari, now);

    assert_eq!(rewritten.len(), 3);
    assert_eq!(rewritten[0].sides.a, vec![ari]);
    assert_eq!(rewritten[1].sides, matches[1].sides);
    assert_eq!(rewritten[2].sides.a, vec![casey, ari]);
    assert_eq!(rewritten[2].sides.b, vec![dev, ari]);
    assert!(rewritten.iter().all(|m| m.updated_at == now));
    assert!(rewritten.iter().all(|m| !m.involves(dup)));
}

#[test]
fn merge_same_id_is_noop() {
    let ps = players(&["Ari", "Blake"]);
    let matches = vec![GameMatch::singles(date(1), ps[0].id, ps[1].id, won(Side::A, 2))];
    assert!(merge_player_matches(&matches, ps[0].id, ps[0].id, Utc::now()).is_empty());
}

#[test]
fn merge_can_duplicate_a_teammate() {
    let ps = players(&["Ari", "Ari B.", "Casey", "Dev"]);
    let (ari, dup, casey, dev) = (ps[0].id, ps[1].id, ps[2].id, ps[3].id);
    let matches = vec![GameMatch::doubles(date(1), [ari, dup], [casey, dev], won(Side::A, 2))];
    let rewritten = merge_player_matches(&matches, dup, ari, Utc::now());
    assert_eq!(rewritten[0].sides.a, vec![ari, ari]);

    // Not rejected downstream: both slots count.
    let roster = vec![ps[0].clone(), ps[2].clone(), ps[3].clone()];
    let rows = compute_standings(&roster, &rewritten, false);
    assert_eq!(row(&rows, &ps[0]).wins, 2);
}

#[test]
fn merged_totals_are_the_sum_of_both_players() {
    let ps = players(&["Ari", "Ari B.", "Casey", "Dev"]);
    let (ari, dup, casey, dev) = (ps[0].id, ps[1].id, ps[2].id, ps[3].id);
    let matches = vec![
        GameMatch::singles(date(1), ari, casey, won(Side::A, 2)),
        GameMatch::singles(date(2), dup, dev, won(Side::B, 2)),
        GameMatch::singles(date(3), casey, dup, vec![
            SetEntry::won_by(Side::B),
            SetEntry::won_by(Side::A),
            SetEntry::won_by(Side::B),
        ]),
    ];
    let before = compute_standings(&ps, &matches, false);
    let (a, d) = (row(&before, &ps[0]), row(&before, &ps[1]));

    let rewritten = merge_player_matches(&matches, dup, ari, Utc::now());
    let mut snapshot = Snapshot::new(ps.clone(), matches.clone());
    for m in rewritten {
        snapshot.upsert_match(m);
    }
    snapshot.players.retain(|p| p.id != dup);
    let after = compute_standings(&snapshot.players, &snapshot.matches, false);
    let merged = row(&after, &ps[0]);

    assert_eq!(merged.mp, a.mp + d.mp);
    assert_eq!(merged.wins, a.wins + d.wins);
    assert_eq!(merged.losses, a.losses + d.losses);
    assert_eq!(merged.sets_won, a.sets_won + d.sets_won);
    assert_eq!(merged.sets_lost, a.sets_lost + d.sets_lost);
}

#[test]
fn referenced_player_cannot_be_deleted() {
    let ps = players(&["Ari", "Blake", "Casey"]);
    let matches = vec![
        GameMatch::singles(date(1), ps[0].id, ps[1].id, won(Side::A, 2)),
        GameMatch::singles(date(2), ps[1].id, ps[0].id, won(Side::A, 2)),
    ];
    assert_eq!(count_references(&matches, ps[1].id), 2);
    match ensure_player_deletable(&matches, ps[1].id) {
        Err(JournalError::PlayerReferenced { player_id, match_count }) => {
            assert_eq!(player_id, ps[1].id);
            assert_eq!(match_count, 2);
        }
        other => panic!("expected PlayerReferenced, got {:?}", other),
    }
    assert!(ensure_player_deletable(&matches, ps[2].id).is_ok());
}

#[test]
fn validation_rejects_form_errors() {
    let ps = players(&["Ari", "Blake", "Casey", "Dev"]);
    let (ari, blake, casey, dev) = (ps[0].id, ps[1].id, ps[2].id, ps[3].id);

    let ok = GameMatch::singles(date(1), ari, blake, won(Side::A, 2));
    assert_eq!(validate_match(&ok, &ps), Ok(()));

    let mut missing = ok.clone();
    missing.sides.b.clear();
    assert_eq!(validate_match(&missing, &ps), Err(ValidationError::MissingPlayers));

    let mut too_many = ok.clone();
    too_many.sides.a.push(casey);
    assert!(matches!(
        validate_match(&too_many, &ps),
        Err(ValidationError::WrongSlotCount { side: Side::A, expected: 1, found: 2 })
    ));

    let both = GameMatch::doubles(date(1), [ari, blake], [ari, dev], won(Side::A, 2));
    assert_eq!(validate_match(&both, &ps), Err(ValidationError::PlayerOnBothSides(ari)));

    let twice = GameMatch::doubles(date(1), [ari, ari], [casey, dev], won(Side::A, 2));
    assert_eq!(validate_match(&twice, &ps), Err(ValidationError::DuplicatePlayer(ari)));

    let ghost = Player::new("Ghost");
    let unknown = GameMatch::singles(date(1), ari, ghost.id, won(Side::A, 2));
    assert_eq!(validate_match(&unknown, &ps), Err(ValidationError::UnknownPlayer(ghost.id)));

    let mut count = ok.clone();
    count.set_count = 3;
    assert!(matches!(
        validate_match(&count, &ps),
        Err(ValidationError::SetCountMismatch { declared: 3, found: 2 })
    ));

    let undecided = GameMatch::singles(date(1), ari, blake, vec![SetEntry::won_by(Side::A), SetEntry::scored(10, 10)]);
    assert_eq!(validate_match(&undecided, &ps), Err(ValidationError::SetWithoutWinner { index: 1 }));

    let mut tied = GameMatch::singles(date(1), ari, blake, vec![SetEntry::won_by(Side::A), SetEntry::won_by(Side::B)]);
    assert_eq!(validate_match(&tied, &ps), Err(ValidationError::AmbiguousCompletedMatch));
    tied.match_winner_side = Some(Side::B);
    assert_eq!(validate_match(&tied, &ps), Ok(()));
    tied.match_winner_side = None;
    tied.status = MatchStatus::NotCompleted;
    assert_eq!(validate_match(&tied, &ps), Ok(()));
}

#[test]
fn doubles_need_two_per_side() {
    let ps = players(&["Ari", "Blake", "Casey"]);
    let mut m = GameMatch::singles(date(1), ps[0].id, ps[1].id, won(Side::A, 2));
    m.format = MatchFormat::Doubles;
    m.sides.a.push(ps[2].id);
    assert_eq!(validate_match(&m, &ps), Err(ValidationError::MissingPlayers));
}

#[test]
fn schema_version_must_match() {
    let ok = StoredData { schema_version: SCHEMA_VERSION, players: vec![], matches: vec![] };
    assert!(check_schema_version(&ok).is_ok());
    let future = StoredData { schema_version: SCHEMA_VERSION + 1, ..ok };
    assert!(matches!(
        check_schema_version(&future),
        Err(JournalError::SchemaVersion { found, .. }) if found == SCHEMA_VERSION + 1
    ));
}

#[test]
fn filter_matches_by_status_player_dates_and_search() {
    let ps = players(&["Ari", "Blake", "Casey"]);
    let (ari, blake, casey) = (ps[0].id, ps[1].id, ps[2].id);
    let mut pending = GameMatch::singles(date(3), blake, casey, vec![]);
    pending.status = MatchStatus::NotCompleted;
    let matches = vec![
        GameMatch::singles(date(1), ari, blake, won(Side::A, 2)),
        GameMatch::singles(date(5), ari, casey, won(Side::B, 2)),
        pending,
    ];

    let all = filter_matches(&ps, &matches, &MatchFilter::default());
    let dates: Vec<NaiveDate> = all.iter().map(|m| m.date).collect();
    assert_eq!(dates, vec![date(5), date(3), date(1)]);

    let completed = MatchFilter { status: Some(MatchStatus::Completed), ..Default::default() };
    assert_eq!(filter_matches(&ps, &matches, &completed).len(), 2);

    let by_player = MatchFilter { player_id: Some(casey), ..Default::default() };
    assert_eq!(filter_matches(&ps, &matches, &by_player).len(), 2);

    let range = MatchFilter { date_from: Some(date(2)), date_to: Some(date(3)), ..Default::default() };
    let found = filter_matches(&ps, &matches, &range);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].date, date(3));

    let search = MatchFilter { search: Some("blAKE".into()), ..Default::default() };
    assert_eq!(filter_matches(&ps, &matches, &search).len(), 2);

    // only a blank search is ignored; other whitespace is part of the needle
    let blank = MatchFilter { search: Some("   ".into()), ..Default::default() };
    assert_eq!(filter_matches(&ps, &matches, &blank).len(), 3);
    let pair = MatchFilter { search: Some("ari blake".into()), ..Default::default() };
    assert_eq!(filter_matches(&ps, &matches, &pair).len(), 1);
    let padded = MatchFilter { search: Some(" blake ".into()), ..Default::default() };
    assert!(filter_matches(&ps, &matches, &padded).is_empty());

    let by_date = MatchFilter { search: Some("2024-06-05".into()), ..Default::default() };
    assert_eq!(filter_matches(&ps, &matches, &by_date).len(), 1);
}

#[test]
fn match_filter_reads_all_as_every_status() {
    let all: MatchFilter = serde_json::from_str(r#"{"status": "All"}"#).unwrap();
    assert_eq!(all.status, None);
    let pending: MatchFilter = serde_json::from_str(r#"{"status": "Not completed"}"#).unwrap();
    assert_eq!(pending.status, Some(MatchStatus::NotCompleted));
    let none: MatchFilter = serde_json::from_str("{}").unwrap();
    assert_eq!(none.status, None);
    assert!(serde_json::from_str::<MatchFilter>(r#"{"status": "Pending"}"#).is_err());
}

#[test]
fn winner_names_join_the_winning_side() {
    let ps = players(&["Ari", "Blake", "Casey", "Dev"]);
    let m = GameMatch::doubles(date(1), [ps[0].id, ps[1].id], [ps[2].id, ps[3].id], won(Side::B, 2));
    assert_eq!(match_winner_names(&m, &ps).as_deref(), Some("Casey / Dev"));

    let tied = GameMatch::singles(date(1), ps[0].id, ps[1].id, vec![]);
    assert_eq!(match_winner_names(&tied, &ps), None);
}
