//! Weekly snapshots: one mini-league per calendar week (Monday start).

use crate::logic::standings::compute_standings;
use crate::models::{GameMatch, Player, WeeklyRow, WeeklySnapshot};
use chrono::{Datelike, Duration, NaiveDate};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Monday on or before `date`.
pub fn week_key(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// "Oct 12 – Oct 18" style label for the week starting at `week_start`.
pub fn week_label(week_start: NaiveDate) -> String {
    let end = week_start + Duration::days(6);
    format!(
        "{} – {}",
        week_start.format("%b %-d"),
        end.format("%b %-d")
    )
}

/// Weekly order: wins desc, set diff desc, name asc.
fn weekly_order(a: &WeeklyRow, b: &WeeklyRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.set_diff().cmp(&a.set_diff()))
        .then_with(|| a.player_name.cmp(&b.player_name))
}

/// Group completed matches by week and rank each week independently, most recent week first.
///
/// Every known player gets a row in every week, zeroed if they did not play that week.
pub fn compute_weekly_snapshots(players: &[Player], matches: &[GameMatch]) -> Vec<WeeklySnapshot> {
    let mut by_week: BTreeMap<NaiveDate, Vec<GameMatch>> = BTreeMap::new();
    for m in matches.iter().filter(|m| m.is_completed()) {
        by_week.entry(week_key(m.date)).or_default().push(m.clone());
    }

    by_week
        .into_iter()
        .rev()
        .map(|(key, week_matches)| {
            let mut rows: Vec<WeeklyRow> = compute_standings(players, &week_matches, false)
                .into_iter()
                .map(WeeklyRow::from)
                .collect();
            rows.sort_by(weekly_order);

            let all_zero = rows.iter().all(|r| r.wins == 0 && r.losses == 0);
            let (top_player_id, top_player_name) = match rows.first() {
                Some(top) if !all_zero => (Some(top.player_id), Some(top.player_name.clone())),
                _ => (None, None),
            };

            WeeklySnapshot {
                week_key: key,
                week_label: week_label(key),
                top_player_id,
                top_player_name,
                rows,
            }
        })
        .collect()
}
