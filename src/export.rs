//! CSV rendering of standings and weekly tables.

use crate::models::{PlayerStanding, WeeklySnapshot};

/// Standings as CSV with a 1-based rank column. Form is written as e.g. `WWLW`.
pub fn standings_csv(rows: &[PlayerStanding]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank", "player", "mp", "wins", "losses", "sets_won", "sets_lost", "set_diff", "form",
    ])?;
    for (i, row) in rows.iter().enumerate() {
        let form: String = row.form.iter().map(|o| o.to_string()).collect();
        writer.write_record([
            (i + 1).to_string(),
            row.player_name.clone(),
            row.mp.to_string(),
            row.wins.to_string(),
            row.losses.to_string(),
            row.sets_won.to_string(),
            row.sets_lost.to_string(),
            row.set_diff.to_string(),
            form,
        ])?;
    }
    finish(writer)
}

/// All weekly tables in one CSV, one line per (week, player).
pub fn weekly_csv(weeks: &[WeeklySnapshot]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "week_start", "week", "rank", "player", "wins", "losses", "sets_won", "sets_lost",
    ])?;
    for week in weeks {
        for (i, row) in week.rows.iter().enumerate() {
            writer.write_record([
                week.week_key.to_string(),
                week.week_label.clone(),
                (i + 1).to_string(),
                row.player_name.clone(),
                row.wins.to_string(),
                row.losses.to_string(),
                row.sets_won.to_string(),
                row.sets_lost.to_string(),
            ])?;
        }
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, csv::Error> {
    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
