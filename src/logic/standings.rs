//! Standings: fold matches into per-player records and rank them.

use crate::logic::resolution::resolve_match;
use crate::models::{GameMatch, Outcome, Player, PlayerId, PlayerStanding, Side};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Number of results kept in a standing's form.
pub const FORM_LENGTH: usize = 5;

/// Matches that count for stats, oldest first by (date, created_at).
///
/// Only completed matches unless `include_not_completed`. Input order does not matter.
pub fn eligible_matches(matches: &[GameMatch], include_not_completed: bool) -> Vec<&GameMatch> {
    let mut eligible: Vec<&GameMatch> = matches
        .iter()
        .filter(|m| include_not_completed || m.is_completed())
        .collect();
    eligible.sort_by_key(|m| m.chronological_key());
    eligible
}

/// Compute standings for every known player, ranked.
///
/// Matches without a resolved winner are skipped entirely. Participants that are not in
/// `players` are ignored; the rest of the match still counts.
/// Rank order: set diff desc, wins desc, matches played desc, name asc.
pub fn compute_standings(
    players: &[Player],
    matches: &[GameMatch],
    include_not_completed: bool,
) -> Vec<PlayerStanding> {
    let mut rows: Vec<PlayerStanding> = players.iter().map(PlayerStanding::zero).collect();
    let mut index: HashMap<PlayerId, usize> = HashMap::with_capacity(players.len());
    for (i, p) in players.iter().enumerate() {
        index.entry(p.id).or_insert(i);
    }

    for m in eligible_matches(matches, include_not_completed) {
        let resolution = resolve_match(m);
        let Some(winner) = resolution.winner_side else {
            continue;
        };
        let loser = winner.opposite();
        let winning_sets = resolution.set_wins(winner);
        let losing_sets = resolution.set_wins(loser);

        apply_side(&mut rows, &index, m, winner, Outcome::W, winning_sets, losing_sets);
        apply_side(&mut rows, &index, m, loser, Outcome::L, losing_sets, winning_sets);
    }

    for row in &mut rows {
        row.set_diff = i64::from(row.sets_won) - i64::from(row.sets_lost);
    }
    rows.sort_by(standings_order);
    rows
}

/// Apply one match result to every known player of `side`.
fn apply_side(
    rows: &mut [PlayerStanding],
    index: &HashMap<PlayerId, usize>,
    game_match: &GameMatch,
    side: Side,
    outcome: Outcome,
    sets_won: u32,
    sets_lost: u32,
) {
    for pid in game_match.sides.get(side) {
        let Some(&i) = index.get(pid) else {
            continue;
        };
        let row = &mut rows[i];
        row.mp += 1;
        match outcome {
            Outcome::W => row.wins += 1,
            Outcome::L => row.losses += 1,
        }
        row.sets_won += sets_won;
        row.sets_lost += sets_lost;
        push_form(&mut row.form, outcome);
    }
}

fn push_form(form: &mut Vec<Outcome>, outcome: Outcome) {
    form.push(outcome);
    if form.len() > FORM_LENGTH {
        let excess = form.len() - FORM_LENGTH;
        form.drain(..excess);
    }
}

/// Global ranking comparator.
pub fn standings_order(a: &PlayerStanding, b: &PlayerStanding) -> Ordering {
    b.set_diff
        .cmp(&a.set_diff)
        .then_with(|| b.wins.cmp(&a.wins))
        .then_with(|| b.mp.cmp(&a.mp))
        .then_with(|| a.player_name.cmp(&b.player_name))
}

/// Keep rows with at least `min_matches` played, preserving rank order.
pub fn filter_standings(rows: Vec<PlayerStanding>, min_matches: u32) -> Vec<PlayerStanding> {
    rows.into_iter().filter(|r| r.mp >= min_matches).collect()
}
