//! Single-player views: profile summary, streaks, trend, head-to-head and insights.

use crate::logic::resolution::resolve_match;
use crate::logic::standings::{compute_standings, eligible_matches};
use crate::models::{
    GameMatch, H2HRecord, MatchFormat, Outcome, PartnerRecord, Player, PlayerId, PlayerInsights,
    PlayerProfileStats, PlayerStanding, ProfileSummary, Streak, Trend,
};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Size of each trend window.
const TREND_WINDOW: usize = 5;
/// Matches returned in `recent_matches`.
const RECENT_MATCHES: usize = 10;

/// Build the profile of `player` from the full standings and the player's own matches.
pub fn compute_player_profile(
    player: &Player,
    players: &[Player],
    matches: &[GameMatch],
    include_not_completed: bool,
) -> PlayerProfileStats {
    let standing = compute_standings(players, matches, include_not_completed)
        .into_iter()
        .find(|row| row.player_id == player.id)
        .unwrap_or_else(|| PlayerStanding::zero(player));

    let player_matches: Vec<&GameMatch> = eligible_matches(matches, include_not_completed)
        .into_iter()
        .filter(|m| m.involves(player.id))
        .collect();

    let names: HashMap<PlayerId, &str> = players.iter().map(|p| (p.id, p.name.as_str())).collect();

    let mut outcomes: Vec<Outcome> = Vec::new();
    let mut current_streak: Option<Streak> = None;
    let mut longest_win_streak = 0;
    let mut rolling_win_streak = 0;
    let mut h2h: Vec<H2HRecord> = Vec::new();

    for m in &player_matches {
        let Some(winner) = resolve_match(m).winner_side else {
            continue;
        };
        let Some(side) = m.sides.side_of(player.id) else {
            continue;
        };
        let won = side == winner;
        let outcome = Outcome::from_won(won);
        outcomes.push(outcome);

        current_streak = match current_streak {
            Some(s) if s.kind == outcome => Some(Streak {
                kind: outcome,
                length: s.length + 1,
            }),
            _ => Some(Streak {
                kind: outcome,
                length: 1,
            }),
        };

        if won {
            rolling_win_streak += 1;
            longest_win_streak = longest_win_streak.max(rolling_win_streak);
        } else {
            rolling_win_streak = 0;
        }

        for opp_id in m.sides.get(side.opposite()) {
            let Some(name) = names.get(opp_id) else {
                continue;
            };
            let record = match h2h.iter_mut().position(|r| r.opponent_id == *opp_id) {
                Some(i) => &mut h2h[i],
                None => {
                    h2h.push(H2HRecord {
                        opponent_id: *opp_id,
                        opponent_name: name.to_string(),
                        wins: 0,
                        losses: 0,
                    });
                    let last = h2h.len() - 1;
                    &mut h2h[last]
                }
            };
            if won {
                record.wins += 1;
            } else {
                record.losses += 1;
            }
        }
    }

    h2h.sort_by(h2h_order);

    let win_pct = win_percentage(standing.wins, standing.mp);
    let summary = ProfileSummary {
        win_pct,
        last_played_date: player_matches.last().map(|m| m.date),
        current_streak,
        longest_win_streak,
        trend: trend(&outcomes),
        standing,
    };

    let recent_matches = player_matches
        .iter()
        .rev()
        .take(RECENT_MATCHES)
        .map(|m| (*m).clone())
        .collect();

    PlayerProfileStats {
        summary,
        recent_matches,
        h2h,
    }
}

/// Wins over matches played as a percentage with one decimal; 0 when nothing was played.
pub fn win_percentage(wins: u32, mp: u32) -> f64 {
    if mp == 0 {
        return 0.0;
    }
    (f64::from(wins) / f64::from(mp) * 1000.0).round() / 10.0
}

/// Compare the last 5 outcomes with the 5 before them.
pub fn trend(outcomes: &[Outcome]) -> Trend {
    let len = outcomes.len();
    let last_start = len.saturating_sub(TREND_WINDOW);
    let prev_start = len.saturating_sub(TREND_WINDOW * 2);
    let score = |window: &[Outcome]| window.iter().map(|o| o.score()).sum::<i32>();
    let last = score(&outcomes[last_start..]);
    let prev = score(&outcomes[prev_start..last_start]);
    match last.cmp(&prev) {
        Ordering::Greater => Trend::Up,
        Ordering::Less => Trend::Down,
        Ordering::Equal => Trend::Flat,
    }
}

/// Head-to-head order: (wins - losses) desc, then opponent name asc.
fn h2h_order(a: &H2HRecord, b: &H2HRecord) -> Ordering {
    b.diff()
        .cmp(&a.diff())
        .then_with(|| a.opponent_name.cmp(&b.opponent_name))
}

/// Format and side splits, best doubles partner and hardest opponent.
///
/// Always computed over completed matches with a resolved winner.
pub fn compute_player_insights(
    player: &Player,
    players: &[Player],
    matches: &[GameMatch],
) -> PlayerInsights {
    let names: HashMap<PlayerId, &str> = players.iter().map(|p| (p.id, p.name.as_str())).collect();
    let mut insights = PlayerInsights::default();
    let mut partners: Vec<PartnerRecord> = Vec::new();

    for m in matches.iter().filter(|m| m.is_completed()) {
        let Some(side) = m.sides.side_of(player.id) else {
            continue;
        };
        let Some(winner) = resolve_match(m).winner_side else {
            continue;
        };
        let won = side == winner;
        insights.format_split_mut(m.format).record(won);
        insights.side_split_mut(side).record(won);

        if m.format != MatchFormat::Doubles {
            continue;
        }
        for partner_id in m.sides.get(side).iter().filter(|id| **id != player.id) {
            let Some(name) = names.get(partner_id) else {
                continue;
            };
            match partners.iter_mut().find(|p| p.partner_id == *partner_id) {
                Some(p) => p.record.record(won),
                None => {
                    let mut partner = PartnerRecord {
                        partner_id: *partner_id,
                        partner_name: name.to_string(),
                        record: Default::default(),
                    };
                    partner.record.record(won);
                    partners.push(partner);
                }
            }
        }
    }

    insights.best_partner = partners.into_iter().min_by(best_partner_order);
    insights.hardest_opponent = compute_player_profile(player, players, matches, false)
        .h2h
        .into_iter()
        .filter(|r| r.wins + r.losses > 0)
        .min_by(|a, b| {
            a.diff()
                .cmp(&b.diff())
                .then_with(|| a.opponent_name.cmp(&b.opponent_name))
        });
    insights
}

/// Best partner first: win ratio desc, wins desc, losses asc, name asc.
fn best_partner_order(a: &PartnerRecord, b: &PartnerRecord) -> Ordering {
    // a.wins / a.mp vs b.wins / b.mp without floats; mp is never 0 for a recorded partner.
    let ratio_a = u64::from(a.record.wins) * u64::from(b.record.mp);
    let ratio_b = u64::from(b.record.wins) * u64::from(a.record.mp);
    ratio_b
        .cmp(&ratio_a)
        .then_with(|| b.record.wins.cmp(&a.record.wins))
        .then_with(|| a.record.losses.cmp(&b.record.losses))
        .then_with(|| a.partner_name.cmp(&b.partner_name))
}
