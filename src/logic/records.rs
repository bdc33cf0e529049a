//! Record identity rules: player merge, deletion eligibility, match validation, import and filters.

use crate::logic::resolution::{is_set_included, resolve_match};
use crate::models::{
    GameMatch, JournalError, MatchStatus, Player, PlayerId, Side, StoredData,
    ValidationError, SCHEMA_VERSION,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer};
use std::collections::{HashMap, HashSet};

/// Rewrite participant references from `from` to `to` across the whole match list.
///
/// Every match is returned with `updated_at` set to `now`, whether or not it referenced `from`.
/// A match may end up with `to` twice on one side; that is kept as is. Equal ids are a no-op.
pub fn merge_player_matches(
    matches: &[GameMatch],
    from: PlayerId,
    to: PlayerId,
    now: DateTime<Utc>,
) -> Vec<GameMatch> {
    if from == to {
        return Vec::new();
    }
    matches
        .iter()
        .map(|m| {
            let mut rewritten = m.clone();
            for id in rewritten.sides.a.iter_mut().chain(rewritten.sides.b.iter_mut()) {
                if *id == from {
                    *id = to;
                }
            }
            rewritten.updated_at = now;
            rewritten
        })
        .collect()
}

/// Number of matches that list the player on either side.
pub fn count_references(matches: &[GameMatch], player_id: PlayerId) -> usize {
    matches.iter().filter(|m| m.involves(player_id)).count()
}

/// A player can be deleted only when no match references them.
pub fn ensure_player_deletable(
    matches: &[GameMatch],
    player_id: PlayerId,
) -> Result<(), JournalError> {
    match count_references(matches, player_id) {
        0 => Ok(()),
        match_count => Err(JournalError::PlayerReferenced {
            player_id,
            match_count,
        }),
    }
}

/// Form-level validation of a match before it is saved. The engine never requires it.
pub fn validate_match(game_match: &GameMatch, players: &[Player]) -> Result<(), ValidationError> {
    let slots = game_match.format.slots();
    for side in [Side::A, Side::B] {
        let found = game_match.sides.get(side).len();
        if found < slots {
            return Err(ValidationError::MissingPlayers);
        }
        if found > slots {
            return Err(ValidationError::WrongSlotCount {
                side,
                expected: slots,
                found,
            });
        }
    }

    let known: HashSet<PlayerId> = players.iter().map(|p| p.id).collect();
    let mut seen_a = HashSet::new();
    for id in &game_match.sides.a {
        if !seen_a.insert(*id) {
            return Err(ValidationError::DuplicatePlayer(*id));
        }
    }
    let mut seen_b = HashSet::new();
    for id in &game_match.sides.b {
        if seen_a.contains(id) {
            return Err(ValidationError::PlayerOnBothSides(*id));
        }
        if !seen_b.insert(*id) {
            return Err(ValidationError::DuplicatePlayer(*id));
        }
    }
    if let Some(unknown) = game_match.sides.all().find(|id| !known.contains(id)) {
        return Err(ValidationError::UnknownPlayer(unknown));
    }

    if game_match.sets.len() != game_match.set_count {
        return Err(ValidationError::SetCountMismatch {
            declared: game_match.set_count,
            found: game_match.sets.len(),
        });
    }
    if let Some(index) = game_match
        .sets
        .iter()
        .position(|s| is_set_included(s) && s.winner_side.is_none())
    {
        return Err(ValidationError::SetWithoutWinner { index });
    }

    let resolution = resolve_match(game_match);
    if game_match.is_completed()
        && resolution.set_wins_a == resolution.set_wins_b
        && game_match.match_winner_side.is_none()
    {
        return Err(ValidationError::AmbiguousCompletedMatch);
    }
    Ok(())
}

/// Reject an import envelope written by a different schema version.
pub fn check_schema_version(data: &StoredData) -> Result<(), JournalError> {
    if data.schema_version != SCHEMA_VERSION {
        return Err(JournalError::SchemaVersion {
            expected: SCHEMA_VERSION,
            found: data.schema_version,
        });
    }
    Ok(())
}

/// Query filters for the match list.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MatchFilter {
    /// `None` (or `All` on the wire) means all statuses.
    #[serde(default, deserialize_with = "status_or_all")]
    pub status: Option<MatchStatus>,
    #[serde(default)]
    pub player_id: Option<PlayerId>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive match on participant names or the ISO date.
    #[serde(default)]
    pub search: Option<String>,
}

fn status_or_all<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MatchStatus>, D::Error> {
    let raw = String::deserialize(d)?;
    if raw == "All" {
        return Ok(None);
    }
    MatchStatus::deserialize(IntoDeserializer::<D::Error>::into_deserializer(raw)).map(Some)
}

/// Apply `filter` and return matches most recent first by (date, created_at).
pub fn filter_matches<'a>(
    players: &[Player],
    matches: &'a [GameMatch],
    filter: &MatchFilter,
) -> Vec<&'a GameMatch> {
    let names: HashMap<PlayerId, String> = players
        .iter()
        .map(|p| (p.id, p.name.to_lowercase()))
        .collect();
    let search = filter
        .search
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::to_lowercase);

    let mut filtered: Vec<&GameMatch> = matches
        .iter()
        .filter(|m| filter.status.map_or(true, |s| m.status == s))
        .filter(|m| filter.player_id.map_or(true, |id| m.involves(id)))
        .filter(|m| filter.date_from.map_or(true, |from| m.date >= from))
        .filter(|m| filter.date_to.map_or(true, |to| m.date <= to))
        .filter(|m| {
            let Some(needle) = search.as_deref() else {
                return true;
            };
            let haystack = m
                .sides
                .all()
                .map(|id| names.get(&id).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join(" ");
            haystack.contains(needle) || m.date.to_string().contains(needle)
        })
        .collect();
    filtered.sort_by(|a, b| b.chronological_key().cmp(&a.chronological_key()));
    filtered
}

/// Names of the winning side joined with " / ", or `None` when the match has no winner.
pub fn match_winner_names(game_match: &GameMatch, players: &[Player]) -> Option<String> {
    let winner = resolve_match(game_match).winner_side?;
    let names: Vec<&str> = game_match
        .sides
        .get(winner)
        .iter()
        .filter_map(|id| players.iter().find(|p| p.id == *id))
        .map(|p| p.name.as_str())
        .collect();
    Some(names.join(" / "))
}
