//! Match resolution: who won a match, from its per-set outcomes.

use crate::models::{GameMatch, SetEntry, Side};
use serde::{Deserialize, Serialize};

/// Winning side (if any) and set wins per side.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResolution {
    pub winner_side: Option<Side>,
    pub set_wins_a: u32,
    pub set_wins_b: u32,
}

impl MatchResolution {
    pub fn set_wins(&self, side: Side) -> u32 {
        match side {
            Side::A => self.set_wins_a,
            Side::B => self.set_wins_b,
        }
    }
}

/// A set takes part in resolution unless it is entirely blank.
/// A score of 0 counts as present.
pub fn is_set_included(set: &SetEntry) -> bool {
    set.winner_side.is_some()
        || set.score_a.is_some()
        || set.score_b.is_some()
        || set.note.as_deref().is_some_and(|n| !n.is_empty())
}

/// Resolve a match.
///
/// 1. Count set wins per side over included sets with a winner.
/// 2. More set wins wins the match.
/// 3. On a tie (including 0-0) fall back to `match_winner_side`, which may be `None`.
pub fn resolve_match(game_match: &GameMatch) -> MatchResolution {
    let mut set_wins_a = 0;
    let mut set_wins_b = 0;
    for set in game_match.sets.iter().filter(|s| is_set_included(s)) {
        match set.winner_side {
            Some(Side::A) => set_wins_a += 1,
            Some(Side::B) => set_wins_b += 1,
            None => {}
        }
    }

    let winner_side = if set_wins_a > set_wins_b {
        Some(Side::A)
    } else if set_wins_b > set_wins_a {
        Some(Side::B)
    } else {
        game_match.match_winner_side
    };

    MatchResolution {
        winner_side,
        set_wins_a,
        set_wins_b,
    }
}

/// Set winner implied by the scores: the higher score wins; missing or equal scores imply nothing.
pub fn derive_winner_from_scores(score_a: Option<u32>, score_b: Option<u32>) -> Option<Side> {
    match (score_a, score_b) {
        (Some(a), Some(b)) if a > b => Some(Side::A),
        (Some(a), Some(b)) if b > a => Some(Side::B),
        _ => None,
    }
}

/// Overwrite each set's winner with the one implied by its scores, where the scores decide it.
pub fn apply_score_winners(sets: &mut [SetEntry]) {
    for set in sets {
        if let Some(side) = derive_winner_from_scores(set.score_a, set.score_b) {
            set.winner_side = Some(side);
        }
    }
}
