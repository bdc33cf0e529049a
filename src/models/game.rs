//! Match record: sides, sets, status and format for singles / doubles.

use crate::models::player::PlayerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// One of the two competing parties.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::A => write!(f, "A"),
            Side::B => write!(f, "B"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchStatus {
    #[default]
    Completed,
    #[serde(rename = "Not completed")]
    NotCompleted,
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchFormat {
    #[default]
    Singles,
    Doubles,
}

impl MatchFormat {
    /// Players per side: 1 for singles, 2 for doubles.
    pub fn slots(self) -> usize {
        match self {
            MatchFormat::Singles => 1,
            MatchFormat::Doubles => 2,
        }
    }
}

/// Participants per side, in slot order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sides {
    #[serde(rename = "A", default)]
    pub a: Vec<PlayerId>,
    #[serde(rename = "B", default)]
    pub b: Vec<PlayerId>,
}

impl Sides {
    pub fn new(a: Vec<PlayerId>, b: Vec<PlayerId>) -> Self {
        Self { a, b }
    }

    pub fn get(&self, side: Side) -> &[PlayerId] {
        match side {
            Side::A => &self.a,
            Side::B => &self.b,
        }
    }

    /// Side the player is on; side A is reported when listed on both.
    pub fn side_of(&self, player_id: PlayerId) -> Option<Side> {
        if self.a.contains(&player_id) {
            Some(Side::A)
        } else if self.b.contains(&player_id) {
            Some(Side::B)
        } else {
            None
        }
    }

    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.side_of(player_id).is_some()
    }

    /// All participant ids, side A first.
    pub fn all(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.a.iter().chain(self.b.iter()).copied()
    }
}

/// One game segment of a match. Every field is optional; a fully blank set is ignored.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_a: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_b: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl SetEntry {
    /// A set with both scores and no explicit winner.
    pub fn scored(score_a: u32, score_b: u32) -> Self {
        Self {
            score_a: Some(score_a),
            score_b: Some(score_b),
            ..Self::default()
        }
    }

    /// A set that only records who won it.
    pub fn won_by(side: Side) -> Self {
        Self {
            winner_side: Some(side),
            ..Self::default()
        }
    }
}

/// A recorded match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMatch {
    pub id: MatchId,
    /// Calendar date, serialized as `yyyy-mm-dd`.
    pub date: NaiveDate,
    pub status: MatchStatus,
    pub format: MatchFormat,
    pub sides: Sides,
    pub set_count: usize,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
    /// Explicit winner, only consulted when set wins are tied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_winner_side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GameMatch {
    /// New completed match; `set_count` follows the number of sets given.
    pub fn new(
        date: NaiveDate,
        format: MatchFormat,
        side_a: Vec<PlayerId>,
        side_b: Vec<PlayerId>,
        sets: Vec<SetEntry>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            date,
            status: MatchStatus::Completed,
            format,
            sides: Sides::new(side_a, side_b),
            set_count: sets.len(),
            sets,
            match_winner_side: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn singles(date: NaiveDate, a: PlayerId, b: PlayerId, sets: Vec<SetEntry>) -> Self {
        Self::new(date, MatchFormat::Singles, vec![a], vec![b], sets)
    }

    pub fn doubles(
        date: NaiveDate,
        side_a: [PlayerId; 2],
        side_b: [PlayerId; 2],
        sets: Vec<SetEntry>,
    ) -> Self {
        Self::new(date, MatchFormat::Doubles, side_a.to_vec(), side_b.to_vec(), sets)
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    /// Key for chronological ordering: date, then creation time.
    pub fn chronological_key(&self) -> (NaiveDate, DateTime<Utc>) {
        (self.date, self.created_at)
    }

    pub fn involves(&self, player_id: PlayerId) -> bool {
        self.sides.contains(player_id)
    }
}
