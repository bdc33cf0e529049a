//! Derived (never persisted) views: standings rows, head-to-head, profiles and weekly tables.

use crate::models::game::{GameMatch, MatchFormat, Side};
use crate::models::player::{Player, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result of one match from a single player's point of view.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    W,
    L,
}

impl Outcome {
    pub fn from_won(won: bool) -> Self {
        if won {
            Outcome::W
        } else {
            Outcome::L
        }
    }

    /// +1 for a win, -1 for a loss (trend scoring).
    pub fn score(self) -> i32 {
        match self {
            Outcome::W => 1,
            Outcome::L => -1,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::W => write!(f, "W"),
            Outcome::L => write!(f, "L"),
        }
    }
}

/// Cumulative record of one player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    pub player_id: PlayerId,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    pub mp: u32,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub set_diff: i64,
    /// Up to the last 5 results, oldest first.
    pub form: Vec<Outcome>,
}

impl PlayerStanding {
    /// Zeroed row for a player who has not played.
    pub fn zero(player: &Player) -> Self {
        Self {
            player_id: player.id,
            player_name: player.name.clone(),
            avatar_color: player.avatar_color.clone(),
            mp: 0,
            wins: 0,
            losses: 0,
            sets_won: 0,
            sets_lost: 0,
            set_diff: 0,
            form: Vec::new(),
        }
    }
}

/// Pairwise record between a player and one opponent.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H2HRecord {
    pub opponent_id: PlayerId,
    pub opponent_name: String,
    pub wins: u32,
    pub losses: u32,
}

impl H2HRecord {
    pub fn diff(&self) -> i64 {
        i64::from(self.wins) - i64::from(self.losses)
    }
}

/// Trailing run of identical outcomes ending at the most recent match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub kind: Outcome,
    pub length: u32,
}

impl std::fmt::Display for Streak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.kind, self.length)
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

/// Standing row enriched with single-player figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    #[serde(flatten)]
    pub standing: PlayerStanding,
    /// Win percentage with one decimal place.
    pub win_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_played_date: Option<NaiveDate>,
    /// `None` when the player has no decided matches.
    pub current_streak: Option<Streak>,
    pub longest_win_streak: u32,
    pub trend: Trend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfileStats {
    pub summary: ProfileSummary,
    /// Last 10 eligible matches, most recent first.
    pub recent_matches: Vec<GameMatch>,
    pub h2h: Vec<H2HRecord>,
}

/// Matches played / won / lost in one bucket (format, side or partner).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub mp: u32,
    pub wins: u32,
    pub losses: u32,
}

impl SplitRecord {
    pub fn record(&mut self, won: bool) {
        self.mp += 1;
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRecord {
    pub partner_id: PlayerId,
    pub partner_name: String,
    #[serde(flatten)]
    pub record: SplitRecord,
}

/// Format / side splits, best doubles partner and hardest opponent for one player.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInsights {
    pub singles: SplitRecord,
    pub doubles: SplitRecord,
    pub side_a: SplitRecord,
    pub side_b: SplitRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_partner: Option<PartnerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardest_opponent: Option<H2HRecord>,
}

impl PlayerInsights {
    pub fn format_split_mut(&mut self, format: MatchFormat) -> &mut SplitRecord {
        match format {
            MatchFormat::Singles => &mut self.singles,
            MatchFormat::Doubles => &mut self.doubles,
        }
    }

    pub fn side_split_mut(&mut self, side: Side) -> &mut SplitRecord {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }
}

/// One player's line in a weekly table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyRow {
    pub player_id: PlayerId,
    pub player_name: String,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
}

impl WeeklyRow {
    pub fn set_diff(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }
}

impl From<PlayerStanding> for WeeklyRow {
    fn from(row: PlayerStanding) -> Self {
        Self {
            player_id: row.player_id,
            player_name: row.player_name,
            wins: row.wins,
            losses: row.losses,
            sets_won: row.sets_won,
            sets_lost: row.sets_lost,
        }
    }
}

/// Ranked mini-league of one calendar week (Monday start).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySnapshot {
    pub week_key: NaiveDate,
    pub week_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_player_id: Option<PlayerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_player_name: Option<String>,
    pub rows: Vec<WeeklyRow>,
}
