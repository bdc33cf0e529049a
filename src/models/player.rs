//! Player record.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match sides and lookups).
pub type PlayerId = Uuid;

/// Avatar colours handed out to new players.
pub const PLAYER_COLORS: [&str; 6] = [
    "#16a34a", "#0284c7", "#ea580c", "#4f46e5", "#ef4444", "#0f766e",
];

/// A player in the journal.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    /// Free-text "favorite tennis player" shown on the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_tennis_player: Option<String>,
}

impl Player {
    /// Create a new player with the given name, a fresh id and no colour.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            avatar_color: None,
            favorite_tennis_player: None,
        }
    }

    /// Set the avatar colour to a random entry of [`PLAYER_COLORS`].
    pub fn with_random_color(mut self) -> Self {
        let color = PLAYER_COLORS
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or(PLAYER_COLORS[0]);
        self.avatar_color = Some(color.to_string());
        self
    }

    /// Set the favourite attribute; blank input clears it.
    pub fn with_favorite(mut self, favorite: Option<&str>) -> Self {
        self.favorite_tennis_player = normalize_favorite(favorite);
        self
    }
}

/// Trim a favourite attribute, mapping blank to `None`.
pub fn normalize_favorite(favorite: Option<&str>) -> Option<String> {
    favorite
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
