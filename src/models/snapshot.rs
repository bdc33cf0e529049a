//! Snapshot of all records and the bulk export / import envelope.

use crate::models::game::{GameMatch, MatchId};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// Version of the export envelope this build reads and writes.
pub const SCHEMA_VERSION: u32 = 1;

/// The current players and matches, as loaded from the store.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub matches: Vec<GameMatch>,
}

impl Snapshot {
    pub fn new(players: Vec<Player>, matches: Vec<GameMatch>) -> Self {
        Self { players, matches }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn game_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Insert or replace a player by id (position kept on replace).
    pub fn upsert_player(&mut self, player: Player) {
        match self.players.iter_mut().find(|p| p.id == player.id) {
            Some(existing) => *existing = player,
            None => self.players.push(player),
        }
    }

    /// Insert or replace a match by id (position kept on replace).
    pub fn upsert_match(&mut self, game_match: GameMatch) {
        match self.matches.iter_mut().find(|m| m.id == game_match.id) {
            Some(existing) => *existing = game_match,
            None => self.matches.push(game_match),
        }
    }
}

/// Bulk export format wrapping both collections.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    pub schema_version: u32,
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub matches: Vec<GameMatch>,
}

impl StoredData {
    /// Envelope at the current schema version.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            players: snapshot.players.clone(),
            matches: snapshot.matches.clone(),
        }
    }

    pub fn into_snapshot(self) -> Snapshot {
        Snapshot::new(self.players, self.matches)
    }
}

/// How an import combines with existing records.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Replace everything with the imported records.
    #[default]
    Overwrite,
    /// Keep existing records; imported records win on id collisions.
    Merge,
}
