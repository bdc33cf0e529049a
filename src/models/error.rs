//! Errors surfaced by record mutations, validation and persistence.

use crate::models::game::{MatchId, Side};
use crate::models::player::PlayerId;
use thiserror::Error;

/// Rejections of malformed or incomplete match / player input.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ValidationError {
    #[error("Player name is required")]
    EmptyName,
    #[error("Select all players for both sides")]
    MissingPlayers,
    #[error("Side {side} needs {expected} player(s), got {found}")]
    WrongSlotCount {
        side: Side,
        expected: usize,
        found: usize,
    },
    #[error("A player cannot appear on both sides in the same match")]
    PlayerOnBothSides(PlayerId),
    #[error("A player cannot fill two slots in the same match")]
    DuplicatePlayer(PlayerId),
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),
    #[error("Match declares {declared} set(s) but has {found}")]
    SetCountMismatch { declared: usize, found: usize },
    #[error("Set {} needs a winner (auto from scores, or select A/B for ties/blanks)", .index + 1)]
    SetWithoutWinner { index: usize },
    #[error("Completed tied/ambiguous matches require explicit match winner side")]
    AmbiguousCompletedMatch,
}

/// Failures of the persistence collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported schema version: {found} (expected {expected})")]
    SchemaVersion { expected: u32, found: u32 },
}

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Player is referenced in {match_count} match(es). Merge player before deletion.")]
    PlayerReferenced {
        player_id: PlayerId,
        match_count: usize,
    },

    #[error("Unsupported schema version: {found} (expected {expected})")]
    SchemaVersion { expected: u32, found: u32 },

    #[error("Player not found")]
    PlayerNotFound(PlayerId),

    #[error("Match not found")]
    MatchNotFound(MatchId),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for JournalError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::SchemaVersion { expected, found } => {
                JournalError::SchemaVersion { expected, found }
            }
            other => JournalError::Storage(other),
        }
    }
}
