//! Data structures for the match journal: players, matches, derived stats, errors.

mod error;
mod game;
mod player;
mod snapshot;
mod stats;

pub use error::{JournalError, StorageError, ValidationError};
pub use game::{GameMatch, MatchFormat, MatchId, MatchStatus, SetEntry, Side, Sides};
pub use player::{normalize_favorite, Player, PlayerId, PLAYER_COLORS};
pub use snapshot::{ImportMode, Snapshot, StoredData, SCHEMA_VERSION};
pub use stats::{
    H2HRecord, Outcome, PartnerRecord, PlayerInsights, PlayerProfileStats, PlayerStanding,
    ProfileSummary, SplitRecord, Streak, Trend, WeeklyRow, WeeklySnapshot,
};
