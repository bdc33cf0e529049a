//! Pickleball match journal: library with models, the stats engine and the persistence layer.

pub mod config;
pub mod export;
pub mod journal;
pub mod logic;
pub mod models;
pub mod store;

pub use config::AppConfig;
pub use journal::Journal;
pub use logic::{
    compute_player_insights, compute_player_profile, compute_standings, compute_weekly_snapshots,
    ensure_player_deletable, filter_matches, filter_standings, match_winner_names,
    merge_player_matches, resolve_match, validate_match, MatchFilter, MatchResolution,
};
pub use models::{
    GameMatch, H2HRecord, ImportMode, JournalError, MatchFormat, MatchId, MatchStatus, Outcome,
    Player, PlayerId, PlayerInsights, PlayerProfileStats, PlayerStanding, SetEntry, Side,
    Snapshot, StorageError, StoredData, Streak, Trend, ValidationError, WeeklyRow, WeeklySnapshot,
    SCHEMA_VERSION,
};
pub use store::{ChangeSet, JsonFileStore, MemoryStore, Store, WriteReceipt};
