//! Stats engine: pure functions from players + matches to derived views, plus record rules.

mod profile;
mod records;
mod resolution;
mod standings;
mod weekly;

pub use profile::{compute_player_insights, compute_player_profile, trend, win_percentage};
pub use records::{
    check_schema_version, count_references, ensure_player_deletable, filter_matches,
    match_winner_names, merge_player_matches, validate_match, MatchFilter,
};
pub use resolution::{
    apply_score_winners, derive_winner_from_scores, is_set_included, resolve_match,
    MatchResolution,
};
pub use standings::{
    compute_standings, eligible_matches, filter_standings, standings_order, FORM_LENGTH,
};
pub use weekly::{compute_weekly_snapshots, week_key, week_label};
