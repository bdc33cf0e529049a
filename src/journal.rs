//! Journal: owns the current snapshot and applies record mutations through a [`Store`].
//!
//! Every mutation is persisted first and applied to the in-memory snapshot only once the
//! store accepted it, so a failed operation leaves the snapshot unchanged. When the store
//! reports that another writer got in since the last load, the snapshot is reloaded instead.
//! Stats are always recomputed from the current snapshot; nothing is cached.

use chrono::Utc;
use log::{debug, info};

use crate::logic::{
    apply_score_winners, check_schema_version, compute_player_insights, compute_player_profile,
    compute_standings, compute_weekly_snapshots, count_references, ensure_player_deletable,
    merge_player_matches, validate_match,
};
use crate::models::{
    normalize_favorite, GameMatch, ImportMode, JournalError, MatchId, Player, PlayerId,
    PlayerInsights, PlayerProfileStats, PlayerStanding, Snapshot, StoredData, ValidationError,
    WeeklySnapshot,
};
use crate::store::{ChangeSet, Store, WriteReceipt};

pub struct Journal<S: Store> {
    store: S,
    snapshot: Snapshot,
    /// Store revision the snapshot was loaded from (or last written at).
    revision: u64,
}

impl<S: Store> Journal<S> {
    /// Load the initial snapshot from `store`.
    pub fn open(store: S) -> Result<Self, JournalError> {
        let mut journal = Self {
            store,
            snapshot: Snapshot::default(),
            revision: 0,
        };
        journal.reload()?;
        Ok(journal)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn players(&self) -> &[Player] {
        &self.snapshot.players
    }

    pub fn matches(&self) -> &[GameMatch] {
        &self.snapshot.matches
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.snapshot.player(id)
    }

    pub fn game_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.snapshot.game_match(id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replace the snapshot with a fresh read from the store.
    pub fn reload(&mut self) -> Result<(), JournalError> {
        let revision = self.store.revision();
        let (players, matches) = self.store.load_all()?;
        debug!(
            "Reloaded {} players / {} matches (revision {})",
            players.len(),
            matches.len(),
            revision
        );
        self.snapshot = Snapshot::new(players, matches);
        self.revision = revision;
        Ok(())
    }

    /// Reload when the store changed since the last load or write. Returns whether it reloaded.
    pub fn refresh_if_changed(&mut self) -> Result<bool, JournalError> {
        if self.store.revision() == self.revision {
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }

    /// Apply `changes` to the store, then to the snapshot.
    fn commit(&mut self, changes: ChangeSet) -> Result<(), JournalError> {
        let receipt = self.store.commit(&changes)?;
        changes.apply(&mut self.snapshot);
        self.mark_written(receipt)
    }

    /// Adopt the written revision, or reload if another writer changed the store first.
    fn mark_written(&mut self, receipt: WriteReceipt) -> Result<(), JournalError> {
        if receipt.before == self.revision {
            self.revision = receipt.after;
            return Ok(());
        }
        debug!("Store changed under us (revision {} != {})", receipt.before, self.revision);
        self.reload()
    }

    fn existing_player(&self, id: PlayerId) -> Result<&Player, JournalError> {
        self.snapshot
            .player(id)
            .ok_or(JournalError::PlayerNotFound(id))
    }

    /// Create a player with a trimmed name, random avatar colour and optional favourite.
    pub fn create_player(
        &mut self,
        name: &str,
        favorite: Option<&str>,
    ) -> Result<Player, JournalError> {
        let name = required_name(name)?;
        let player = Player::new(name)
            .with_random_color()
            .with_favorite(favorite);
        self.commit(ChangeSet {
            put_players: vec![player.clone()],
            ..ChangeSet::default()
        })?;
        info!("Created player {} ({})", player.name, player.id);
        Ok(player)
    }

    pub fn rename_player(&mut self, id: PlayerId, name: &str) -> Result<Player, JournalError> {
        let name = required_name(name)?;
        let mut player = self.existing_player(id)?.clone();
        player.name = name.to_string();
        self.save_player(player)
    }

    /// Update name and favourite attribute together.
    pub fn update_player_profile(
        &mut self,
        id: PlayerId,
        name: &str,
        favorite: Option<&str>,
    ) -> Result<Player, JournalError> {
        let name = required_name(name)?;
        let mut player = self.existing_player(id)?.clone();
        player.name = name.to_string();
        player.favorite_tennis_player = normalize_favorite(favorite);
        self.save_player(player)
    }

    pub fn update_player_color(
        &mut self,
        id: PlayerId,
        color: &str,
    ) -> Result<Player, JournalError> {
        let mut player = self.existing_player(id)?.clone();
        player.avatar_color = Some(color.trim().to_string());
        self.save_player(player)
    }

    fn save_player(&mut self, player: Player) -> Result<Player, JournalError> {
        self.commit(ChangeSet {
            put_players: vec![player.clone()],
            ..ChangeSet::default()
        })?;
        info!("Updated player {} ({})", player.name, player.id);
        Ok(player)
    }

    /// Merge `from` into `to`: rewrite match participants, then delete `from`.
    ///
    /// Every match is rewritten and persisted together with the deletion in one commit.
    /// Returns the number of matches that referenced `from`. Equal ids are a no-op.
    pub fn merge_player(&mut self, from: PlayerId, to: PlayerId) -> Result<usize, JournalError> {
        if from == to {
            return Ok(0);
        }
        self.existing_player(from)?;
        self.existing_player(to)?;

        let count = count_references(&self.snapshot.matches, from);
        self.commit(ChangeSet {
            put_matches: merge_player_matches(&self.snapshot.matches, from, to, Utc::now()),
            delete_players: vec![from],
            ..ChangeSet::default()
        })?;
        info!("Merged player {} into {} ({} matches rewritten)", from, to, count);
        Ok(count)
    }

    /// Delete a player that no match references.
    pub fn delete_player(&mut self, id: PlayerId) -> Result<(), JournalError> {
        ensure_player_deletable(&self.snapshot.matches, id)?;
        self.existing_player(id)?;
        self.commit(ChangeSet {
            delete_players: vec![id],
            ..ChangeSet::default()
        })?;
        info!("Deleted player {}", id);
        Ok(())
    }

    /// Validate and upsert a match. Set winners implied by scores are filled in first.
    pub fn save_match(&mut self, mut game_match: GameMatch) -> Result<GameMatch, JournalError> {
        apply_score_winners(&mut game_match.sets);
        validate_match(&game_match, &self.snapshot.players)?;
        if let Some(existing) = self.snapshot.game_match(game_match.id) {
            game_match.created_at = existing.created_at;
        }
        game_match.updated_at = Utc::now();

        self.commit(ChangeSet {
            put_matches: vec![game_match.clone()],
            ..ChangeSet::default()
        })?;
        info!("Saved match {} ({})", game_match.id, game_match.date);
        Ok(game_match)
    }

    pub fn delete_match(&mut self, id: MatchId) -> Result<(), JournalError> {
        if self.snapshot.game_match(id).is_none() {
            return Err(JournalError::MatchNotFound(id));
        }
        self.commit(ChangeSet {
            delete_matches: vec![id],
            ..ChangeSet::default()
        })?;
        info!("Deleted match {}", id);
        Ok(())
    }

    /// Bulk export envelope at the current schema version.
    pub fn export_data(&self) -> StoredData {
        StoredData::from_snapshot(&self.snapshot)
    }

    /// Import an export envelope. A schema version mismatch is rejected before any write.
    ///
    /// Overwrite replaces both collections. Merge upserts every imported record, so the
    /// imported record wins on id collisions and keeps the existing position.
    pub fn import_data(&mut self, data: StoredData, mode: ImportMode) -> Result<(), JournalError> {
        check_schema_version(&data)?;
        let (players, matches) = (data.players.len(), data.matches.len());
        match mode {
            ImportMode::Overwrite => {
                let next = data.into_snapshot();
                let receipt = self.store.replace_all(&next.players, &next.matches)?;
                self.snapshot = next;
                self.revision = receipt.after;
            }
            ImportMode::Merge => self.commit(ChangeSet {
                put_players: data.players,
                put_matches: data.matches,
                ..ChangeSet::default()
            })?,
        }
        info!(
            "Imported data ({:?}): {} players / {} matches",
            mode, players, matches
        );
        Ok(())
    }

    pub fn standings(&self, include_not_completed: bool) -> Vec<PlayerStanding> {
        compute_standings(
            &self.snapshot.players,
            &self.snapshot.matches,
            include_not_completed,
        )
    }

    pub fn profile(
        &self,
        id: PlayerId,
        include_not_completed: bool,
    ) -> Result<PlayerProfileStats, JournalError> {
        let player = self.existing_player(id)?;
        Ok(compute_player_profile(
            player,
            &self.snapshot.players,
            &self.snapshot.matches,
            include_not_completed,
        ))
    }

    pub fn insights(&self, id: PlayerId) -> Result<PlayerInsights, JournalError> {
        let player = self.existing_player(id)?;
        Ok(compute_player_insights(
            player,
            &self.snapshot.players,
            &self.snapshot.matches,
        ))
    }

    pub fn weekly_snapshots(&self) -> Vec<WeeklySnapshot> {
        compute_weekly_snapshots(&self.snapshot.players, &self.snapshot.matches)
    }
}

fn required_name(name: &str) -> Result<&str, JournalError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName.into());
    }
    Ok(trimmed)
}
