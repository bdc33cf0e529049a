//! Persistence collaborator: record upsert / delete and full snapshot reads.

mod json_file;

pub use json_file::JsonFileStore;

use crate::models::{GameMatch, MatchId, Player, PlayerId, Snapshot, StorageError};

/// Record changes committed together. Upserts are applied before deletes.
#[derive(Clone, Debug, Default)]
pub struct ChangeSet {
    pub put_players: Vec<Player>,
    pub delete_players: Vec<PlayerId>,
    pub put_matches: Vec<GameMatch>,
    pub delete_matches: Vec<MatchId>,
}

impl ChangeSet {
    /// Apply to `snapshot` with last-write-wins per record id.
    pub fn apply(&self, snapshot: &mut Snapshot) {
        for p in &self.put_players {
            snapshot.upsert_player(p.clone());
        }
        for m in &self.put_matches {
            snapshot.upsert_match(m.clone());
        }
        snapshot
            .players
            .retain(|p| !self.delete_players.contains(&p.id));
        snapshot
            .matches
            .retain(|m| !self.delete_matches.contains(&m.id));
    }
}

/// Store revisions observed right before and right after one write.
///
/// `before` differs from the writer's last known revision when someone else wrote in between.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WriteReceipt {
    pub before: u64,
    pub after: u64,
}

/// Durable storage for players and matches. Upserts are last-write-wins per record id.
pub trait Store {
    /// Full snapshot read.
    fn load_all(&self) -> Result<(Vec<Player>, Vec<GameMatch>), StorageError>;

    /// Apply all changes as one write; either all of them land or none.
    fn commit(&mut self, changes: &ChangeSet) -> Result<WriteReceipt, StorageError>;

    /// Replace both collections.
    fn replace_all(
        &mut self,
        players: &[Player],
        matches: &[GameMatch],
    ) -> Result<WriteReceipt, StorageError>;

    /// Changes whenever the stored data changes; polled as the change notification.
    fn revision(&self) -> u64;

    fn put_player(&mut self, player: &Player) -> Result<WriteReceipt, StorageError> {
        self.commit(&ChangeSet {
            put_players: vec![player.clone()],
            ..ChangeSet::default()
        })
    }

    fn delete_player(&mut self, id: PlayerId) -> Result<WriteReceipt, StorageError> {
        self.commit(&ChangeSet {
            delete_players: vec![id],
            ..ChangeSet::default()
        })
    }

    fn put_match(&mut self, game_match: &GameMatch) -> Result<WriteReceipt, StorageError> {
        self.put_matches(std::slice::from_ref(game_match))
    }

    /// Bulk upsert.
    fn put_matches(&mut self, matches: &[GameMatch]) -> Result<WriteReceipt, StorageError> {
        self.commit(&ChangeSet {
            put_matches: matches.to_vec(),
            ..ChangeSet::default()
        })
    }

    fn delete_match(&mut self, id: MatchId) -> Result<WriteReceipt, StorageError> {
        self.commit(&ChangeSet {
            delete_matches: vec![id],
            ..ChangeSet::default()
        })
    }
}

/// In-memory store. Used by tests and as a scratch backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    data: Snapshot,
    revision: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with records.
    pub fn with_records(players: Vec<Player>, matches: Vec<GameMatch>) -> Self {
        Self {
            data: Snapshot::new(players, matches),
            revision: 1,
        }
    }

    fn touch(&mut self) -> WriteReceipt {
        let before = self.revision;
        self.revision += 1;
        WriteReceipt {
            before,
            after: self.revision,
        }
    }
}

impl Store for MemoryStore {
    fn load_all(&self) -> Result<(Vec<Player>, Vec<GameMatch>), StorageError> {
        Ok((self.data.players.clone(), self.data.matches.clone()))
    }

    fn commit(&mut self, changes: &ChangeSet) -> Result<WriteReceipt, StorageError> {
        changes.apply(&mut self.data);
        Ok(self.touch())
    }

    fn replace_all(
        &mut self,
        players: &[Player],
        matches: &[GameMatch],
    ) -> Result<WriteReceipt, StorageError> {
        self.data = Snapshot::new(players.to_vec(), matches.to_vec());
        Ok(self.touch())
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}
