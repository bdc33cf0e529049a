//! Single JSON document store in the export envelope shape.

use std::collections::hash_map::DefaultHasher;
use std::fs::{self, File, OpenOptions};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::debug;

use super::{ChangeSet, Store, WriteReceipt};
use crate::models::{GameMatch, Player, Snapshot, StorageError, StoredData, SCHEMA_VERSION};

/// Keeps all records in one JSON file (`{schemaVersion, players, matches}`).
///
/// Every write rewrites the whole file through a temp file and a rename, holding an exclusive
/// lock on a `.lock` sidecar so read-modify-write cycles of separate handles or processes
/// never interleave.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode the file. A missing file is an empty snapshot.
    fn read(&self) -> Result<Snapshot, StorageError> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        let data: StoredData = serde_json::from_str(&raw)?;
        if data.schema_version != SCHEMA_VERSION {
            return Err(StorageError::SchemaVersion {
                expected: SCHEMA_VERSION,
                found: data.schema_version,
            });
        }
        Ok(data.into_snapshot())
    }

    fn write(&self, snapshot: &Snapshot) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&StoredData::from_snapshot(snapshot))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            "Wrote {} players / {} matches to {:?}",
            snapshot.players.len(),
            snapshot.matches.len(),
            self.path
        );
        Ok(())
    }

    /// Exclusive lock on the sidecar file; released when the handle drops.
    fn lock(&self) -> Result<File, StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let lock = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.path.with_extension("json.lock"))?;
        FileExt::lock_exclusive(&lock)?;
        Ok(lock)
    }

    /// Run a write under the lock and report the revisions around it.
    fn locked_write(
        &self,
        f: impl FnOnce(&Self) -> Result<(), StorageError>,
    ) -> Result<WriteReceipt, StorageError> {
        let _lock = self.lock()?;
        let before = self.revision();
        f(self)?;
        Ok(WriteReceipt {
            before,
            after: self.revision(),
        })
    }
}

impl Store for JsonFileStore {
    fn load_all(&self) -> Result<(Vec<Player>, Vec<GameMatch>), StorageError> {
        let snapshot = self.read()?;
        Ok((snapshot.players, snapshot.matches))
    }

    fn commit(&mut self, changes: &ChangeSet) -> Result<WriteReceipt, StorageError> {
        self.locked_write(|store| {
            let mut snapshot = store.read()?;
            changes.apply(&mut snapshot);
            store.write(&snapshot)
        })
    }

    fn replace_all(
        &mut self,
        players: &[Player],
        matches: &[GameMatch],
    ) -> Result<WriteReceipt, StorageError> {
        self.locked_write(|store| {
            store.write(&Snapshot::new(players.to_vec(), matches.to_vec()))
        })
    }

    /// Fingerprint of the file's modification time, size and (on unix) inode; 0 when absent.
    ///
    /// Each write renames a fresh file into place, so the inode moves even when two writes
    /// land within the same mtime tick.
    fn revision(&self) -> u64 {
        let Ok(meta) = fs::metadata(&self.path) else {
            return 0;
        };
        let mut hasher = DefaultHasher::new();
        meta.modified().ok().hash(&mut hasher);
        meta.len().hash(&mut hasher);
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            meta.ino().hash(&mut hasher);
        }
        hasher.finish().max(1)
    }
}
