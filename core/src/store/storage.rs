use crate::model::{Detection, SimulatedAnomaly, SimulationAlert};
use crate::prelude::SimResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fixed namespace key for the persisted simulation snapshot.
pub const STORAGE_KEY: &str = "drishti_simulation_state";

/// Durable key/value storage for serialized snapshots.
pub trait SnapshotStorage: Send + Sync {
    fn load(&self, key: &str) -> SimResult<Option<String>>;
    fn save(&self, key: &str, contents: &str) -> SimResult<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> SimResult<()>;
}

/// The persisted triple plus the wall-clock time (ms since epoch) it was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub anomalies: Vec<SimulatedAnomaly>,
    pub alerts: Vec<SimulationAlert>,
    pub detections: Vec<Detection>,
    pub timestamp: i64,
}

impl PersistedSnapshot {
    pub fn encode(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn decode(raw: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// One JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotStorage for FileStorage {
    fn load(&self, key: &str) -> SimResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, contents: &str) -> SimResult<()> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, contents)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> SimResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Process-local storage; state does not survive a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .lock()
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false)
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> SimResult<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    fn save(&self, key: &str, contents: &str) -> SimResult<()> {
        self.entries().insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SimResult<()> {
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_storage_round_trips_and_removes() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("state"));
        assert_eq!(storage.load(STORAGE_KEY).unwrap(), None);

        storage.save(STORAGE_KEY, "{\"a\":1}").unwrap();
        assert_eq!(storage.load(STORAGE_KEY).unwrap().as_deref(), Some("{\"a\":1}"));

        storage.remove(STORAGE_KEY).unwrap();
        storage.remove(STORAGE_KEY).unwrap();
        assert!(!storage.path_for(STORAGE_KEY).exists());
    }

    #[test]
    fn memory_storage_tracks_presence() {
        let storage = MemoryStorage::new();
        storage.save("k", "v").unwrap();
        assert!(storage.contains("k"));
        storage.remove("k").unwrap();
        assert!(!storage.contains("k"));
    }

    #[test]
    fn snapshot_decode_rejects_garbage() {
        assert!(PersistedSnapshot::decode("not json").is_err());
        let empty = PersistedSnapshot::decode(
            r#"{"anomalies":[],"alerts":[],"detections":[],"timestamp":1}"#,
        )
        .unwrap();
        assert_eq!(empty.timestamp, 1);
    }
}
