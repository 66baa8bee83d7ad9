//! Key-value snapshot storage and the persistence adapter built on it.
//!
//! Storage only moves strings. Encoding, validation and fallback live in
//! [`crate::codec`]; [`Persistence`] glues the two together and never lets a
//! storage failure reach the store.

use crate::codec;
use crate::error::{BoardError, Result};
use crate::store::BoardState;
use fs2::FileExt;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Storage key used when none is configured
pub const DEFAULT_STORAGE_KEY: &str = "vibeflow-board-storage";

/// A string-valued key-value store for board snapshots
pub trait SnapshotStorage {
    /// Read the value under `key`, `None` when nothing is stored
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value under `key`
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

// =============================================================================
// File storage
// =============================================================================

/// Stores each key as `<root>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the storage directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Try to acquire an exclusive lock on the storage directory (non-blocking).
    ///
    /// Held by callers running a load-mutate-save cycle so concurrent processes
    /// cannot interleave their writes.
    pub fn lock(&self) -> Result<StorageLock> {
        let lock_path = self.lock_path();
        fs::create_dir_all(&self.root)?;

        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(StorageLock {
                file,
                path: lock_path,
            }),
            Err(_) => Err(BoardError::LockBusy { path: lock_path }),
        }
    }
}

impl SnapshotStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        atomic_write(&self.path_for(key), value.as_bytes())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// RAII lock guard - releases on drop
pub struct StorageLock {
    file: fs::File,
    path: PathBuf,
}

impl StorageLock {
    /// The lock file held by this guard
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StorageLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Write a file atomically using temp file + rename
fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;

    // Rename (atomic on same filesystem)
    fs::rename(&temp_path, path)?;

    Ok(())
}

// =============================================================================
// Memory storage
// =============================================================================

/// In-process storage. Clones share the same entries, so a test can keep a
/// handle while the store owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with an IO error
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw value under `key`
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Store a raw value under `key`, bypassing failure injection
    pub fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.into(), value.into());
        }
    }
}

fn poisoned() -> BoardError {
    BoardError::Io(std::io::Error::other("memory storage lock poisoned"))
}

impl SnapshotStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BoardError::Io(std::io::Error::other(
                "storage quota exceeded",
            )));
        }
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// Persistence adapter
// =============================================================================

/// Loads and saves board snapshots under a single storage key
pub struct Persistence {
    storage: Box<dyn SnapshotStorage>,
    key: String,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").field("key", &self.key).finish()
    }
}

impl Persistence {
    pub fn new(storage: impl SnapshotStorage + 'static, key: impl Into<String>) -> Self {
        Self {
            storage: Box::new(storage),
            key: key.into(),
        }
    }

    /// Persistence under [`DEFAULT_STORAGE_KEY`]
    pub fn with_default_key(storage: impl SnapshotStorage + 'static) -> Self {
        Self::new(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the stored board. Missing, unreadable or invalid snapshots yield the
    /// default board.
    pub fn load(&self) -> BoardState {
        match self.storage.read(&self.key) {
            Ok(stored) => codec::decode(stored.as_deref()),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read board snapshot, using default board");
                BoardState::default()
            }
        }
    }

    /// Save the board. Failures are logged and swallowed; returns whether the
    /// snapshot was written.
    pub fn save(&self, state: &BoardState) -> bool {
        let result = codec::encode(state).and_then(|text| self.storage.write(&self.key, &text));
        match result {
            Ok(()) => {
                debug!(key = %self.key, cards = state.card_count(), "saved board snapshot");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to save board snapshot");
                false
            }
        }
    }

    /// Remove the stored snapshot
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_storage_roundtrip() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path().join(".vibeflow"));

        assert_eq!(storage.read("board").unwrap(), None);

        storage.write("board", "{\"a\":1}").unwrap();
        assert_eq!(storage.read("board").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(storage.path_for("board").exists());
        assert!(!storage.path_for("board").with_extension("tmp").exists());

        storage.write("board", "{}").unwrap();
        assert_eq!(storage.read("board").unwrap().as_deref(), Some("{}"));

        storage.remove("board").unwrap();
        assert_eq!(storage.read("board").unwrap(), None);
        storage.remove("board").unwrap();
    }

    #[test]
    fn test_locking() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::new(temp.path());

        let lock1 = storage.lock().unwrap();
        assert_eq!(lock1.path(), storage.lock_path().as_path());

        match storage.lock() {
            Err(BoardError::LockBusy { path }) => assert_eq!(path, storage.lock_path()),
            other => panic!("expected LockBusy, got {:?}", other.map(|l| l.path().to_path_buf())),
        }

        drop(lock1);
        let _lock2 = storage.lock().unwrap();
    }

    #[test]
    fn test_memory_storage_shares_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage.write("k", "v").unwrap();
        assert_eq!(handle.get("k").as_deref(), Some("v"));

        handle.set_fail_writes(true);
        assert!(storage.write("k", "w").is_err());
        assert_eq!(storage.read("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_persistence_load_missing_is_default() {
        let persistence = Persistence::with_default_key(MemoryStorage::new());
        assert_eq!(persistence.load(), BoardState::default());
        assert_eq!(persistence.key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_persistence_save_failure_is_swallowed() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let persistence = Persistence::new(storage.clone(), "board");

        assert!(!persistence.save(&BoardState::default()));
        assert_eq!(storage.get("board"), None);

        storage.set_fail_writes(false);
        assert!(persistence.save(&BoardState::default()));
        assert!(storage.get("board").is_some());

        persistence.clear().unwrap();
        assert_eq!(storage.get("board"), None);
    }

    #[test]
    fn test_persistence_over_files() {
        let temp = TempDir::new().unwrap();
        let persistence = Persistence::new(FileStorage::new(temp.path()), "board");
        assert!(persistence.save(&BoardState::default()));
        assert_eq!(persistence.load(), BoardState::default());
    }
}
