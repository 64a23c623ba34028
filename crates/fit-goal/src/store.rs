// store.rs — KeyValueStore trait and its implementations.
//
// Everything the app persists is a whole JSON blob under a string key:
// the profile (with its active goals), the achievements list, workouts and
// meals. There are no transactions and no partial writes; the last write
// for a key wins.
//
// Two backends:
// - `MemoryStore` keeps blobs in a HashMap (tests, embedding).
// - `FileStore` writes each key to `<store_dir>/<key>.json`, which keeps
//   blobs isolated and easy to inspect manually.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GoalError;
use crate::parse::decode_records;

/// Key of the profile blob, which carries the active goals.
pub const PROFILE_KEY: &str = "fitnessProfile";
/// Key of the achievements list.
pub const ACHIEVEMENTS_KEY: &str = "fitnessAchievements";
/// Key of the workout log.
pub const WORKOUTS_KEY: &str = "fitnessWorkouts";
/// Key of the meal log.
pub const MEALS_KEY: &str = "fitnessMeals";

/// A synchronous string → string blob store.
///
/// The engine reads once at startup and writes after every mutation.
/// Implementations decide where the bytes live; callers never see more
/// than these three operations.
pub trait KeyValueStore {
    /// Read the value for `key`, or `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>, GoalError>;

    /// Write (create or overwrite) the value for `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<(), GoalError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), GoalError>;
}

/// Decode the blob under `key`, or return `T::default()`.
///
/// An absent key, a failed read, and malformed JSON all mean "no data".
/// Failures are logged and swallowed; hydration never fails.
pub fn load_or_default<S, T>(store: &S, key: &str) -> T
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, "failed to read stored blob, starting empty: {}", e);
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, "discarding malformed stored blob: {}", e);
            T::default()
        }
    }
}

/// Decode the list under `key` record by record.
///
/// Like [`load_or_default`], an absent, unreadable or malformed blob is an
/// empty list. Inside a well-formed list, a record that doesn't decode is
/// dropped with a warning and the rest load.
pub fn load_records<S, T>(store: &S, key: &str) -> Vec<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let value: serde_json::Value = load_or_default(store, key);
    decode_records(value, key)
}

/// Serialize `value` as JSON and write it under `key`.
pub fn save_json<S, T>(store: &mut S, key: &str, value: &T) -> Result<(), GoalError>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    store.write(key, &json)
}

/// In-memory store, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, GoalError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), GoalError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), GoalError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// File-backed store: one JSON file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    store_dir: PathBuf,
}

impl FileStore {
    /// Create a store backed by the given directory.
    /// Creates the directory if it doesn't exist.
    pub fn new(store_dir: impl AsRef<Path>) -> Result<Self, GoalError> {
        let store_dir = store_dir.as_ref().to_path_buf();
        fs::create_dir_all(&store_dir).map_err(|source| GoalError::IoError {
            path: store_dir.display().to_string(),
            source,
        })?;
        Ok(Self { store_dir })
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Path to the JSON file for a given key.
    fn key_file(&self, key: &str) -> PathBuf {
        self.store_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, GoalError> {
        let path = self.key_file(key);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Some(json))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), GoalError> {
        let path = self.key_file(key);
        fs::write(&path, value).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })
    }

    fn remove(&mut self, key: &str) -> Result<(), GoalError> {
        let path = self.key_file(key);
        if !path.exists() {
            return Ok(());
        }
        fs::remove_file(&path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })
    }
}
