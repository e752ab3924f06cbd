//! Storage module for saving and loading user state between sessions.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Everything the app persists, one JSON value per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Favorites,
    Bookmarks,
    RecentlyViewed,
    Theme,
    User,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::Bookmarks => "bookmarks",
            Self::RecentlyViewed => "recentlyViewed",
            Self::Theme => "theme",
            Self::User => "user",
        }
    }
}

/// Durable key-value storage for user state.
pub trait KeyValueStore {
    fn load(&self, key: StorageKey) -> Result<Option<Value>>;
    fn save(&self, key: StorageKey, value: &Value) -> Result<()>;
    fn remove(&self, key: StorageKey) -> Result<()>;
}

/// Load `key` and decode it as `T`.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: StorageKey) -> Result<Option<T>> {
    match store.load(key)? {
        None => Ok(None),
        Some(value) => {
            let decoded = serde_json::from_value(value)
                .with_context(|| format!("Malformed value stored under '{}'", key.as_str()))?;
            Ok(Some(decoded))
        }
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: StorageKey, value: &T) -> Result<()> {
    let value = serde_json::to_value(value)?;
    store.save(key, &value)
}

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStore {
    state_dir: PathBuf,
}

impl FileStore {
    pub fn new(state_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&state_dir)
            .with_context(|| format!("Failed to create state directory: {:?}", state_dir))?;

        Ok(Self { state_dir })
    }

    /// Get default storage location.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingo")
            .join("state")
    }

    fn key_path(&self, key: StorageKey) -> PathBuf {
        self.state_dir.join(format!("{}.json", key.as_str()))
    }
}

impl KeyValueStore for FileStore {
    fn load(&self, key: StorageKey) -> Result<Option<Value>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        let value = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(Some(value))
    }

    fn save(&self, key: StorageKey, value: &Value) -> Result<()> {
        let path = self.key_path(key);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {:?}", path))?;
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(&path).with_context(|| format!("Failed to remove {:?}", path))?;
        }
        Ok(())
    }
}

/// Keeps everything in memory for the lifetime of the process.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<StorageKey, Value>>,
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: StorageKey) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(&key).cloned())
    }

    fn save(&self, key: StorageKey, value: &Value) -> Result<()> {
        self.values.borrow_mut().insert(key, value.clone());
        Ok(())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        self.values.borrow_mut().remove(&key);
        Ok(())
    }
}

/// A store whose every operation fails, for exercising error paths.
#[cfg(test)]
pub struct BrokenStore;

#[cfg(test)]
impl KeyValueStore for BrokenStore {
    fn load(&self, key: StorageKey) -> Result<Option<Value>> {
        anyhow::bail!("cannot read {}", key.as_str())
    }

    fn save(&self, key: StorageKey, _value: &Value) -> Result<()> {
        anyhow::bail!("cannot write {}", key.as_str())
    }

    fn remove(&self, key: StorageKey) -> Result<()> {
        anyhow::bail!("cannot remove {}", key.as_str())
    }
}
