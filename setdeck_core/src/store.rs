//! Key-value persistence for the catalog and the deck.
//!
//! Each key holds one JSON blob. The file-backed store keeps one file per
//! key and writes through a synced temp file plus an atomic rename, so a
//! crashed write never leaves a half-written blob behind.

use crate::{Error, Result};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Key holding the serialized catalog
pub const EXERCISES_KEY: &str = "exercises";

/// Key holding the serialized deck
pub const DECK_KEY: &str = "deck";

/// Durable storage of named text blobs
pub trait BlobStore {
    /// Read the raw blob for a key, `None` if it was never written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob for a key
    fn write(&mut self, key: &str, contents: &str) -> Result<()>;

    /// Load and deserialize a value, falling back on a missing or bad blob
    fn load<T>(&self, key: &str, fallback: T) -> T
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        let contents = match self.read(key) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                tracing::info!("No stored value for {:?}, using defaults", key);
                return fallback;
            }
            Err(e) => {
                tracing::warn!("Unable to read {:?}: {}. Using defaults.", key, e);
                return fallback;
            }
        };

        match serde_json::from_str::<T>(&contents) {
            Ok(value) => {
                tracing::debug!("Loaded {:?}", key);
                value
            }
            Err(e) => {
                tracing::warn!("Failed to parse {:?}: {}. Using defaults.", key, e);
                fallback
            }
        }
    }

    /// Serialize and store a value
    fn save<T>(&mut self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
        Self: Sized,
    {
        let contents = serde_json::to_string(value)?;
        self.write(key, &contents)
    }
}

/// One JSON file per key inside a directory
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BlobStore for JsonFileStore {
    /// Read a blob under a shared lock
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            return Err(e.into());
        }

        file.unlock()?;
        Ok(Some(contents))
    }

    /// Atomically replace a blob
    ///
    /// 1. Write to a temp file in the same directory
    /// 2. Sync to disk
    /// 3. Rename over the original
    fn write(&mut self, key: &str, contents: &str) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        let temp = NamedTempFile::new_in(&self.dir)?;

        // Locks only this temp file. Atomicity comes from the rename below;
        // two processes doing read-modify-write can still lose an update.
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {:?} to {:?}", key, path);
        Ok(())
    }
}

/// In-memory store, nothing survives the process
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw blob for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.blobs.get(key).map(String::as_str)
    }

    /// Seed a raw blob without counting it as a write
    pub fn insert(&mut self, key: impl Into<String>, contents: impl Into<String>) {
        self.blobs.insert(key.into(), contents.into());
    }

    /// Number of writes performed through [`BlobStore::write`]
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl BlobStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<()> {
        self.blobs.insert(key.to_string(), contents.to_string());
        self.writes += 1;
        Ok(())
    }
}
