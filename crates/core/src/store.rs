// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key-value backends for the offline cache.
//!
//! Values are plain text. [`FileStore`] keeps one file per key in a directory
//! and serializes read-modify-write cycles across processes with an exclusive
//! lock on `.lock`, so two CLI invocations cannot lose each other's enqueues.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;

use crate::error::{Error, Result};

const LOCK_FILE_NAME: &str = ".lock";

/// Read-modify-write callback for [`KeyValueStore::update`].
///
/// Receives the current value and returns the new one (`None` removes the key).
pub type Updater<'a> = &'a mut dyn FnMut(Option<String>) -> Result<Option<String>>;

/// A synchronous, text-valued key-value store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes the key; absent keys are not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Atomically replaces the value of `key` with the result of `f`.
    fn update(&self, key: &str, f: Updater<'_>) -> Result<()>;
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }

    fn update(&self, key: &str, f: Updater<'_>) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match f(entries.get(key).cloned())? {
            Some(value) => entries.insert(key.to_string(), value),
            None => entries.remove(key),
        };
        Ok(())
    }
}

/// Directory-backed store, one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore { dir: dir.to_path_buf() })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Takes the store-wide write lock; released when the file is dropped.
    fn lock(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE_NAME))?;
        file.lock_exclusive().map_err(|e| Error::Lock(e.to_string()))?;
        Ok(file)
    }

    fn write_atomic(&self, key: &str, value: &str) -> Result<()> {
        let tmp_path = self.dir.join(format!("{key}.tmp"));
        let mut file = File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, self.path_for(key))?;
        Ok(())
    }

    fn remove_file(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock()?;
        self.write_atomic(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock()?;
        self.remove_file(key)
    }

    fn update(&self, key: &str, f: Updater<'_>) -> Result<()> {
        let _guard = self.lock()?;
        match f(self.get(key)?)? {
            Some(value) => self.write_atomic(key, &value),
            None => self.remove_file(key),
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
