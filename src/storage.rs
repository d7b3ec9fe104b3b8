//! Named slots persisted between requests: the session slot and the
//! per-table search snapshots.
//!
//! [`FileStorage`] keeps every slot in one JSON object on disk and replaces
//! the file atomically on each write (temp file, then rename). On Unix the
//! file is created with 0600 permissions since the session slot holds user
//! data. [`MemoryStorage`] is the in-process variant used by tests.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::error::{AppError, AppResult};

pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;
    fn remove(&self, key: &str) -> AppResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> AppResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| AppError::Storage("storage lock poisoned".into()))
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.slots()?.remove(key);
        Ok(())
    }
}

/// Slots in one small JSON file.
///
/// Every call does blocking file I/O (read, and for writes an fsync) on the
/// calling thread. That is acceptable for the single local operator this
/// serves; a shared deployment should put the slots in the database instead.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    // Serializes read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> AppResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::Storage(format!("cannot read storage file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_slots(&self, slots: &HashMap<String, String>) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::Storage(format!("cannot create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(slots)?;
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| AppError::Storage(format!("cannot create temp file: {e}")))?;

            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| AppError::Storage(format!("cannot set permissions: {e}")))?;

            file.write_all(content.as_bytes())
                .map_err(|e| AppError::Storage(format!("cannot write storage file: {e}")))?;
            file.sync_all()
                .map_err(|e| AppError::Storage(format!("cannot sync storage file: {e}")))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| AppError::Storage(format!("cannot replace storage file: {e}")))?;
        Ok(())
    }

    fn guard(&self) -> AppResult<std::sync::MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| AppError::Storage("storage lock poisoned".into()))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let _guard = self.guard()?;
        Ok(self.read_slots()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let _guard = self.guard()?;
        let mut slots = self.read_slots()?;
        slots.insert(key.to_string(), value.to_string());
        self.write_slots(&slots)
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        let _guard = self.guard()?;
        let mut slots = self.read_slots()?;
        if slots.remove(key).is_some() {
            self.write_slots(&slots)?;
        }
        Ok(())
    }
}
