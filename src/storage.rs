//! String key/value persistence standing in for browser storage.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, PoisonError},
};

use log::{debug, warn};
use tempfile::NamedTempFile;

pub const STORAGE_FILE_NAME: &str = "storage.json";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access storage: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// One JSON object file holding every key. Each operation re-reads the file
/// so other processes' writes are observed; the last writer wins.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn open(dir: &Path) -> Result<FileStorage, StorageError> {
        fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE_NAME);
        debug!("storage:: using {}", path.display());
        Ok(FileStorage {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return BTreeMap::new(),
            Err(e) => {
                warn!("storage:: failed to read {}: {}", self.path.display(), e);
                return BTreeMap::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("storage:: {} is not a valid store, treating as empty: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    /// Writes a sibling temp file and renames it over the store, so a crash
    /// mid-write leaves the previous contents intact.
    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(raw.as_bytes())?;
        staged.as_file().sync_all()?;
        staged.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.read_all().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut entries = self.read_all();
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}
