//! JSON file store for native builds
//!
//! The whole map is rewritten on every `set`, which is fine for the handful
//! of keys the game keeps.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// Key-value map mirrored to a single JSON file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_map(&path) {
            Ok(values) => {
                log::info!("Loaded {} saved values from {}", values.len(), path.display());
                values
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Save file {} unreadable ({}), starting fresh", path.display(), e);
                BTreeMap::new()
            }
        };
        Self { path, values }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        if let Err(e) = write_map(&self.path, &self.values) {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}

fn read_map(path: &Path) -> io::Result<BTreeMap<String, String>> {
    let json = fs::read_to_string(path)?;
    serde_json::from_str(&json).map_err(io::Error::other)
}

fn write_map(path: &Path, values: &BTreeMap<String, String>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(values).map_err(io::Error::other)?;
    // Temp file + rename: the save is replaced atomically
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, json)?;
    fs::rename(&tmp, path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.flush();
        }
    }
}
