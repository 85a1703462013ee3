//! Key-value persistence backends for the article store.
//!
//! The store only ever needs `get` and `set` on a single well-known key, so a
//! backend is anything that can map a string key to a string value.

use std::{
    collections::HashMap,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{debug, error, trace};
use tempfile::NamedTempFile;

use crate::{NewsError, Result};

/// A minimal string key-value store.
pub trait KeyValueBackend {
    /// Returns the value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Helper method to get the file path for a key
    fn key_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();

        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        debug!("Reading key '{}' from {}", key, path.display());

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                trace!("No value stored for key '{}'", key);
                Ok(None)
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                Err(NewsError::Io(e))
            }
        }
    }

    /// Writes through a temporary file in the same directory so a crash never
    /// leaves a half-written blob behind.
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.dir.exists() {
            debug!("Creating data directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).map_err(|e| {
                error!("Failed to create data directory: {}", e);
                NewsError::DirectoryError {
                    path: self.dir.clone(),
                }
            })?;
        }

        let path = self.key_path(key);
        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            NewsError::Io(e)
        })?;

        trace!("Writing {} bytes to temporary file", value.len());
        temp_file.write_all(value.as_bytes())?;
        temp_file.flush()?;

        temp_file.persist(&path).map_err(|e| {
            error!("Failed to persist file {}: {}", path.display(), e.error);
            NewsError::Io(e.error)
        })?;

        debug!("Stored key '{}' at {}", key, path.display());
        Ok(())
    }
}

/// In-process backend; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a key, as if an earlier session had written it.
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_backend_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("data"));
        assert_eq!(backend.get("crypto-articles").unwrap(), None);
    }

    #[test]
    fn test_file_backend_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path().join("nested").join("data"));

        backend.set("crypto-articles", "[]").unwrap();
        backend.set("crypto-articles", "[1]").unwrap();

        assert_eq!(
            backend.get("crypto-articles").unwrap().as_deref(),
            Some("[1]")
        );
        assert!(backend.dir().join("crypto-articles.json").is_file());
    }

    #[test]
    fn test_file_backend_sanitizes_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = FileBackend::new(dir.path());
        backend.set("../escape/me", "x").unwrap();
        assert!(dir.path().join("___escape_me.json").is_file());
        assert_eq!(backend.get("../escape/me").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_memory_backend_round_trip() {
        let mut backend = MemoryBackend::new().with_entry("a", "1");
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("1"));
        backend.set("a", "2").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(backend.get("b").unwrap(), None);
    }
}
