//! Key-value content stores.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Entry file extension
const ENTRY_EXT: &str = "json";

/// Durable key-value store used to memoize stage outputs.
///
/// Implementations must tolerate a second writer for the same key: values
/// for one key are identical, so the later write is redundant.
pub trait ContentStore: Send + Sync {
    fn has(&self, key: &str) -> bool;
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]) -> io::Result<()>;
    /// Drop an entry. Absent keys are not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

// ============================================================================
// FileStore
// ============================================================================

/// One file per key under a cache directory.
///
/// Writes go to a unique temp file and are renamed into place, so readers
/// never see a partial entry.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Remove every entry.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.{ENTRY_EXT}"))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!(".{key}.{}.{n}.tmp", std::process::id()))
    }
}

impl ContentStore for FileStore {
    fn has(&self, key: &str) -> bool {
        self.entry_path(key).is_file()
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        let path = self.entry_path(key);
        if path.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.dir)?;
        let tmp = self.temp_path(key);
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.entry_path(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// MemoryStore
// ============================================================================

/// Process-local store for tests and `--no-cache` runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }
}

impl ContentStore for MemoryStore {
    fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: &[u8]) -> io::Result<()> {
        self.entries
            .entry(key.to_string())
            .or_insert_with(|| value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
