//! Typed asset records on top of a [`ContentStore`].

use std::sync::Arc;

use super::{CacheKey, ContentStore};
use crate::asset::{AssetData, AssetError};
use crate::debug;

/// Stores and loads [`AssetData`] as JSON.
#[derive(Clone)]
pub struct AssetCache {
    store: Arc<dyn ContentStore>,
}

impl AssetCache {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub fn has(&self, key: &CacheKey) -> bool {
        self.store.has(key.as_str())
    }

    /// Load a record. Unreadable entries are dropped and count as a miss.
    pub fn load(&self, key: &CacheKey) -> Option<AssetData> {
        let bytes = self.store.get(key.as_str())?;
        match serde_json::from_slice(&bytes) {
            Ok(data) => {
                debug!("cache"; "hit {key}");
                Some(data)
            }
            Err(err) => {
                debug!("cache"; "dropping unreadable entry {key}: {err}");
                if let Err(err) = self.store.remove(key.as_str()) {
                    debug!("cache"; "failed to remove {key}: {err}");
                }
                None
            }
        }
    }

    pub fn save(&self, key: &CacheKey, data: &AssetData) -> Result<(), AssetError> {
        let bytes = serde_json::to_vec(data).map_err(|err| AssetError::Cache {
            key: key.to_string(),
            source: err.into(),
        })?;
        self.store
            .set(key.as_str(), &bytes)
            .map_err(|source| AssetError::Cache {
                key: key.to_string(),
                source,
            })?;
        debug!("cache"; "stored {key}");
        Ok(())
    }

    /// Return the cached record for `key`, or run `compute` and store its result.
    pub fn get_or_insert_with<F>(&self, key: &CacheKey, compute: F) -> Result<AssetData, AssetError>
    where
        F: FnOnce() -> Result<AssetData, AssetError>,
    {
        if let Some(data) = self.load(key) {
            return Ok(data);
        }
        debug!("cache"; "miss {key}");
        let data = compute()?;
        self.save(key, &data)?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{FileStore, MemoryStore};

    fn cache() -> (Arc<MemoryStore>, AssetCache) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), AssetCache::new(store))
    }

    #[test]
    fn test_round_trip() {
        let (_, cache) = cache();
        let key = CacheKey::new("a.css", &["minified"], b"a{}");
        let data = AssetData {
            path: "/a.min.css".into(),
            content: b"a{}".to_vec(),
            ..AssetData::default()
        };

        cache.save(&key, &data).unwrap();
        assert!(cache.has(&key));
        assert_eq!(cache.load(&key), Some(data));
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let (store, cache) = cache();
        let key = CacheKey::new("a.css", &["minified"], b"a{}");
        store.set(key.as_str(), b"not json").unwrap();

        assert!(cache.has(&key));
        assert_eq!(cache.load(&key), None);
        assert!(!cache.has(&key));
    }

    #[test]
    fn test_corrupt_file_entry_replaced() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(dir.path()));
        let cache = AssetCache::new(store.clone());
        let key = CacheKey::new("a.js", &["minified"], b"let a;");
        store.set(key.as_str(), b"{truncated").unwrap();

        let fresh = AssetData {
            path: "/a.min.js".into(),
            ..AssetData::default()
        };
        let data = cache.get_or_insert_with(&key, || Ok(fresh.clone())).unwrap();
        assert_eq!(data, fresh);
        assert_eq!(cache.load(&key), Some(fresh));
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let (_, cache) = cache();
        let key = CacheKey::new("a.js", &["minified"], b"let a;");
        let mut calls = 0;

        for _ in 0..2 {
            let data = cache
                .get_or_insert_with(&key, || {
                    calls += 1;
                    Ok(AssetData {
                        path: "/a.min.js".into(),
                        ..AssetData::default()
                    })
                })
                .unwrap();
            assert_eq!(data.path, "/a.min.js");
        }
        assert_eq!(calls, 1);
    }
}
