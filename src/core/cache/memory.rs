//! In-memory cache backend.

use super::{CacheBackend, CacheEntry, CacheStats};
use crate::error::CacheError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

/// In-memory cache backend
///
/// Lives for one run; used when no cache file is wanted.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
}

impl InMemoryCache {
    /// Create a new in-memory cache
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<PathBuf, CacheEntry>>, CacheError> {
        self.entries.read().map_err(|_| CacheError::Corrupted {
            path: PathBuf::from("memory"),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<PathBuf, CacheEntry>>, CacheError> {
        self.entries.write().map_err(|_| CacheError::Corrupted {
            path: PathBuf::from("memory"),
        })
    }
}

impl CacheBackend for InMemoryCache {
    fn get(
        &self,
        path: &Path,
        current_size: u64,
        current_modified: SystemTime,
    ) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self
            .read()?
            .get(path)
            .filter(|entry| entry.is_valid_for(current_size, current_modified))
            .cloned())
    }

    fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        self.write()?.insert(entry.path.clone(), entry);
        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.write()?.clear();
        Ok(())
    }

    fn stats(&self) -> Result<CacheStats, CacheError> {
        let entries = self.read()?;

        Ok(CacheStats {
            total_entries: entries.len(),
            total_file_bytes: entries.values().map(|e| e.file_size).sum(),
            oldest_entry: entries.values().map(|e| e.cached_at).min(),
            newest_entry: entries.values().map(|e| e.cached_at).max(),
        })
    }

    fn prune_orphans(&self) -> Result<usize, CacheError> {
        let mut entries = self.write()?;

        let before = entries.len();
        entries.retain(|path, _| path.exists());
        Ok(before - entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::super::sample_entry;
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn cache_miss_returns_none() {
        let cache = InMemoryCache::new();
        let result = cache
            .get(Path::new("/nonexistent.jpg"), 1000, SystemTime::now())
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn cache_hit_returns_entry() {
        let cache = InMemoryCache::new();
        let entry = sample_entry("/wallpapers/0001.jpg");
        let modified = entry.file_modified;
        let code = entry.code;

        cache.set(entry).unwrap();

        let result = cache
            .get(Path::new("/wallpapers/0001.jpg"), 1000, modified)
            .unwrap();
        assert_eq!(result.unwrap().code, code);
    }

    #[test]
    fn modified_file_invalidates_cache() {
        let cache = InMemoryCache::new();
        let entry = sample_entry("/wallpapers/0001.jpg");
        let later = entry.file_modified + Duration::from_secs(60);

        cache.set(entry).unwrap();

        let result = cache
            .get(Path::new("/wallpapers/0001.jpg"), 1000, later)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn clear_removes_all_entries() {
        let cache = InMemoryCache::new();
        cache.set(sample_entry("/a.jpg")).unwrap();
        cache.set(sample_entry("/b.jpg")).unwrap();

        cache.clear().unwrap();

        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn stats_are_accurate() {
        let cache = InMemoryCache::new();
        cache.set(sample_entry("/a.jpg")).unwrap();
        cache.set(sample_entry("/b.jpg")).unwrap();

        let stats = cache.stats().unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_file_bytes, 2000);
        assert!(stats.oldest_entry.is_some());
    }

    #[test]
    fn prune_drops_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let kept = temp_dir.path().join("0001.jpg");
        std::fs::write(&kept, b"jpeg").unwrap();

        let cache = InMemoryCache::new();
        cache
            .set(CacheEntry {
                path: kept.clone(),
                ..sample_entry("/unused")
            })
            .unwrap();
        cache.set(sample_entry("/gone/0002.jpg")).unwrap();

        assert_eq!(cache.prune_orphans().unwrap(), 1);
        assert_eq!(cache.stats().unwrap().total_entries, 1);
    }
}
