//! SQLite cache backend for persistent storage.

use super::{CacheBackend, CacheEntry, CacheStats};
use crate::core::codec::PictureCode;
use crate::error::CacheError;
use image::ImageFormat;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::warn;

/// SQLite-backed persistent cache
///
/// Uses WAL (Write-Ahead Logging) mode so readers are not blocked by writes.
pub struct SqliteCache {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

fn query_failed(e: rusqlite::Error) -> CacheError {
    CacheError::QueryFailed(e.to_string())
}

impl SqliteCache {
    /// Open or create a cache database at the given path
    pub fn open(path: &Path) -> Result<Self, CacheError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CacheError::OpenFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let conn = Connection::open(path).map_err(|e| CacheError::OpenFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .map_err(query_failed)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS picture_codes (
                path TEXT PRIMARY KEY,
                code TEXT NOT NULL,
                mime_type TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                file_size INTEGER NOT NULL,
                file_modified INTEGER NOT NULL,
                cached_at INTEGER NOT NULL
            )",
            [],
        )
        .map_err(query_failed)?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: path.to_path_buf(),
        })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn.lock().map_err(|_| CacheError::Corrupted {
            path: self.db_path.clone(),
        })
    }

    /// Convert SystemTime to Unix timestamp
    fn to_timestamp(time: SystemTime) -> i64 {
        time.duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_secs() as i64
    }

    /// Convert Unix timestamp to SystemTime
    fn from_timestamp(timestamp: i64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(timestamp.max(0) as u64)
    }
}

/// Raw row, before the code and format are parsed
struct StoredRow {
    code: String,
    mime_type: String,
    width: i64,
    height: i64,
    file_size: i64,
    file_modified: i64,
    cached_at: i64,
}

impl CacheBackend for SqliteCache {
    fn get(
        &self,
        path: &Path,
        current_size: u64,
        current_modified: SystemTime,
    ) -> Result<Option<CacheEntry>, CacheError> {
        let conn = self.lock()?;

        let path_str = path.to_string_lossy();

        let result = conn.query_row(
            "SELECT code, mime_type, width, height, file_size, file_modified, cached_at
             FROM picture_codes WHERE path = ?",
            [&path_str],
            |row| {
                Ok(StoredRow {
                    code: row.get(0)?,
                    mime_type: row.get(1)?,
                    width: row.get(2)?,
                    height: row.get(3)?,
                    file_size: row.get(4)?,
                    file_modified: row.get(5)?,
                    cached_at: row.get(6)?,
                })
            },
        );

        let row = match result {
            Ok(row) => row,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(query_failed(e)),
        };

        let parsed = (
            row.code.parse::<PictureCode>(),
            ImageFormat::from_mime_type(&row.mime_type),
        );
        let (code, format) = match parsed {
            (Ok(code), Some(format)) => (code, format),
            _ => {
                warn!("Ignoring unreadable cache row for {}", path.display());
                return Ok(None);
            }
        };

        let entry = CacheEntry {
            path: path.to_path_buf(),
            code,
            format,
            width: row.width as u32,
            height: row.height as u32,
            file_size: row.file_size as u64,
            file_modified: Self::from_timestamp(row.file_modified),
            cached_at: Self::from_timestamp(row.cached_at),
        };

        if entry.is_valid_for(current_size, current_modified) {
            Ok(Some(entry))
        } else {
            Ok(None)
        }
    }

    fn set(&self, entry: CacheEntry) -> Result<(), CacheError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR REPLACE INTO picture_codes
             (path, code, mime_type, width, height, file_size, file_modified, cached_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                entry.path.to_string_lossy(),
                entry.code.to_string(),
                entry.format.to_mime_type(),
                entry.width as i64,
                entry.height as i64,
                entry.file_size as i64,
                Self::to_timestamp(entry.file_modified),
                Self::to_timestamp(entry.cached_at),
            ],
        )
        .map_err(query_failed)?;

        Ok(())
    }

    fn clear(&self) -> Result<(), CacheError> {
        self.lock()?
            .execute("DELETE FROM picture_codes", [])
            .map_err(query_failed)?;
        Ok(())
    }

    fn stats(&self) -> Result<CacheStats, CacheError> {
        let conn = self.lock()?;

        let (total_entries, total_file_bytes, oldest, newest) = conn
            .query_row(
                "SELECT COUNT(*), COALESCE(SUM(file_size), 0), MIN(cached_at), MAX(cached_at)
                 FROM picture_codes",
                [],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, Option<i64>>(3)?,
                    ))
                },
            )
            .map_err(query_failed)?;

        Ok(CacheStats {
            total_entries: total_entries as usize,
            total_file_bytes: total_file_bytes as u64,
            oldest_entry: oldest.map(Self::from_timestamp),
            newest_entry: newest.map(Self::from_timestamp),
        })
    }

    fn prune_orphans(&self) -> Result<usize, CacheError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare("SELECT path FROM picture_codes")
            .map_err(query_failed)?;

        let paths: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .map_err(query_failed)?
            .filter_map(|r| r.ok())
            .collect();

        drop(stmt);

        let mut count = 0;
        for path in paths {
            if !Path::new(&path).exists() {
                conn.execute("DELETE FROM picture_codes WHERE path = ?", [&path])
                    .map_err(query_failed)?;
                count += 1;
            }
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::sample_entry;
    use super::*;
    use tempfile::TempDir;

    /// Entry whose mtime survives the trip through whole seconds
    fn stored_entry(path: &str) -> CacheEntry {
        let entry = sample_entry(path);
        let secs = SqliteCache::to_timestamp(entry.file_modified);
        CacheEntry {
            file_modified: SqliteCache::from_timestamp(secs),
            ..entry
        }
    }

    #[test]
    fn sqlite_cache_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("codes.db");

        let cache = SqliteCache::open(&db_path).unwrap();

        assert!(db_path.exists());
        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn sqlite_cache_stores_and_retrieves() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SqliteCache::open(&temp_dir.path().join("codes.db")).unwrap();

        let entry = stored_entry("/wallpapers/0001.jpg");
        let modified = entry.file_modified;
        let code = entry.code;
        cache.set(entry).unwrap();

        let found = cache
            .get(Path::new("/wallpapers/0001.jpg"), 1000, modified)
            .unwrap()
            .unwrap();

        assert_eq!(found.code, code);
        assert_eq!(found.format, ImageFormat::Jpeg);
        assert_eq!((found.width, found.height), (1920, 1080));
    }

    #[test]
    fn sqlite_cache_invalidates_on_modification() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SqliteCache::open(&temp_dir.path().join("codes.db")).unwrap();

        let entry = stored_entry("/wallpapers/0001.jpg");
        let later = entry.file_modified + Duration::from_secs(60);
        cache.set(entry).unwrap();

        let result = cache
            .get(Path::new("/wallpapers/0001.jpg"), 1000, later)
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn sqlite_cache_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("codes.db");

        let entry = stored_entry("/wallpapers/0001.jpg");
        let modified = entry.file_modified;
        SqliteCache::open(&db_path).unwrap().set(entry).unwrap();

        let reopened = SqliteCache::open(&db_path).unwrap();
        assert!(reopened
            .get(Path::new("/wallpapers/0001.jpg"), 1000, modified)
            .unwrap()
            .is_some());
    }

    #[test]
    fn sqlite_cache_clears_all() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SqliteCache::open(&temp_dir.path().join("codes.db")).unwrap();

        cache.set(stored_entry("/a.jpg")).unwrap();
        cache.set(stored_entry("/b.jpg")).unwrap();
        assert_eq!(cache.stats().unwrap().total_file_bytes, 2000);

        cache.clear().unwrap();

        assert_eq!(cache.stats().unwrap().total_entries, 0);
    }

    #[test]
    fn sqlite_cache_prunes_missing_files() {
        let temp_dir = TempDir::new().unwrap();
        let cache = SqliteCache::open(&temp_dir.path().join("codes.db")).unwrap();

        let kept = temp_dir.path().join("0001.jpg");
        std::fs::write(&kept, b"jpeg").unwrap();
        cache
            .set(CacheEntry {
                path: kept,
                ..stored_entry("/unused")
            })
            .unwrap();
        cache.set(stored_entry("/gone/0002.jpg")).unwrap();

        assert_eq!(cache.prune_orphans().unwrap(), 1);
        assert_eq!(cache.stats().unwrap().total_entries, 1);
    }
}
