//! # Cache Module
//!
//! Remembers picture codes so an unchanged wallpaper collection is not
//! decoded again on every import.
//!
//! An entry is only used while the file keeps the size and modification time
//! (whole seconds) it had when the code was computed.
//!
//! ## Backends
//! - `SqliteCache` - Persistent storage using SQLite
//! - `InMemoryCache` - Per-run storage, and for testing

mod memory;
mod sqlite;
mod traits;

pub use memory::InMemoryCache;
pub use sqlite::SqliteCache;
pub use traits::CacheBackend;

use crate::core::codec::PictureCode;
use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// A cached picture code
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Path to the picture
    pub path: PathBuf,
    /// The computed code
    pub code: PictureCode,
    /// Format the picture was stored in
    pub format: ImageFormat,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// File size at time of fingerprinting
    pub file_size: u64,
    /// File modification time at time of fingerprinting
    pub file_modified: SystemTime,
    /// When the entry was cached
    pub cached_at: SystemTime,
}

impl CacheEntry {
    /// Check if this entry is still valid for a file
    pub fn is_valid_for(&self, file_size: u64, file_modified: SystemTime) -> bool {
        // SQLite stores seconds
        self.file_size == file_size && unix_seconds(self.file_modified) == unix_seconds(file_modified)
    }
}

fn unix_seconds(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Cache statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of entries
    pub total_entries: usize,
    /// Combined size of the fingerprinted files in bytes
    pub total_file_bytes: u64,
    /// Oldest entry timestamp
    pub oldest_entry: Option<SystemTime>,
    /// Newest entry timestamp
    pub newest_entry: Option<SystemTime>,
}

/// Where the CLI keeps its cache unless told otherwise
pub fn default_cache_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotlight-pics")
        .join("codes.db")
}

#[cfg(test)]
pub(crate) fn sample_entry(path: &str) -> CacheEntry {
    let now = SystemTime::now();
    CacheEntry {
        path: PathBuf::from(path),
        code: PictureCode::from_segments(0xDEAD_BEEF, 0xF00D),
        format: ImageFormat::Jpeg,
        width: 1920,
        height: 1080,
        file_size: 1000,
        file_modified: now,
        cached_at: now,
    }
}
