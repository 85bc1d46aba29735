//! Storage interface shared by the cache backends.

use super::{CacheEntry, CacheStats};
use crate::error::CacheError;
use std::path::Path;
use std::time::SystemTime;

/// Where picture codes are remembered between runs
///
/// Backends are shared by reference across the indexing code, so they use
/// interior mutability.
pub trait CacheBackend: Send + Sync {
    /// Code stored for `path`, provided the file still has `size` bytes and
    /// was last written at `modified`
    fn get(
        &self,
        path: &Path,
        size: u64,
        modified: SystemTime,
    ) -> Result<Option<CacheEntry>, CacheError>;

    /// Store an entry; an older entry for the same path is replaced
    fn set(&self, entry: CacheEntry) -> Result<(), CacheError>;

    /// Forget everything
    fn clear(&self) -> Result<(), CacheError>;

    /// Entry count, covered bytes and entry age
    fn stats(&self) -> Result<CacheStats, CacheError>;

    /// Drop entries whose file has been deleted, returning how many went
    fn prune_orphans(&self) -> Result<usize, CacheError>;
}
