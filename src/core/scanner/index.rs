//! Fingerprinting the files of a folder into a catalog.

use super::{CandidateFile, FolderScanner, ScanConfig};
use crate::core::cache::{CacheBackend, CacheEntry};
use crate::core::catalog::{FolderCodes, Insertion};
use crate::core::codec::{Fingerprinter, PictureCode};
use crate::core::decode::{decode_file, PictureFilter};
use crate::error::{ScanError, SpotlightError};
use crate::events::{Event, EventSender, ScanEvent, ScanProgress};
use image::ImageFormat;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

/// A file with its picture code and basic properties
#[derive(Debug, Clone)]
pub struct CodedFile {
    pub path: PathBuf,
    pub code: PictureCode,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    /// Whether the code came from the cache
    pub from_cache: bool,
}

/// A file that decoded but was refused by the picture filter
#[derive(Debug, Clone, Serialize)]
pub struct RejectedPicture {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything learned from indexing one folder
#[derive(Debug, Default)]
pub struct FolderIndex {
    /// Catalog, duplicates and failures
    pub codes: FolderCodes,
    /// Files refused by the picture filter
    pub rejected: Vec<RejectedPicture>,
    /// Problems while listing the folder
    pub listing_errors: Vec<ScanError>,
    /// Number of files listed
    pub files: usize,
    /// Number of codes taken from the cache
    pub cache_hits: usize,
}

/// Picture code of one file, taken from the cache when still valid
///
/// Freshly computed codes are written back to the cache. Cache failures are
/// logged and never fail the file.
pub fn code_file(
    file: &CandidateFile,
    cache: &dyn CacheBackend,
    fingerprinter: &mut Fingerprinter,
) -> Result<CodedFile, SpotlightError> {
    match cache.get(&file.path, file.size, file.modified) {
        Ok(Some(entry)) => {
            debug!("Cache hit for {}", file.path.display());
            return Ok(CodedFile {
                path: file.path.clone(),
                code: entry.code,
                format: entry.format,
                width: entry.width,
                height: entry.height,
                from_cache: true,
            });
        }
        Ok(None) => {}
        Err(e) => warn!("Cache lookup failed for {}: {}", file.path.display(), e),
    }

    let picture = decode_file(&file.path)?;
    let code = fingerprinter.fingerprint(&picture.image)?;
    debug!("{} -> {}", file.path.display(), code);

    let coded = CodedFile {
        path: file.path.clone(),
        code,
        format: picture.format,
        width: picture.width(),
        height: picture.height(),
        from_cache: false,
    };

    let entry = CacheEntry {
        path: coded.path.clone(),
        code,
        format: coded.format,
        width: coded.width,
        height: coded.height,
        file_size: file.size,
        file_modified: file.modified,
        cached_at: SystemTime::now(),
    };
    if let Err(e) = cache.set(entry) {
        warn!("Failed to cache code for {}: {}", file.path.display(), e);
    }

    Ok(coded)
}

/// List a folder and fingerprint every accepted picture into a catalog
///
/// Files are processed in name order. Exact code duplicates keep the first
/// file; undecodable and filtered files are reported and skipped.
pub fn index_folder(
    folder: &Path,
    config: &ScanConfig,
    filter: &PictureFilter,
    cache: &dyn CacheBackend,
    events: &EventSender,
) -> Result<FolderIndex, ScanError> {
    let listing = FolderScanner::new(config.clone()).scan_with_events(folder, events)?;

    let total = listing.files.len();
    let mut index = FolderIndex {
        listing_errors: listing.errors,
        files: total,
        ..FolderIndex::default()
    };
    let mut fingerprinter = Fingerprinter::new();

    for (i, file) in listing.files.iter().enumerate() {
        events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
            completed: i,
            total,
            current_path: file.path.clone(),
            cache_hits: index.cache_hits,
        })));

        let coded = match code_file(file, cache, &mut fingerprinter) {
            Ok(coded) => coded,
            Err(e) => {
                events.send(Event::Scan(ScanEvent::Error {
                    path: file.path.clone(),
                    message: e.to_string(),
                }));
                index.codes.add_failure(file.path.clone(), e.to_string());
                continue;
            }
        };

        if coded.from_cache {
            index.cache_hits += 1;
            events.send(Event::Scan(ScanEvent::CacheHit {
                path: file.path.clone(),
            }));
        }

        if let Err(reason) = filter.check_properties(coded.format, coded.width) {
            debug!("Ignoring {}: {}", file.path.display(), reason);
            index.rejected.push(RejectedPicture {
                path: coded.path,
                reason: reason.to_string(),
            });
            continue;
        }

        if let Insertion::Duplicate { existing } = index.codes.add_code(coded.path, coded.code) {
            events.send(Event::Scan(ScanEvent::DuplicateFound {
                path: file.path.clone(),
                existing,
            }));
        }
    }

    events.send(Event::Scan(ScanEvent::Completed {
        pictures: index.codes.catalog.len(),
        duplicates: index.codes.duplicates.len(),
        failures: index.codes.failures.len(),
    }));

    Ok(index)
}
