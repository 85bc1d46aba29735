//! # Scanner Module
//!
//! Lists the candidate files of a folder and indexes them into a catalog.
//!
//! Spotlight assets have no extension, so the source folder is listed with
//! no extension filter and the format is decided after decoding. The target
//! folder only holds `.jpg` files.
//!
//! Listings are sorted by file name, so the same folder always yields the
//! same catalog order.

mod filter;
mod index;
mod walker;

pub use filter::FileFilter;
pub use index::{code_file, index_folder, CodedFile, FolderIndex, RejectedPicture};
pub use walker::{FolderScanner, ScanConfig};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// A file that may hold a picture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFile {
    /// Path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Last modified time
    pub modified: SystemTime,
}

/// Result of listing a folder
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Files that passed the filter, sorted by name
    pub files: Vec<CandidateFile>,
    /// Errors that occurred during listing (non-fatal)
    pub errors: Vec<ScanError>,
}
