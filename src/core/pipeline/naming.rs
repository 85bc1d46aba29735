//! Numbered file names in the target folder.

use crate::core::scanner::{FolderScanner, ScanConfig};
use crate::error::{CopyError, ScanError};
use std::path::{Path, PathBuf};

/// Hands out `0001.jpg`, `0002.jpg`, ... names in one target folder
///
/// Numbering starts after the number of `.jpg` files already present. A name
/// that is taken is skipped, so nothing is ever overwritten. The counter lives
/// in this value and dies with it.
#[derive(Debug, Clone)]
pub struct TargetNamer {
    directory: PathBuf,
    next: u32,
}

impl TargetNamer {
    /// Start numbering after `existing` pictures
    pub fn new(directory: impl Into<PathBuf>, existing: usize) -> Self {
        Self {
            directory: directory.into(),
            next: u32::try_from(existing).unwrap_or(u32::MAX).saturating_add(1),
        }
    }

    /// Start numbering after the `.jpg` files of `directory`
    pub fn for_directory(directory: &Path) -> Result<Self, ScanError> {
        let config = ScanConfig {
            extensions: Some(vec!["jpg".to_string()]),
            ..ScanConfig::default()
        };
        let existing = FolderScanner::new(config).scan(directory)?.files.len();
        Ok(Self::new(directory, existing))
    }

    /// The number the next reservation will try first
    pub fn next_number(&self) -> u32 {
        self.next
    }

    /// File name for a number
    pub fn file_name(number: u32) -> String {
        format!("{:04}.jpg", number)
    }

    /// Reserve the next free name
    ///
    /// The name is not created; in a dry run nothing ever is, and later
    /// reservations still move on.
    pub fn reserve(&mut self) -> Result<PathBuf, CopyError> {
        loop {
            let number = self.next;
            self.next = number.checked_add(1).ok_or_else(|| CopyError::NoFreeName {
                directory: self.directory.clone(),
            })?;

            let candidate = self.directory.join(Self::file_name(number));
            if !candidate.exists() {
                return Ok(candidate);
            }
        }
    }
}
