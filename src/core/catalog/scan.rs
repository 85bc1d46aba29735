//! Building a catalog from the pictures of one folder.

use super::{Catalog, CatalogEntry, Insertion};
use crate::core::codec::{Fingerprinter, PictureCode};
use image::DynamicImage;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A file whose code was already in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicatePicture {
    /// The discarded file
    pub path: PathBuf,
    /// The file that was seen first with the same code
    pub existing: PathBuf,
}

/// A file that could not be fingerprinted
#[derive(Debug, Clone, Serialize)]
pub struct FailedPicture {
    /// The file that failed
    pub path: PathBuf,
    /// What went wrong
    pub message: String,
}

/// Catalog of one folder plus what was left out of it
#[derive(Debug, Default)]
pub struct FolderCodes {
    /// Entries in the order the files were processed
    pub catalog: Catalog,
    /// Files dropped because an identical code was seen before
    pub duplicates: Vec<DuplicatePicture>,
    /// Files that could not be fingerprinted
    pub failures: Vec<FailedPicture>,
}

impl FolderCodes {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fingerprinted file, using exact code equality
    pub fn add_code(&mut self, path: PathBuf, code: PictureCode) -> Insertion {
        let insertion = self.catalog.insert(CatalogEntry::new(code, path.clone()));

        if let Insertion::Duplicate { existing } = &insertion {
            warn!(
                "{} has the same picture code as {}",
                existing.display(),
                path.display()
            );
            self.duplicates.push(DuplicatePicture {
                path,
                existing: existing.clone(),
            });
        }

        insertion
    }

    /// Record a file that could not be fingerprinted
    pub fn add_failure(&mut self, path: PathBuf, message: impl Into<String>) {
        let message = message.into();
        warn!("Skipping {}: {}", path.display(), message);
        self.failures.push(FailedPicture { path, message });
    }
}

/// Fingerprint already-decoded pictures and collect them into a catalog.
///
/// Pictures are processed in the given order. A picture whose code equals
/// one seen earlier is reported in `duplicates` and left out; a picture that
/// cannot be fingerprinted is reported in `failures`. Neither stops the scan.
pub fn scan_folder_codes<'a, P, I>(pictures: I) -> FolderCodes
where
    P: Into<PathBuf>,
    I: IntoIterator<Item = (P, &'a DynamicImage)>,
{
    let mut fingerprinter = Fingerprinter::new();
    let mut result = FolderCodes::new();

    for (path, image) in pictures {
        let path = path.into();
        match fingerprinter.fingerprint(image) {
            Ok(code) => {
                debug!("{} -> {}", path.display(), code);
                result.add_code(path, code);
            }
            Err(e) => result.add_failure(path, e.to_string()),
        }
    }

    result
}
