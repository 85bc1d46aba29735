//! # Catalog Module
//!
//! An insertion-ordered collection of previously seen pictures.
//!
//! ## Two Kinds of Equality
//! - **Insert** uses exact code equality: two files of one folder with the
//!   very same code are collapsed, the first one seen wins
//! - **Lookup** ([`Catalog::find_match`]) is fuzzy and goes through the matcher
//!
//! Switching insert to the fuzzy rule would also drop near-identical files of
//! one folder, changing which files are reported as duplicates.

mod entry;
mod scan;

pub use entry::CatalogEntry;
pub use scan::{scan_folder_codes, DuplicatePicture, FailedPicture, FolderCodes};

use crate::core::codec::PictureCode;
use crate::core::matcher;
use crate::error::CatalogError;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of inserting an entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The entry was appended
    Added,
    /// An entry with the same code exists; the new one was discarded
    Duplicate { existing: PathBuf },
}

/// Append-only collection of catalog entries
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_code: HashMap<PictureCode, usize>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalog has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Entry with exactly this code, if any
    pub fn get_exact(&self, code: &PictureCode) -> Option<&CatalogEntry> {
        self.by_code.get(code).map(|&index| &self.entries[index])
    }

    /// Append an entry unless one with the exact same code is present
    pub fn insert(&mut self, entry: CatalogEntry) -> Insertion {
        if let Some(existing) = self.get_exact(entry.code()) {
            return Insertion::Duplicate {
                existing: existing.path().to_path_buf(),
            };
        }

        self.by_code.insert(*entry.code(), self.entries.len());
        self.entries.push(entry);
        Insertion::Added
    }

    /// First entry showing the same picture as `code`
    pub fn find_match(&self, code: &PictureCode) -> Option<&CatalogEntry> {
        matcher::find_match(code, self)
    }

    /// True when an entry shows the same picture as `code`
    pub fn exists(&self, code: &PictureCode) -> bool {
        matcher::exists(code, self)
    }

    /// Write the catalog as a JSON array, in insertion order
    pub fn save_json(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            CatalogError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        fs::write(path, json).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Read a catalog written by [`Catalog::save_json`]
    ///
    /// Entries go through [`Catalog::insert`], so exact duplicates in the
    /// file are dropped.
    pub fn load_json(path: &Path) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let entries: Vec<CatalogEntry> =
            serde_json::from_str(&json).map_err(|e| CatalogError::Malformed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let mut catalog = Catalog::new();
        for entry in entries {
            catalog.insert(CatalogEntry::new(*entry.code(), entry.path()));
        }
        Ok(catalog)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn code(rows: u64) -> PictureCode {
        PictureCode::from_segments(rows, !rows)
    }

    #[test]
    fn insert_keeps_insertion_order() {
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code(3), "/c.jpg"));
        catalog.insert(CatalogEntry::new(code(1), "/a.jpg"));
        catalog.insert(CatalogEntry::new(code(2), "/b.jpg"));

        let paths: Vec<_> = catalog.iter().map(|e| e.path().to_path_buf()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/c.jpg"),
                PathBuf::from("/a.jpg"),
                PathBuf::from("/b.jpg")
            ]
        );
    }

    #[test]
    fn insert_rejects_exact_duplicate_and_keeps_first() {
        let mut catalog = Catalog::new();

        assert_eq!(catalog.insert(CatalogEntry::new(code(7), "/first.jpg")), Insertion::Added);
        assert_eq!(
            catalog.insert(CatalogEntry::new(code(7), "/second.jpg")),
            Insertion::Duplicate {
                existing: PathBuf::from("/first.jpg")
            }
        );

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get_exact(&code(7)).unwrap().path(), Path::new("/first.jpg"));
    }

    #[test]
    fn insert_accepts_near_duplicate() {
        // One flipped bit matches fuzzily but is not an exact duplicate
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code(0b1000), "/a.jpg"));
        let near = PictureCode::from_segments(0b1001, !0b1000);

        assert_eq!(catalog.insert(CatalogEntry::new(near, "/b.jpg")), Insertion::Added);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.exists(&near));
    }

    #[test]
    fn find_match_delegates_to_fuzzy_lookup() {
        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code(0), "/zero.jpg"));

        let near = PictureCode::from_segments(0b11, u64::MAX);
        assert_eq!(catalog.find_match(&near).unwrap().path(), Path::new("/zero.jpg"));
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.json");

        let mut catalog = Catalog::new();
        catalog.insert(CatalogEntry::new(code(9), "/nine.jpg"));
        catalog.insert(CatalogEntry::new(code(4), "/four.jpg"));
        catalog.save_json(&file).unwrap();

        let loaded = Catalog::load_json(&file).unwrap();
        let codes: Vec<_> = loaded.iter().map(|e| *e.code()).collect();
        assert_eq!(codes, vec![code(9), code(4)]);
    }

    #[test]
    fn load_json_reports_malformed_codes() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("catalog.json");
        fs::write(&file, r#"[{"code": "0101", "path": "/x.jpg"}]"#).unwrap();

        assert!(matches!(
            Catalog::load_json(&file),
            Err(CatalogError::Malformed { .. })
        ));
    }
}
