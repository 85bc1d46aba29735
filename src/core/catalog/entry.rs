//! A single catalog entry.

use crate::core::codec::PictureCode;
use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A picture code paired with the file it was computed from.
///
/// Two entries are equal when their codes are equal, wherever they live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    code: PictureCode,
    path: PathBuf,
}

impl CatalogEntry {
    /// Create an entry; surrounding whitespace is trimmed from the path
    pub fn new(code: PictureCode, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let path = match path.to_str() {
            Some(text) if text.trim() != text => PathBuf::from(text.trim()),
            _ => path,
        };
        Self { code, path }
    }

    /// Create an entry from the text form of a code
    pub fn parse(code: &str, path: impl Into<PathBuf>) -> Result<Self, CodecError> {
        Ok(Self::new(code.parse()?, path))
    }

    /// The picture code
    pub fn code(&self) -> &PictureCode {
        &self.code
    }

    /// Where the picture lives
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PartialEq for CatalogEntry {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for CatalogEntry {}

impl Hash for CatalogEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}
