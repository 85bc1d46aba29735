//! File filtering logic for the scanner.

use std::collections::HashSet;
use std::path::Path;

/// Decides which directory entries are candidate pictures
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    /// Lowercase extensions to accept; `None` accepts any file
    extensions: Option<HashSet<String>>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl FileFilter {
    /// Accept every non-hidden file, with or without an extension
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `.jpg` and `.jpeg` files only
    pub fn jpeg_files() -> Self {
        Self::new().with_extensions(Some(vec!["jpg".to_string(), "jpeg".to_string()]))
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Restrict to the given extensions, or lift the restriction with `None`
    pub fn with_extensions(mut self, extensions: Option<Vec<String>>) -> Self {
        self.extensions = extensions.map(|list| {
            list.into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect()
        });
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    return false;
                }
            }
        }

        match &self.extensions {
            None => true,
            Some(extensions) => path
                .extension()
                .and_then(|e| e.to_str())
                .map(|ext| extensions.contains(&ext.to_lowercase()))
                .unwrap_or(false),
        }
    }
}
