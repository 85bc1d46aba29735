//! Directory listing using walkdir.

use super::{filter::FileFilter, CandidateFile, ScanResult};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::fs;
use std::path::Path;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Configuration for the folder scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files
    pub include_hidden: bool,
    /// How deep to descend; 1 lists the folder itself only
    pub max_depth: usize,
    /// Extensions to include (None = any file)
    pub extensions: Option<Vec<String>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: false,
            max_depth: 1,
            extensions: None,
        }
    }
}

impl ScanConfig {
    /// Listing of a wallpaper collection: `.jpg`/`.jpeg` files only
    pub fn jpeg_files() -> Self {
        Self {
            extensions: Some(vec!["jpg".to_string(), "jpeg".to_string()]),
            ..Self::default()
        }
    }

    /// Listing of an asset folder: every file, extension or not
    pub fn any_file() -> Self {
        Self::default()
    }
}

/// Lists the files of one folder
pub struct FolderScanner {
    config: ScanConfig,
    filter: FileFilter,
}

impl FolderScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = FileFilter::new()
            .with_hidden(config.include_hidden)
            .with_extensions(config.extensions.clone());

        Self { config, filter }
    }

    /// List a folder
    pub fn scan(&self, folder: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(folder, &null_sender())
    }

    /// List a folder, reporting each file found
    ///
    /// Unreadable entries end up in [`ScanResult::errors`]; only a missing
    /// folder fails the whole call.
    pub fn scan_with_events(
        &self,
        folder: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        if !folder.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: folder.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            folder: folder.to_path_buf(),
        }));

        let mut result = ScanResult::default();

        let walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(self.config.max_depth.max(1))
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name();

        for entry_result in walker {
            match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() && !entry.path().is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !self.filter.should_include(path) {
                        continue;
                    }

                    match fs::metadata(path) {
                        Ok(metadata) => {
                            events.send(Event::Scan(ScanEvent::FileFound {
                                path: path.to_path_buf(),
                            }));

                            result.files.push(CandidateFile {
                                path: path.to_path_buf(),
                                size: metadata.len(),
                                modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                            });
                        }
                        Err(e) => {
                            let error = ScanError::ReadDirectory {
                                path: path.to_path_buf(),
                                source: e,
                            };
                            events.send(Event::Scan(ScanEvent::Error {
                                path: path.to_path_buf(),
                                message: error.to_string(),
                            }));
                            result.errors.push(error);
                        }
                    }
                }
                Err(e) => {
                    let path = e.path().map(|p| p.to_path_buf()).unwrap_or_default();

                    let error = if e.io_error().map(|e| e.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadDirectory {
                            path: path.clone(),
                            source: std::io::Error::other(e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));

                    result.errors.push(error);
                }
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventChannel;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = FolderScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_lists_extensionless_assets() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "9f86d081884c7d65");
        create_file(temp_dir.path(), "2c26b46b68ffc68f");

        let scanner = FolderScanner::new(ScanConfig::any_file());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 2);
        assert_eq!(result.files[0].size, 4);
    }

    #[test]
    fn scan_is_sorted_by_file_name() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "0003.jpg");
        create_file(temp_dir.path(), "0001.jpg");
        create_file(temp_dir.path(), "0002.jpg");

        let scanner = FolderScanner::new(ScanConfig::jpeg_files());
        let result = scanner.scan(temp_dir.path()).unwrap();

        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["0001.jpg", "0002.jpg", "0003.jpg"]);
    }

    #[test]
    fn jpeg_listing_skips_other_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "0001.jpg");
        create_file(temp_dir.path(), "desktop.ini");
        create_file(temp_dir.path(), "shot.png");

        let scanner = FolderScanner::new(ScanConfig::jpeg_files());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("0001.jpg"));
    }

    #[test]
    fn scan_does_not_descend_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("old");
        fs::create_dir(&subdir).unwrap();
        create_file(temp_dir.path(), "0001.jpg");
        create_file(&subdir, "0002.jpg");

        let scanner = FolderScanner::new(ScanConfig::jpeg_files());
        assert_eq!(scanner.scan(temp_dir.path()).unwrap().files.len(), 1);

        let deep = FolderScanner::new(ScanConfig {
            max_depth: 2,
            ..ScanConfig::jpeg_files()
        });
        assert_eq!(deep.scan(temp_dir.path()).unwrap().files.len(), 2);
    }

    #[test]
    fn scan_excludes_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "visible.jpg");
        create_file(temp_dir.path(), ".hidden.jpg");

        let scanner = FolderScanner::new(ScanConfig::jpeg_files());
        let result = scanner.scan(temp_dir.path()).unwrap();
        assert_eq!(result.files.len(), 1);

        let scanner = FolderScanner::new(ScanConfig {
            include_hidden: true,
            ..ScanConfig::jpeg_files()
        });
        assert_eq!(scanner.scan(temp_dir.path()).unwrap().files.len(), 2);
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = FolderScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_reports_found_files() {
        let temp_dir = TempDir::new().unwrap();
        create_file(temp_dir.path(), "0001.jpg");

        let (sender, receiver) = EventChannel::new();
        FolderScanner::new(ScanConfig::default())
            .scan_with_events(temp_dir.path(), &sender)
            .unwrap();
        drop(sender);

        let found = receiver
            .iter()
            .filter(|e| matches!(e, Event::Scan(ScanEvent::FileFound { .. })))
            .count();
        assert_eq!(found, 1);
    }
}
