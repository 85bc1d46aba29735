//! Import pipeline execution.

use super::naming::TargetNamer;
use crate::core::cache::{CacheBackend, InMemoryCache};
use crate::core::catalog::{CatalogEntry, DuplicatePicture, FailedPicture};
use crate::core::codec::{Fingerprinter, PictureCode};
use crate::core::decode::PictureFilter;
use crate::core::scanner::{code_file, index_folder, FolderScanner, RejectedPicture, ScanConfig};
use crate::error::{CopyError, ScanError, SpotlightError};
use crate::events::{
    null_sender, Event, EventSender, ImportEvent, ImportProgress, PipelineEvent, PipelinePhase,
    PipelineSummary,
};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Folder below the local application data directory where Windows keeps
/// Spotlight assets
pub const SPOTLIGHT_ASSETS_SUBPATH: [&str; 4] = [
    "Packages",
    "Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy",
    "LocalState",
    "Assets",
];

/// The Spotlight asset folder of the current user, if it can be resolved
pub fn default_spotlight_folder() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| {
        SPOTLIGHT_ASSETS_SUBPATH
            .iter()
            .fold(base, |path, part| path.join(part))
    })
}

/// A source asset copied into the target
#[derive(Debug, Clone, Serialize)]
pub struct CopiedPicture {
    pub from: PathBuf,
    pub to: PathBuf,
    pub code: PictureCode,
}

/// A source asset the target already has
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPicture {
    pub path: PathBuf,
    /// The target picture it matched
    pub existing: PathBuf,
    pub similarity: f64,
}

/// Result of an import run
#[derive(Debug, Default)]
pub struct ImportResult {
    /// Pictures in the target catalog before anything was copied
    pub target_pictures: usize,
    /// Target files with the same code as an earlier target file
    pub target_duplicates: Vec<DuplicatePicture>,
    /// Files found in the source folder
    pub source_files: usize,
    /// Assets copied (or planned, in a dry run)
    pub copied: Vec<CopiedPicture>,
    /// Assets already present in the target
    pub skipped: Vec<SkippedPicture>,
    /// Source assets refused by the picture filter
    pub rejected: Vec<RejectedPicture>,
    /// Files of either folder that could not be processed
    pub failures: Vec<FailedPicture>,
    /// Problems while listing either folder (non-fatal)
    pub errors: Vec<String>,
    /// Codes taken from the cache
    pub cache_hits: usize,
    /// Whether files were left uncopied on purpose
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Configuration for an import
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Folder holding the wallpaper collection
    pub target: PathBuf,
    /// Folder to import from
    pub source: PathBuf,
    /// How the target folder is listed
    pub target_scan: ScanConfig,
    /// Which target pictures go into the catalog
    pub target_filter: PictureFilter,
    /// How the source folder is listed
    pub source_scan: ScanConfig,
    /// Which source pictures are worth importing
    pub source_filter: PictureFilter,
    /// Do everything except copying
    pub dry_run: bool,
}

/// Builder for an import pipeline
pub struct ImportPipelineBuilder {
    target: Option<PathBuf>,
    source: Option<PathBuf>,
    target_scan: ScanConfig,
    target_filter: PictureFilter,
    source_scan: ScanConfig,
    source_filter: PictureFilter,
    dry_run: bool,
    cache: Option<Box<dyn CacheBackend>>,
}

impl ImportPipelineBuilder {
    /// Create a builder with the Spotlight defaults
    pub fn new() -> Self {
        Self {
            target: None,
            source: None,
            target_scan: ScanConfig::jpeg_files(),
            target_filter: PictureFilter::default(),
            source_scan: ScanConfig::any_file(),
            source_filter: PictureFilter::wallpapers(),
            dry_run: false,
            cache: None,
        }
    }

    /// Set the wallpaper collection folder
    pub fn target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Import from this folder instead of the Spotlight assets
    pub fn source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set which source pictures are imported
    pub fn source_filter(mut self, filter: PictureFilter) -> Self {
        self.source_filter = filter;
        self
    }

    /// Set which target pictures are catalogued
    pub fn target_filter(mut self, filter: PictureFilter) -> Self {
        self.target_filter = filter;
        self
    }

    /// Set how the target folder is listed
    pub fn target_scan(mut self, config: ScanConfig) -> Self {
        self.target_scan = config;
        self
    }

    /// Set how the source folder is listed
    pub fn source_scan(mut self, config: ScanConfig) -> Self {
        self.source_scan = config;
        self
    }

    /// Report what would be copied without copying
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the cache backend
    pub fn cache(mut self, cache: Box<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the pipeline
    ///
    /// Fails when no target was given, or when no source was given and the
    /// Spotlight folder cannot be resolved on this system.
    pub fn build(self) -> Result<ImportPipeline, SpotlightError> {
        let target = self
            .target
            .ok_or_else(|| SpotlightError::Config("no target folder given".to_string()))?;

        let source = match self.source {
            Some(source) => source,
            None => default_spotlight_folder().ok_or_else(|| {
                SpotlightError::Config(
                    "cannot locate the local application data folder; pass a source folder"
                        .to_string(),
                )
            })?,
        };

        Ok(ImportPipeline {
            config: ImportConfig {
                target,
                source,
                target_scan: self.target_scan,
                target_filter: self.target_filter,
                source_scan: self.source_scan,
                source_filter: self.source_filter,
                dry_run: self.dry_run,
            },
            cache: self.cache.unwrap_or_else(|| Box::new(InMemoryCache::new())),
        })
    }
}

impl Default for ImportPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies pictures the target folder does not have yet
pub struct ImportPipeline {
    config: ImportConfig,
    cache: Box<dyn CacheBackend>,
}

impl ImportPipeline {
    /// Create a new pipeline builder
    pub fn builder() -> ImportPipelineBuilder {
        ImportPipelineBuilder::new()
    }

    /// The resolved configuration
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Run the import without events
    pub fn run(&self) -> Result<ImportResult, SpotlightError> {
        self.run_with_events(&null_sender())
    }

    /// Run the import with event reporting
    pub fn run_with_events(&self, events: &EventSender) -> Result<ImportResult, SpotlightError> {
        events.send(Event::Pipeline(PipelineEvent::Started));

        let result = self.execute(events);

        match &result {
            Ok(result) => events.send(Event::Pipeline(PipelineEvent::Completed {
                summary: PipelineSummary {
                    target_pictures: result.target_pictures,
                    source_files: result.source_files,
                    copied: result.copied.len(),
                    skipped: result.skipped.len(),
                    rejected: result.rejected.len(),
                    failed: result.failures.len(),
                    dry_run: result.dry_run,
                    duration_ms: result.duration_ms,
                },
            })),
            Err(e) => events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            })),
        }

        result
    }

    fn execute(&self, events: &EventSender) -> Result<ImportResult, SpotlightError> {
        let start_time = Instant::now();
        let config = &self.config;

        let mut result = ImportResult {
            dry_run: config.dry_run,
            ..ImportResult::default()
        };

        // Phase 1: catalog of the target folder
        ensure_directory(&config.target)?;
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::IndexingTarget,
        }));

        let index = index_folder(
            &config.target,
            &config.target_scan,
            &config.target_filter,
            self.cache.as_ref(),
            events,
        )?;

        result.target_pictures = index.codes.catalog.len();
        result.target_duplicates = index.codes.duplicates;
        result.failures = index.codes.failures;
        result.cache_hits = index.cache_hits;
        result
            .errors
            .extend(index.listing_errors.iter().map(|e| e.to_string()));

        let mut catalog = index.codes.catalog;
        let mut namer = TargetNamer::for_directory(&config.target)?;

        // Phase 2: list the source folder
        ensure_directory(&config.source)?;
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::ScanningSource,
        }));

        let listing = FolderScanner::new(config.source_scan.clone())
            .scan_with_events(&config.source, events)?;
        result.source_files = listing.files.len();
        result
            .errors
            .extend(listing.errors.iter().map(|e| e.to_string()));

        // Phase 3: import
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Importing,
        }));
        events.send(Event::Import(ImportEvent::Started {
            total_assets: listing.files.len(),
        }));

        let total = listing.files.len();
        let mut fingerprinter = Fingerprinter::new();

        for (i, file) in listing.files.iter().enumerate() {
            events.send(Event::Import(ImportEvent::Progress(ImportProgress {
                completed: i,
                total,
                current_path: file.path.clone(),
            })));

            let coded = match code_file(file, self.cache.as_ref(), &mut fingerprinter) {
                Ok(coded) => coded,
                Err(e) => {
                    record_failure(&mut result, &file.path, e.to_string(), events);
                    continue;
                }
            };

            if coded.from_cache {
                result.cache_hits += 1;
            }

            if let Err(reason) = config
                .source_filter
                .check_properties(coded.format, coded.width)
            {
                debug!("Ignoring {}: {}", file.path.display(), reason);
                events.send(Event::Import(ImportEvent::Rejected {
                    path: file.path.clone(),
                    reason: reason.to_string(),
                }));
                result.rejected.push(RejectedPicture {
                    path: file.path.clone(),
                    reason: reason.to_string(),
                });
                continue;
            }

            if let Some(existing) = catalog.find_match(&coded.code) {
                let skipped = SkippedPicture {
                    path: file.path.clone(),
                    existing: existing.path().to_path_buf(),
                    similarity: existing.code().similarity(&coded.code),
                };
                info!(
                    "{} already exists as {}, skipped",
                    display_name(&skipped.path),
                    skipped.existing.display()
                );
                events.send(Event::Import(ImportEvent::Skipped {
                    path: skipped.path.clone(),
                    existing: skipped.existing.clone(),
                    similarity: skipped.similarity,
                }));
                result.skipped.push(skipped);
                continue;
            }

            let destination = namer.reserve()?;

            if !config.dry_run {
                if let Err(e) = copy_picture(&file.path, &destination) {
                    record_failure(&mut result, &file.path, e.to_string(), events);
                    continue;
                }
            }

            info!(
                "Copy {} to {}",
                display_name(&file.path),
                destination.display()
            );
            events.send(Event::Import(ImportEvent::Copied {
                from: file.path.clone(),
                to: destination.clone(),
            }));

            // Later assets of this run must not duplicate what was just added
            catalog.insert(CatalogEntry::new(coded.code, destination.clone()));
            result.copied.push(CopiedPicture {
                from: file.path.clone(),
                to: destination,
                code: coded.code,
            });
        }

        events.send(Event::Import(ImportEvent::Completed {
            copied: result.copied.len(),
            skipped: result.skipped.len(),
        }));

        result.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(result)
    }
}

fn record_failure(result: &mut ImportResult, path: &Path, message: String, events: &EventSender) {
    warn!("Skipping {}: {}", path.display(), message);
    events.send(Event::Import(ImportEvent::Error {
        path: path.to_path_buf(),
        message: message.clone(),
    }));
    result.failures.push(FailedPicture {
        path: path.to_path_buf(),
        message,
    });
}

fn ensure_directory(path: &Path) -> Result<(), ScanError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ScanError::DirectoryNotFound {
            path: path.to_path_buf(),
        })
    }
}

fn copy_picture(from: &Path, to: &Path) -> Result<(), CopyError> {
    fs::copy(from, to).map(|_| ()).map_err(|e| CopyError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    })
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
