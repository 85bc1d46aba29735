//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted while indexing folders and importing pictures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Folder listing and indexing events
    Scan(ScanEvent),
    /// Per-asset import events
    Import(ImportEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events while listing and indexing a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Listing of a folder has started
    Started { folder: PathBuf },
    /// A candidate file was found
    FileFound { path: PathBuf },
    /// Progress update while fingerprinting the folder
    Progress(ScanProgress),
    /// A picture code was taken from the cache
    CacheHit { path: PathBuf },
    /// A file has the same picture code as one indexed before it
    DuplicateFound { path: PathBuf, existing: PathBuf },
    /// A file could not be used, indexing continues
    Error { path: PathBuf, message: String },
    /// Indexing of the folder completed
    Completed {
        pictures: usize,
        duplicates: usize,
        failures: usize,
    },
}

/// Progress information while indexing a folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Files processed so far
    pub completed: usize,
    /// Files to process
    pub total: usize,
    /// File being processed
    pub current_path: PathBuf,
    /// Number of cache hits so far
    pub cache_hits: usize,
}

/// Events while importing source assets into the target folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ImportEvent {
    /// Import has started
    Started { total_assets: usize },
    /// Progress update
    Progress(ImportProgress),
    /// A new picture was copied (or would be, in a dry run)
    Copied { from: PathBuf, to: PathBuf },
    /// An asset shows a picture the target already has
    Skipped {
        path: PathBuf,
        existing: PathBuf,
        similarity: f64,
    },
    /// An asset decoded but did not pass the picture filter
    Rejected { path: PathBuf, reason: String },
    /// An asset could not be processed, import continues
    Error { path: PathBuf, message: String },
    /// Import completed
    Completed { copied: usize, skipped: usize },
}

/// Progress information while importing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Assets processed so far
    pub completed: usize,
    /// Assets to process
    pub total: usize,
    /// Asset being processed
    pub current_path: PathBuf,
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the import pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    IndexingTarget,
    ScanningSource,
    Importing,
}

/// Summary of an import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Pictures in the target catalog before the import
    pub target_pictures: usize,
    /// Files found in the source folder
    pub source_files: usize,
    /// Pictures copied into the target
    pub copied: usize,
    /// Assets already present in the target
    pub skipped: usize,
    /// Assets refused by the picture filter
    pub rejected: usize,
    /// Assets that could not be processed
    pub failed: usize,
    /// Whether files were actually copied
    pub dry_run: bool,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::IndexingTarget => write!(f, "Indexing target"),
            PipelinePhase::ScanningSource => write!(f, "Scanning source"),
            PipelinePhase::Importing => write!(f, "Importing"),
        }
    }
}
