//! # Error Module
//!
//! Error types for the Spotlight picture collector.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Per-file failures stay per-file** - a broken asset never aborts a scan

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum SpotlightError {
    #[error("Fingerprint error: {0}")]
    Codec(#[from] CodecError),

    #[error("Comparison error: {0}")]
    Match(#[from] MatchError),

    #[error("Decoding error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised by the fingerprint codec
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Resampling failed: {0}")]
    ResampleFailed(String),
}

impl CodecError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        CodecError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Errors raised when comparing picture codes
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Errors that occur while turning file bytes into pixels
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Failed to read image file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported or unrecognised image format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to decode image {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
}

/// Errors that occur while listing a folder
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur with the picture code cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to open cache database at {path}: {reason}")]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Database query failed: {0}")]
    QueryFailed(String),

    #[error("Cache corruption detected at {path}. Delete this file and try again.")]
    Corrupted { path: PathBuf },
}

/// Errors that occur while copying a picture into the target folder
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to copy {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No free file name left in {directory}")]
    NoFreeName { directory: PathBuf },
}

/// Errors that occur while saving or loading a catalog file
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to access catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog file {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, SpotlightError>;
