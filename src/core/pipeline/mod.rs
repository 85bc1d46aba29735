//! # Pipeline Module
//!
//! Imports new pictures into a wallpaper collection.
//!
//! ## Pipeline Stages
//! 1. **Index target** - Fingerprint the collection (with caching)
//! 2. **Scan source** - List the asset folder, extension or not
//! 3. **Import** - Decode, filter and fingerprint each asset; copy it under
//!    the next free `NNNN.jpg` name unless the collection already shows the
//!    same picture
//!
//! Everything runs on the calling thread, one file at a time.

mod executor;
mod naming;

pub use executor::{
    default_spotlight_folder, CopiedPicture, ImportConfig, ImportPipeline, ImportPipelineBuilder,
    ImportResult, SkippedPicture, SPOTLIGHT_ASSETS_SUBPATH,
};
pub use naming::TargetNamer;
