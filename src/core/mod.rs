//! # Core Module
//!
//! The UI-agnostic picture matching engine.
//!
//! ## Modules
//! - `codec` - Computes picture codes
//! - `matcher` - Decides whether two codes show the same picture
//! - `catalog` - Collections of known pictures
//! - `decode` - Turns files into pixels
//! - `scanner` - Lists and indexes folders
//! - `cache` - Persists picture codes to avoid recomputation
//! - `pipeline` - Imports new pictures into a collection

pub mod cache;
pub mod catalog;
pub mod codec;
pub mod decode;
pub mod matcher;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry};
pub use codec::{fingerprint, PictureCode};
pub use matcher::{exists, find_match, is_match, similarity, MatchType};
pub use pipeline::{ImportPipeline, ImportResult};
