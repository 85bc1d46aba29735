//! # Spotlight Pics
//!
//! Collects the Windows Spotlight lock-screen wallpapers into a folder,
//! without copying the same picture twice.
//!
//! ## Picture Codes
//! Every picture is reduced to a 128-bit code describing how brightness
//! changes across a 9x9 thumbnail. Re-encoded or rescaled copies of a picture
//! get codes that differ in only a few bits, so two codes agreeing in more
//! than 95% of their positions are treated as the same picture.
//!
//! ## Architecture
//! - `core` - Codec, matcher, catalog and the import pipeline
//! - `events` - Progress reporting over channels
//! - `error` - Error types
//!
//! ## Example
//! ```rust,ignore
//! use spotlight_pics::core::{fingerprint, is_match};
//!
//! let a = fingerprint(&image::open("0001.jpg")?)?;
//! let b = fingerprint(&image::open("resaved.jpg")?)?;
//! assert!(is_match(&a, &b));
//! ```

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, SpotlightError};

/// Initialize tracing for the library
///
/// Reads the filter from `RUST_LOG`. Called once by the application entry
/// point; a second call leaves the first subscriber in place.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}
