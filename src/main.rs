//! # copy-spotlight-pics CLI
//!
//! Copies new Windows Spotlight wallpapers into a folder.
//!
//! ## Usage
//! ```bash
//! copy-spotlight-pics import ~/Pictures/Spotlight
//! copy-spotlight-pics import ~/Pictures/Spotlight --dry-run --verbose
//! ```

mod cli;

use spotlight_pics::Result;

fn main() -> Result<()> {
    spotlight_pics::init_tracing();
    cli::run()
}
