//! # Events Module
//!
//! Progress reporting for long folder scans and imports.
//!
//! The core emits events through a channel; the CLI drains them on its own
//! thread to drive progress bars. Library callers that do not care pass
//! [`null_sender`].
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Import(ImportEvent::Copied { to, .. }) = event {
//!             println!("new wallpaper {}", to.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
