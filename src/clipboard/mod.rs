//! Clipboard gateway: plain-text read/write of the system clipboard.
//!
//! The orchestrator only ever talks to the [`ClipboardGateway`] trait:
//!
//! * [`SystemClipboard`]: the real OS clipboard, backed by `arboard`.
//! * [`MemoryClipboard`]: an in-process clipboard used by the pipeline tests.
//!
//! Reads treat "empty" and "not text" the same way (`None`).  Writes never
//! fail from the caller's point of view: the system gateway logs platform
//! errors and moves on.
//!
//! # Usage
//!
//! ```no_run
//! use ai_text_agent::clipboard::{ClipboardGateway, SystemClipboard};
//!
//! let clipboard = SystemClipboard::new().expect("clipboard thread");
//! if let Some(text) = clipboard.read() {
//!     clipboard.write(&text.to_uppercase());
//! }
//! ```

pub mod memory;
pub mod system;

pub use memory::MemoryClipboard;
pub use system::SystemClipboard;

use thiserror::Error;

// ---------------------------------------------------------------------------
// ClipboardError
// ---------------------------------------------------------------------------

/// Errors raised by the OS clipboard.  These never leave the gateway; they
/// are logged at the point of failure.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Could not open the system clipboard.
    #[error("cannot access clipboard: {0}")]
    Access(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    Set(String),
}

// ---------------------------------------------------------------------------
// ClipboardGateway
// ---------------------------------------------------------------------------

/// Synchronous access to a text clipboard.
///
/// Calls may block on the OS.  Implementors must be `Send + Sync` because the
/// orchestrator runs every call on the blocking thread pool.
pub trait ClipboardGateway: Send + Sync {
    /// Current clipboard text, or `None` when the clipboard is empty or holds
    /// non-text data.
    fn read(&self) -> Option<String>;

    /// Replace the clipboard contents with `text`.
    fn write(&self, text: &str);
}

/// Short prefix of `text` for log lines.  Never splits a UTF-8 sequence.
pub(crate) fn preview(text: &str) -> String {
    const MAX_CHARS: usize = 50;
    let mut out: String = text.chars().take(MAX_CHARS).collect();
    if text.chars().nth(MAX_CHARS).is_some() {
        out.push_str("...");
    }
    out
}
