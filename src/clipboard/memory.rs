//! In-process clipboard.
//!
//! Behaves like the system clipboard (empty text reads as `None`) and counts
//! writes, which the pipeline tests use to prove the clipboard was left alone.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use super::ClipboardGateway;

#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Mutex<Option<String>>,
    writes: AtomicUsize,
}

impl MemoryClipboard {
    /// An empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard pre-loaded with `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Mutex::new(Some(text.into())),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current contents, including an empty string if one was written.
    pub fn contents(&self) -> Option<String> {
        self.text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of [`ClipboardGateway::write`] calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl ClipboardGateway for MemoryClipboard {
    fn read(&self) -> Option<String> {
        self.contents().filter(|text| !text.is_empty())
    }

    fn write(&self, text: &str) {
        *self
            .text
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(text.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}
