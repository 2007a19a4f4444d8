//! System clipboard gateway backed by the `arboard` crate.
//!
//! One [`arboard::Clipboard`] handle is kept alive for the whole process on a
//! dedicated `clipboard-owner` thread.  On X11 and Wayland the written text
//! is served by that handle, so a short-lived handle would take the text
//! with it when no clipboard manager is running.  Keeping the handle on its
//! own thread also sidesteps `arboard::Clipboard` not being `Send` on every
//! platform.
//!
//! The handle is opened lazily on first use and reopened after an access
//! failure.

use std::sync::mpsc as std_mpsc;

use arboard::Clipboard;

use super::{preview, ClipboardError, ClipboardGateway};

type Reply<T> = std_mpsc::Sender<Result<T, ClipboardError>>;

enum Request {
    Read(Reply<Option<String>>),
    Write(String, Reply<()>),
}

/// The OS text clipboard.
///
/// Dropping the last `SystemClipboard` stops the owner thread, which drops
/// the handle (arboard then offers the contents to a clipboard manager).
pub struct SystemClipboard {
    requests: std_mpsc::Sender<Request>,
}

impl SystemClipboard {
    /// Spawn the clipboard owner thread.
    ///
    /// # Errors
    ///
    /// [`ClipboardError::Access`] if the thread cannot be created.
    pub fn new() -> Result<Self, ClipboardError> {
        let (requests, rx) = std_mpsc::channel::<Request>();
        std::thread::Builder::new()
            .name("clipboard-owner".into())
            .spawn(move || serve(rx))
            .map_err(|e| ClipboardError::Access(format!("cannot spawn clipboard thread: {e}")))?;
        Ok(Self { requests })
    }

    /// Read clipboard text, distinguishing "could not open" from "no text".
    pub fn try_read(&self) -> Result<Option<String>, ClipboardError> {
        let (reply, rx) = std_mpsc::channel();
        self.call(Request::Read(reply), rx)
    }

    /// Write `text` to the clipboard, replacing whatever was there.
    pub fn try_write(&self, text: &str) -> Result<(), ClipboardError> {
        let (reply, rx) = std_mpsc::channel();
        self.call(Request::Write(text.to_string(), reply), rx)
    }

    fn call<T>(
        &self,
        request: Request,
        rx: std_mpsc::Receiver<Result<T, ClipboardError>>,
    ) -> Result<T, ClipboardError> {
        let stopped = || ClipboardError::Access("clipboard thread stopped".into());
        self.requests.send(request).map_err(|_| stopped())?;
        rx.recv().map_err(|_| stopped())?
    }
}

impl ClipboardGateway for SystemClipboard {
    fn read(&self) -> Option<String> {
        match self.try_read() {
            Ok(Some(text)) => {
                log::debug!("clipboard: read {:?}", preview(&text));
                Some(text)
            }
            Ok(None) => {
                log::debug!("clipboard: empty or non-text");
                None
            }
            Err(e) => {
                log::warn!("clipboard: {e}");
                None
            }
        }
    }

    fn write(&self, text: &str) {
        match self.try_write(text) {
            Ok(()) => log::debug!("clipboard: wrote {:?}", preview(text)),
            Err(e) => log::warn!("clipboard: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Owner thread
// ---------------------------------------------------------------------------

/// Answer requests until every [`SystemClipboard`] sender is gone.
fn serve(requests: std_mpsc::Receiver<Request>) {
    let mut handle: Option<Clipboard> = None;

    while let Ok(request) = requests.recv() {
        match request {
            Request::Read(reply) => {
                let result = ensure_open(&mut handle, open_clipboard)
                    // `get_text` returns Err if empty or non-text; treat both as None
                    .map(|clipboard| clipboard.get_text().ok().filter(|text| !text.is_empty()));
                let _ = reply.send(result);
            }
            Request::Write(text, reply) => {
                let result = ensure_open(&mut handle, open_clipboard).and_then(|clipboard| {
                    clipboard
                        .set_text(text)
                        .map_err(|e| ClipboardError::Set(e.to_string()))
                });
                let _ = reply.send(result);
            }
        }
    }

    log::debug!("clipboard: owner thread exiting");
}

/// The open handle in `slot`, opening one with `open` if there is none yet.
fn ensure_open<T>(
    slot: &mut Option<T>,
    open: impl FnOnce() -> Result<T, ClipboardError>,
) -> Result<&mut T, ClipboardError> {
    if slot.is_none() {
        *slot = Some(open()?);
    }
    slot.as_mut()
        .ok_or_else(|| ClipboardError::Access("clipboard handle unavailable".into()))
}

/// Open an `arboard::Clipboard` handle, mapping the error to [`ClipboardError`].
fn open_clipboard() -> Result<Clipboard, ClipboardError> {
    Clipboard::new().map_err(|e| ClipboardError::Access(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_is_opened_once_and_reused() {
        let mut slot: Option<u32> = None;
        let mut opens = 0;

        for _ in 0..3 {
            let handle = ensure_open(&mut slot, || {
                opens += 1;
                Ok(7)
            })
            .unwrap();
            assert_eq!(*handle, 7);
        }
        assert_eq!(opens, 1);
    }

    #[test]
    fn failed_open_is_retried_on_next_call() {
        let mut slot: Option<u32> = None;

        let err = ensure_open(&mut slot, || Err(ClipboardError::Access("no display".into())));
        assert!(err.is_err());
        assert!(slot.is_none());

        assert_eq!(*ensure_open(&mut slot, || Ok(1)).unwrap(), 1);
    }

    #[test]
    fn calls_fail_cleanly_once_owner_thread_is_gone() {
        let (requests, rx) = std_mpsc::channel();
        drop(rx);
        let clipboard = SystemClipboard { requests };

        assert!(matches!(clipboard.try_read(), Err(ClipboardError::Access(_))));
        assert_eq!(clipboard.read(), None);
    }

    #[test]
    #[ignore = "needs a desktop session with a clipboard"]
    fn written_text_outlives_the_call() {
        let clipboard = SystemClipboard::new().unwrap();
        clipboard.write("ai-text-agent clipboard check");
        assert_eq!(
            clipboard.read().as_deref(),
            Some("ai-text-agent clipboard check")
        );
    }
}
