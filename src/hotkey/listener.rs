//! Dedicated OS-thread hotkey listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`HotkeyListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! # Registration
//!
//! `rdev::listen` only returns when installing the hook fails.  `start`
//! therefore waits a short grace period: if the listener thread reports an
//! error in that window, registration failed and the error is returned;
//! otherwise the hook is considered installed.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Setting the stop flag
//! prevents events from being forwarded, but the OS thread itself will remain
//! blocked in the rdev event loop until the process exits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc as std_mpsc, Arc,
};
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::{ComboDetector, HotkeyError, KeyCombo, TriggerEvent};

/// How long `start` waits for the hook to fail before assuming success.
const REGISTRATION_GRACE: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// HotkeyListener
// ---------------------------------------------------------------------------

/// Handle to a running hotkey listener thread.
///
/// Construct one with [`HotkeyListener::start`].  Drop it to stop forwarding
/// events.
pub struct HotkeyListener {
    /// Shared stop flag, set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// The combination being watched.
    combo: KeyCombo,
    /// Never joined: `rdev::listen` does not return while the hook is alive.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn a dedicated OS thread that listens for global key events and
    /// sends a [`TriggerEvent`] on `tx` each time `combo` is pressed.
    ///
    /// Sending uses `try_send`: if the receiver is not keeping up, the
    /// trigger is dropped rather than stalling the OS event hook.
    ///
    /// # Errors
    ///
    /// [`HotkeyError::Spawn`] if the thread cannot be created,
    /// [`HotkeyError::Register`] if the global hook cannot be installed.
    pub fn start(combo: KeyCombo, tx: mpsc::Sender<TriggerEvent>) -> Result<Self, HotkeyError> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);
        let (failed_tx, failed_rx) = std_mpsc::channel::<String>();
        let mut detector = ComboDetector::new(combo.clone());

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    // Bail out if the listener has been stopped.
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }

                    if !detector.on_event(&event.event_type) {
                        return;
                    }

                    match tx.try_send(TriggerEvent::now()) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            log::debug!("hotkey-listener: trigger channel full, press dropped");
                        }
                        Err(TrySendError::Closed(_)) => {
                            log::debug!("hotkey-listener: trigger channel closed");
                        }
                    }
                });

                let reason = match result {
                    Ok(()) => "rdev::listen returned".to_string(),
                    Err(e) => format!("{e:?}"),
                };
                log::error!("hotkey-listener: exited: {reason}");
                let _ = failed_tx.send(reason);
            })
            .map_err(|e| HotkeyError::Spawn(e.to_string()))?;

        match failed_rx.recv_timeout(REGISTRATION_GRACE) {
            Ok(reason) => Err(HotkeyError::Register(reason)),
            Err(std_mpsc::RecvTimeoutError::Disconnected) => Err(HotkeyError::Register(
                "listener thread terminated during registration".into(),
            )),
            Err(std_mpsc::RecvTimeoutError::Timeout) => {
                log::info!("hotkey-listener: registered {combo}");
                Ok(Self {
                    stop,
                    combo,
                    _thread: thread,
                })
            }
        }
    }

    /// The combination this listener fires on.
    pub fn combo(&self) -> &KeyCombo {
        &self.combo
    }
}

impl Drop for HotkeyListener {
    /// Set the stop flag so the rdev callback stops forwarding events.
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        log::debug!("hotkey-listener: {} unregistered", self.combo);
    }
}
