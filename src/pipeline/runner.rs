//! Pipeline orchestrator: drives the trigger → capture → transform →
//! publish → status loop.
//!
//! [`PipelineOrchestrator`] is an actor: one tokio task owns the clipboard
//! writes and the [`StatusIndicator`], and everything that completes later
//! (transform calls, revert timers) reports back to it as a
//! [`PipelineEvent`] over an internal channel.  Background tasks never touch
//! the clipboard or the status directly.
//! Clipboard calls go through `spawn_blocking` and are awaited in place, so
//! a slow OS clipboard never stalls a runtime worker.
//!
//! # Cycle flow
//!
//! ```text
//! TriggerEvent
//!   ├─ cycle in flight      → dropped
//!   ├─ clipboard empty      → Error("Empty clipboard")
//!   └─ clipboard has text   → Processing, spawn transform
//!         └─ TransformFinished
//!               ├─ Ok(text) → write clipboard, Done   (revert after 3 s)
//!               └─ Err(e)   → Error(e)                (revert after 5 s)
//! ```
//!
//! Triggers are polled before internal events, so every trigger that is
//! queued while a cycle is unreconciled is dropped, independent of task
//! scheduling.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::clipboard::{preview, ClipboardGateway};
use crate::config::StatusConfig;
use crate::hotkey::TriggerEvent;
use crate::status::{RevertTimer, StatusIndicator, StatusSnapshot, StatusState};
use crate::transform::{TextTransformer, TransformError};

// ---------------------------------------------------------------------------
// CycleError
// ---------------------------------------------------------------------------

/// Why a cycle ended in `Error`.  The `Display` text is the status detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CycleError {
    /// Nothing (or nothing textual) on the clipboard.  No request is made.
    #[error("Empty clipboard")]
    EmptyClipboard,

    /// The transform call failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The transform or a clipboard task panicked or was cancelled.
    #[error("internal error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// PipelineEvent
// ---------------------------------------------------------------------------

/// Completions delivered back to the orchestrator task.
#[derive(Debug)]
pub enum PipelineEvent {
    /// The transform call of `cycle` finished.
    TransformFinished {
        cycle: u64,
        result: Result<String, CycleError>,
    },
    /// A revert timer stamped with `generation` fired.
    RevertDue { generation: u64 },
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives the clipboard transform pipeline.
///
/// Create with [`PipelineOrchestrator::new`], grab a status receiver with
/// [`subscribe`](Self::subscribe), then call [`run`](Self::run) inside a
/// tokio task.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ai_text_agent::clipboard::SystemClipboard;
/// use ai_text_agent::config::AppConfig;
/// use ai_text_agent::pipeline::PipelineOrchestrator;
/// use ai_text_agent::transform::GeminiClient;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let orchestrator = PipelineOrchestrator::new(
///     Arc::new(SystemClipboard::new().expect("clipboard thread")),
///     Arc::new(GeminiClient::from_config(&config.transform)),
///     &config.status,
/// );
/// let status_rx = orchestrator.subscribe();
///
/// let (trigger_tx, trigger_rx) = tokio::sync::mpsc::channel(16);
/// tokio::spawn(orchestrator.run(trigger_rx));
/// # drop((status_rx, trigger_tx));
/// # }
/// ```
pub struct PipelineOrchestrator {
    clipboard: Arc<dyn ClipboardGateway>,
    transformer: Arc<dyn TextTransformer>,
    status: StatusIndicator,
    /// Id of the cycle whose transform has not been reconciled yet.
    in_flight: Option<u64>,
    cycles_started: u64,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator with the status in `Idle`.
    pub fn new(
        clipboard: Arc<dyn ClipboardGateway>,
        transformer: Arc<dyn TextTransformer>,
        status_config: &StatusConfig,
    ) -> Self {
        Self {
            clipboard,
            transformer,
            status: StatusIndicator::new(status_config),
            in_flight: None,
            cycles_started: 0,
        }
    }

    /// Observe status changes.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.subscribe()
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until `trigger_rx` is closed and the in-flight cycle (if any) has
    /// finished.  Pending status reverts are abandoned at that point.
    pub async fn run(mut self, mut trigger_rx: mpsc::Receiver<TriggerEvent>) {
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<PipelineEvent>();
        let mut triggers_open = true;

        log::info!("pipeline: orchestrator started");

        loop {
            if !triggers_open && self.in_flight.is_none() {
                break;
            }

            tokio::select! {
                biased;

                trigger = trigger_rx.recv(), if triggers_open => match trigger {
                    Some(trigger) => self.handle_trigger(trigger, &events_tx).await,
                    None => {
                        log::info!("pipeline: trigger channel closed");
                        triggers_open = false;
                    }
                },
                Some(event) = events_rx.recv() => self.handle_event(event, &events_tx).await,
            }
        }

        log::info!("pipeline: orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    /// Start a cycle: capture the clipboard and dispatch the transform.
    ///
    /// The clipboard read runs on the blocking pool but is awaited here, so
    /// the next trigger is not looked at until this cycle is in flight.
    async fn handle_trigger(
        &mut self,
        trigger: TriggerEvent,
        events: &mpsc::UnboundedSender<PipelineEvent>,
    ) {
        if let Some(cycle) = self.in_flight {
            log::debug!("pipeline: cycle {cycle} in flight, trigger dropped");
            return;
        }

        self.cycles_started += 1;
        let cycle = self.cycles_started;
        log::info!(
            "pipeline: cycle {cycle} triggered ({:?} after key press)",
            trigger.at.elapsed()
        );

        // ── 1. Capture (spawn_blocking) ─────────────────────────────────
        let clipboard = Arc::clone(&self.clipboard);
        let captured = match tokio::task::spawn_blocking(move || clipboard.read()).await {
            Ok(Some(text)) if !text.is_empty() => text,
            Ok(_) => {
                self.finish(cycle, Err(CycleError::EmptyClipboard), events);
                return;
            }
            Err(e) => {
                let e = CycleError::Internal(format!("clipboard read failed: {e}"));
                self.finish(cycle, Err(e), events);
                return;
            }
        };
        log::debug!("pipeline: cycle {cycle} captured {:?}", preview(&captured));

        // ── 2. Processing + transform off the orchestrator task ────────
        self.status.set_state(StatusState::Processing);
        self.in_flight = Some(cycle);

        let transformer = Arc::clone(&self.transformer);
        let events = events.clone();
        tokio::spawn(async move {
            let call = tokio::spawn(async move { transformer.transform(&captured).await });
            let result = match call.await {
                Ok(result) => result.map_err(CycleError::from),
                Err(e) => Err(CycleError::Internal(e.to_string())),
            };
            let _ = events.send(PipelineEvent::TransformFinished { cycle, result });
        });
    }

    /// Reconcile a completion or a timer.
    async fn handle_event(
        &mut self,
        event: PipelineEvent,
        events: &mpsc::UnboundedSender<PipelineEvent>,
    ) {
        match event {
            PipelineEvent::TransformFinished { cycle, result } => {
                if self.in_flight != Some(cycle) {
                    log::warn!("pipeline: result for unknown cycle {cycle} ignored");
                    return;
                }
                self.in_flight = None;

                // ── 3. Publish (success only, spawn_blocking) ───────────
                let outcome = match result {
                    Ok(text) => self.publish(text).await,
                    Err(e) => Err(e),
                };
                self.finish(cycle, outcome, events);
            }
            PipelineEvent::RevertDue { generation } => {
                self.status.revert_if_current(generation);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Write `text` to the clipboard on the blocking pool.
    async fn publish(&self, text: String) -> Result<String, CycleError> {
        let clipboard = Arc::clone(&self.clipboard);
        let written = text.clone();
        tokio::task::spawn_blocking(move || clipboard.write(&written))
            .await
            .map(|()| text)
            .map_err(|e| CycleError::Internal(format!("clipboard write failed: {e}")))
    }

    /// ── 4. Terminal status for `cycle`, plus its revert timer.
    fn finish(
        &mut self,
        cycle: u64,
        outcome: Result<String, CycleError>,
        events: &mpsc::UnboundedSender<PipelineEvent>,
    ) {
        let next = match outcome {
            Ok(text) => {
                log::info!(
                    "pipeline: cycle {cycle} done, {:?} copied to clipboard",
                    preview(&text)
                );
                StatusState::Done
            }
            Err(e) => {
                match &e {
                    CycleError::EmptyClipboard => log::warn!("pipeline: cycle {cycle}: {e}"),
                    CycleError::Transform(TransformError::Transport(detail))
                    | CycleError::Transform(TransformError::MalformedResponse(detail)) => {
                        log::error!("pipeline: cycle {cycle} failed: {e}: {detail}")
                    }
                    _ => log::error!("pipeline: cycle {cycle} failed: {e}"),
                }
                StatusState::Error(e.to_string())
            }
        };

        if let Some(timer) = self.status.set_state(next) {
            schedule_revert(timer, events.clone());
        }
    }
}

/// Post `RevertDue` back to the orchestrator once `timer.delay` has elapsed.
fn schedule_revert(timer: RevertTimer, events: mpsc::UnboundedSender<PipelineEvent>) {
    let deadline = Instant::now() + timer.delay;
    tokio::spawn(async move {
        tokio::time::sleep_until(deadline).await;
        let _ = events.send(PipelineEvent::RevertDue {
            generation: timer.generation,
        });
    });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use mockito::{Matcher, Server};
    use tokio::sync::Notify;

    use crate::clipboard::MemoryClipboard;
    use crate::config::TransformConfig;
    use crate::transform::{ApiCredential, GeminiClient};

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    /// Returns a fixed reply, counts calls, and optionally waits on a gate
    /// before answering.
    struct ScriptedTransformer {
        reply: Result<String, TransformError>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedTransformer {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.into()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn err(e: TransformError) -> Self {
            Self {
                reply: Err(e),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextTransformer for ScriptedTransformer {
        async fn transform(&self, _input: &str) -> Result<String, TransformError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone()
        }
    }

    struct PanickingTransformer;

    #[async_trait]
    impl TextTransformer for PanickingTransformer {
        async fn transform(&self, _input: &str) -> Result<String, TransformError> {
            panic!("transformer blew up");
        }
    }

    /// Records which thread each gateway call ran on.
    struct ThreadRecordingClipboard {
        inner: MemoryClipboard,
        threads: std::sync::Mutex<Vec<std::thread::ThreadId>>,
    }

    impl ThreadRecordingClipboard {
        fn record(&self) {
            self.threads.lock().unwrap().push(std::thread::current().id());
        }
    }

    impl ClipboardGateway for ThreadRecordingClipboard {
        fn read(&self) -> Option<String> {
            self.record();
            self.inner.read()
        }

        fn write(&self, text: &str) {
            self.record();
            self.inner.write(text);
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    struct Harness {
        clipboard: Arc<MemoryClipboard>,
        status: watch::Receiver<StatusSnapshot>,
        tx: mpsc::Sender<TriggerEvent>,
        handle: tokio::task::JoinHandle<()>,
    }

    fn start(clipboard: MemoryClipboard, transformer: Arc<dyn TextTransformer>) -> Harness {
        let clipboard = Arc::new(clipboard);
        let orc = PipelineOrchestrator::new(
            Arc::clone(&clipboard) as Arc<dyn ClipboardGateway>,
            transformer,
            &StatusConfig::default(),
        );
        let status = orc.subscribe();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(orc.run(rx));
        Harness {
            clipboard,
            status,
            tx,
            handle,
        }
    }

    impl Harness {
        async fn trigger(&self) {
            self.tx.send(TriggerEvent::now()).await.unwrap();
        }

        /// Close the trigger channel and wait for the in-flight cycle.
        async fn shutdown(self) -> (Arc<MemoryClipboard>, StatusState) {
            drop(self.tx);
            self.handle.await.unwrap();
            let state = self.status.borrow().state.clone();
            (self.clipboard, state)
        }

        fn state(&self) -> StatusState {
            self.status.borrow().state.clone()
        }

        async fn wait_for(&mut self, pred: impl Fn(&StatusState) -> bool) {
            loop {
                if pred(&self.status.borrow_and_update().state) {
                    return;
                }
                self.status.changed().await.expect("status sender dropped");
            }
        }
    }

    fn gemini(base_url: &str, credential: ApiCredential) -> Arc<dyn TextTransformer> {
        let config = TransformConfig {
            base_url: base_url.into(),
            model: "test-model".into(),
            api_key_env: "AI_TEXT_AGENT_TEST_UNUSED".into(),
            timeout_secs: Some(5),
        };
        Arc::new(GeminiClient::new(&config, credential))
    }

    const PATH: &str = "/v1beta/models/test-model:generateContent";

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn success_writes_clipboard_and_ends_done() {
        let transformer = Arc::new(ScriptedTransformer::ok("Bonjour"));
        let h = start(MemoryClipboard::with_text("Hello"), transformer.clone());

        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        assert_eq!(state, StatusState::Done);
        assert_eq!(clipboard.read().as_deref(), Some("Bonjour"));
        assert_eq!(clipboard.write_count(), 1);
        assert_eq!(transformer.calls(), 1);
    }

    #[tokio::test]
    async fn empty_clipboard_short_circuits() {
        let transformer = Arc::new(ScriptedTransformer::ok("unused"));
        let h = start(MemoryClipboard::new(), transformer.clone());

        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        assert_eq!(state, StatusState::Error("Empty clipboard".into()));
        assert_eq!(transformer.calls(), 0);
        assert_eq!(clipboard.write_count(), 0);
    }

    #[tokio::test]
    async fn empty_string_clipboard_counts_as_empty() {
        let transformer = Arc::new(ScriptedTransformer::ok("unused"));
        let h = start(MemoryClipboard::with_text(""), transformer.clone());

        h.trigger().await;
        let (_, state) = h.shutdown().await;

        assert_eq!(state, StatusState::Error("Empty clipboard".into()));
        assert_eq!(transformer.calls(), 0);
    }

    #[tokio::test]
    async fn failure_leaves_clipboard_untouched() {
        let transformer = Arc::new(ScriptedTransformer::err(TransformError::Transport(
            "connection reset".into(),
        )));
        let h = start(MemoryClipboard::with_text("Hi"), transformer.clone());

        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        assert_eq!(state, StatusState::Error("network request failed".into()));
        assert_eq!(clipboard.read().as_deref(), Some("Hi"));
        assert_eq!(clipboard.write_count(), 0);
        assert_eq!(transformer.calls(), 1);
    }

    #[tokio::test]
    async fn processing_is_shown_while_transform_runs() {
        let gate = Arc::new(Notify::new());
        let transformer = Arc::new(ScriptedTransformer::ok("B").gated(Arc::clone(&gate)));
        let mut h = start(MemoryClipboard::with_text("A"), transformer);

        h.trigger().await;
        h.wait_for(StatusState::is_processing).await;
        assert_eq!(h.clipboard.read().as_deref(), Some("A"));

        gate.notify_one();
        h.wait_for(|s| *s == StatusState::Done).await;
        assert_eq!(h.clipboard.read().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn trigger_during_in_flight_cycle_is_dropped() {
        let gate = Arc::new(Notify::new());
        let transformer = Arc::new(ScriptedTransformer::ok("B").gated(Arc::clone(&gate)));
        let mut h = start(MemoryClipboard::with_text("A"), transformer.clone());

        h.trigger().await;
        h.wait_for(StatusState::is_processing).await;
        h.trigger().await;
        h.trigger().await;

        gate.notify_one();
        let (clipboard, state) = h.shutdown().await;

        assert_eq!(transformer.calls(), 1);
        assert_eq!(clipboard.write_count(), 1);
        assert_eq!(state, StatusState::Done);
    }

    #[tokio::test]
    async fn trigger_after_cycle_ends_starts_a_new_cycle() {
        let transformer = Arc::new(ScriptedTransformer::ok("B"));
        let mut h = start(MemoryClipboard::with_text("A"), transformer.clone());

        h.trigger().await;
        h.wait_for(|s| *s == StatusState::Done).await;
        h.trigger().await;
        let (clipboard, _) = h.shutdown().await;

        assert_eq!(transformer.calls(), 2);
        assert_eq!(clipboard.write_count(), 2);
    }

    #[tokio::test]
    async fn panicking_transformer_ends_cycle_in_error() {
        let h = start(MemoryClipboard::with_text("Hi"), Arc::new(PanickingTransformer));

        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        match state {
            StatusState::Error(message) => assert!(message.starts_with("internal error")),
            other => panic!("expected Error, got {other:?}"),
        }
        assert_eq!(clipboard.write_count(), 0);
    }

    #[tokio::test]
    async fn clipboard_calls_run_off_the_orchestrator_thread() {
        // The current-thread runtime polls the orchestrator on this thread.
        let runtime_thread = std::thread::current().id();
        let clipboard = Arc::new(ThreadRecordingClipboard {
            inner: MemoryClipboard::with_text("A"),
            threads: std::sync::Mutex::new(Vec::new()),
        });
        let orc = PipelineOrchestrator::new(
            Arc::clone(&clipboard) as Arc<dyn ClipboardGateway>,
            Arc::new(ScriptedTransformer::ok("B")),
            &StatusConfig::default(),
        );
        let status = orc.subscribe();
        let (tx, rx) = mpsc::channel(1);
        let handle = tokio::spawn(orc.run(rx));

        tx.send(TriggerEvent::now()).await.unwrap();
        drop(tx);
        handle.await.unwrap();

        assert_eq!(status.borrow().state, StatusState::Done);
        assert_eq!(clipboard.inner.read().as_deref(), Some("B"));
        let threads = clipboard.threads.lock().unwrap();
        assert_eq!(threads.len(), 2, "one read and one write");
        assert!(threads.iter().all(|id| *id != runtime_thread));
    }

    #[tokio::test]
    async fn closed_channel_without_triggers_stops_immediately() {
        let h = start(MemoryClipboard::new(), Arc::new(ScriptedTransformer::ok("x")));
        let (_, state) = h.shutdown().await;
        assert_eq!(state, StatusState::Idle);
    }

    // -----------------------------------------------------------------------
    // Auto-revert timing (paused clock)
    // -----------------------------------------------------------------------

    #[tokio::test(start_paused = true)]
    async fn done_reverts_to_idle_after_three_seconds() {
        let mut h = start(
            MemoryClipboard::with_text("A"),
            Arc::new(ScriptedTransformer::ok("B")),
        );

        h.trigger().await;
        h.wait_for(|s| *s == StatusState::Done).await;

        tokio::time::sleep(Duration::from_millis(2_990)).await;
        assert_eq!(h.state(), StatusState::Done);

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.state(), StatusState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn error_reverts_to_idle_after_five_seconds() {
        let mut h = start(MemoryClipboard::new(), Arc::new(ScriptedTransformer::ok("B")));

        h.trigger().await;
        h.wait_for(|s| matches!(s, StatusState::Error(_))).await;

        tokio::time::sleep(Duration::from_millis(4_990)).await;
        assert!(matches!(h.state(), StatusState::Error(_)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.state(), StatusState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_revert_does_not_clobber_newer_cycle() {
        let gate = Arc::new(Notify::new());
        // One stored permit lets the first call through immediately.
        gate.notify_one();
        let transformer = Arc::new(ScriptedTransformer::ok("B").gated(Arc::clone(&gate)));
        let mut h = start(MemoryClipboard::with_text("A"), transformer);

        h.trigger().await;
        h.wait_for(|s| *s == StatusState::Done).await;

        // Second cycle starts before the first cycle's revert is due.
        tokio::time::sleep(Duration::from_secs(1)).await;
        h.trigger().await;
        h.wait_for(StatusState::is_processing).await;

        // First cycle's revert fires here and must be ignored.
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(h.state(), StatusState::Processing);

        gate.notify_one();
        h.wait_for(|s| *s == StatusState::Done).await;
        tokio::time::sleep(Duration::from_millis(2_990)).await;
        assert_eq!(h.state(), StatusState::Done);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.state(), StatusState::Idle);
    }

    // -----------------------------------------------------------------------
    // End-to-end scenarios against a mock HTTP server
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn scenario_hello_becomes_bonjour() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("Hello".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Bonjour"}]}}]}"#)
            .expect(1)
            .create_async()
            .await;

        let h = start(
            MemoryClipboard::with_text("Hello"),
            gemini(&server.url(), ApiCredential::new("test-key")),
        );
        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        mock.assert_async().await;
        assert_eq!(state, StatusState::Done);
        assert_eq!(clipboard.read().as_deref(), Some("Bonjour"));
    }

    #[tokio::test]
    async fn scenario_empty_clipboard_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let h = start(
            MemoryClipboard::new(),
            gemini(&server.url(), ApiCredential::new("test-key")),
        );
        h.trigger().await;
        let (_, state) = h.shutdown().await;

        mock.assert_async().await;
        assert_eq!(state, StatusState::Error("Empty clipboard".into()));
    }

    #[tokio::test]
    async fn scenario_server_error_keeps_clipboard() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", PATH)
            .with_status(500)
            .with_body("server error")
            .expect(1)
            .create_async()
            .await;

        let h = start(
            MemoryClipboard::with_text("Hi"),
            gemini(&server.url(), ApiCredential::new("test-key")),
        );
        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        mock.assert_async().await;
        match state {
            StatusState::Error(message) => {
                assert!(message.contains("500"), "{message}");
                assert!(message.contains("server error"), "{message}");
            }
            other => panic!("expected Error, got {other:?}"),
        }
        assert_eq!(clipboard.read().as_deref(), Some("Hi"));
        assert_eq!(clipboard.write_count(), 0);
    }

    #[tokio::test]
    async fn scenario_missing_credential_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let h = start(
            MemoryClipboard::with_text("Hi"),
            gemini(&server.url(), ApiCredential::missing()),
        );
        h.trigger().await;
        let (clipboard, state) = h.shutdown().await;

        mock.assert_async().await;
        assert_eq!(state, StatusState::Error("missing credential".into()));
        assert_eq!(clipboard.read().as_deref(), Some("Hi"));
    }
}
