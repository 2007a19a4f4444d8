//! Pipeline orchestrator for the clipboard transform agent.
//!
//! Wires trigger → clipboard capture → remote transform → clipboard publish
//! and owns the status indicator the UI observes.
//!
//! # Architecture
//!
//! ```text
//! TriggerEvent (mpsc)
//!        │
//!        ▼
//! PipelineOrchestrator::run()  ← async tokio task
//!        │
//!        ├─ clipboard read        → Error("Empty clipboard") if nothing
//!        ├─ spawn(transform)      → Processing
//!        └─ TransformFinished
//!              ├─ clipboard write → Done
//!              └─ (failure)       → Error(detail)
//!
//! watch::Receiver<StatusSnapshot> ←─── read by the status widget each frame
//! ```
//!
//! At most one cycle is in flight; triggers arriving meanwhile are dropped.

pub mod runner;

pub use runner::{CycleError, PipelineEvent, PipelineOrchestrator};
