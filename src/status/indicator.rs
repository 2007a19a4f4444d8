//! The process-wide status holder.
//!
//! [`StatusIndicator`] is owned by the orchestrator and only mutated from its
//! task.  Every transition bumps a generation counter; `Done` and `Error`
//! hand back a [`RevertTimer`] stamped with that generation.  When the timer
//! fires, [`StatusIndicator::revert_if_current`] drops it unless no other
//! transition happened in between.
//!
//! Renderers observe the state through a `tokio::sync::watch` receiver and
//! never write to it.

use std::time::Duration;

use tokio::sync::watch;

use crate::config::StatusConfig;

use super::state::{StatusSnapshot, StatusState};

/// A revert to `Idle` the owner must schedule after `delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevertTimer {
    pub generation: u64,
    pub delay: Duration,
}

pub struct StatusIndicator {
    current: StatusSnapshot,
    done_delay: Duration,
    error_delay: Duration,
    tx: watch::Sender<StatusSnapshot>,
}

impl StatusIndicator {
    /// Create an indicator in `Idle` (generation 0).
    pub fn new(config: &StatusConfig) -> Self {
        let (tx, _rx) = watch::channel(StatusSnapshot::default());
        Self {
            current: StatusSnapshot::default(),
            done_delay: config.done_delay(),
            error_delay: config.error_delay(),
            tx,
        }
    }

    /// A new observer of status changes.
    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.tx.subscribe()
    }

    pub fn state(&self) -> &StatusState {
        &self.current.state
    }

    pub fn generation(&self) -> u64 {
        self.current.generation
    }

    /// Show `state` now.  Returns the revert the caller must schedule, if any.
    ///
    /// Any revert handed out earlier becomes stale.
    pub fn set_state(&mut self, state: StatusState) -> Option<RevertTimer> {
        let delay = match &state {
            StatusState::Done => Some(self.done_delay),
            StatusState::Error(_) => Some(self.error_delay),
            StatusState::Idle | StatusState::Processing => None,
        };

        self.publish(state);

        delay.map(|delay| RevertTimer {
            generation: self.current.generation,
            delay,
        })
    }

    /// Apply a fired revert.  Returns `false` (and changes nothing) when a
    /// newer transition has superseded it.
    pub fn revert_if_current(&mut self, generation: u64) -> bool {
        if generation != self.current.generation {
            log::debug!(
                "status: stale revert (generation {generation}, current {})",
                self.current.generation
            );
            return false;
        }
        self.publish(StatusState::Idle);
        true
    }

    fn publish(&mut self, state: StatusState) {
        self.current = StatusSnapshot {
            state,
            generation: self.current.generation + 1,
        };
        log::debug!(
            "status: {} (generation {})",
            self.current.state,
            self.current.generation
        );
        self.tx.send_replace(self.current.clone());
    }
}
