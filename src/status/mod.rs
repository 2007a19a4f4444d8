//! Status indicator: the single `Idle | Processing | Done | Error` value shown
//! to the user, with auto-revert of the terminal states.

pub mod indicator;
pub mod state;

pub use indicator::{RevertTimer, StatusIndicator};
pub use state::{StatusSnapshot, StatusState};
