//! AI Text Agent: press a global shortcut, the clipboard text is sent to a
//! generative-language service and the result replaces the clipboard.

pub mod app;
pub mod clipboard;
pub mod config;
pub mod hotkey;
pub mod pipeline;
pub mod status;
pub mod transform;
