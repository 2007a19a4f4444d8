//! Status states and their human-readable presentation.

/// What the status surface shows.
///
/// ```text
/// Idle ──trigger──▶ Processing ──ok──▶ Done ──3 s──▶ Idle
///   │                    └──────err──▶ Error ─5 s──▶ Idle
///   └──empty clipboard──────────────▶ Error
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusState {
    /// Ready for the next trigger.
    #[default]
    Idle,
    /// A transform call is in flight.
    Processing,
    /// The result is on the clipboard.
    Done,
    /// The cycle failed; carries the user-facing detail.
    Error(String),
}

impl StatusState {
    /// Short title glyph shown next to the widget title.
    pub fn glyph(&self) -> &'static str {
        match self {
            StatusState::Idle => "",
            StatusState::Processing => "\u{23F3}",
            StatusState::Done => "\u{2705}",
            StatusState::Error(_) => "\u{274C}",
        }
    }

    /// A short label suitable for a status line.
    pub fn label(&self) -> &'static str {
        match self {
            StatusState::Idle => "Ready",
            StatusState::Processing => "Processing...",
            StatusState::Done => "Done!",
            StatusState::Error(_) => "Error",
        }
    }

    /// Two-line tooltip.  `shortcut` is the configured trigger, shown while idle.
    pub fn tooltip(&self, shortcut: &str) -> String {
        match self {
            StatusState::Idle => {
                format!("AI Text Agent - Ready\nPress {shortcut} to translate clipboard")
            }
            StatusState::Processing => "Processing...\nTranslating your text with AI".into(),
            StatusState::Done => "Done!\nTranslation copied to clipboard".into(),
            StatusState::Error(message) => format!("Error: {message}\nCheck logs for details"),
        }
    }

    pub fn is_processing(&self) -> bool {
        matches!(self, StatusState::Processing)
    }
}

impl std::fmt::Display for StatusState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusState::Idle => f.write_str("Idle"),
            StatusState::Processing => f.write_str("Processing"),
            StatusState::Done => f.write_str("Done"),
            StatusState::Error(message) => write!(f, "Error({message})"),
        }
    }
}

/// What observers receive: the state plus the transition counter that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub state: StatusState,
    pub generation: u64,
}
