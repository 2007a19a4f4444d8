//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every section is `#[serde(default)]`, so a hand-edited file that only sets
//! a couple of keys still loads.

use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// TransformConfig
// ---------------------------------------------------------------------------

/// Settings for the remote text-transform service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    /// Base URL of the generative language API.
    pub base_url: String,
    /// Model identifier placed in the request path (e.g. `"gemini-flash-latest"`).
    pub model: String,
    /// Name of the environment variable holding the API key.  The key itself
    /// is never written to `settings.toml`.
    pub api_key_env: String,
    /// Optional whole-request timeout.  `None` leaves the transport default
    /// in place.
    pub timeout_secs: Option<u64>,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-flash-latest".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key combination that starts a transform cycle (e.g. `"Meta+Shift+Space"`).
    pub trigger: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            trigger: "Meta+Shift+Space".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// StatusConfig
// ---------------------------------------------------------------------------

/// How long terminal statuses stay visible before reverting to idle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Seconds the `Done` status is shown.
    pub done_revert_secs: u64,
    /// Seconds the `Error` status is shown.
    pub error_revert_secs: u64,
}

impl StatusConfig {
    pub fn done_delay(&self) -> Duration {
        Duration::from_secs(self.done_revert_secs)
    }

    pub fn error_delay(&self) -> Duration {
        Duration::from_secs(self.error_revert_secs)
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            done_revert_secs: 3,
            error_revert_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Status widget appearance and behaviour settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the floating status widget.  When `false` the agent runs
    /// headless until Ctrl-C.
    pub show_widget: bool,
    /// Keep the widget floating above all other windows.
    pub always_on_top: bool,
    /// Last saved widget position `(x, y)` in screen pixels.  `None` means
    /// let the OS / window manager pick a position on first launch.
    pub window_position: Option<(f32, f32)>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_widget: true,
            always_on_top: true,
            window_position: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use ai_text_agent::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// let mut config = config;
/// config.ui.always_on_top = false;
/// config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Remote transform service settings.
    pub transform: TransformConfig,
    /// Global hotkey binding.
    pub hotkey: HotkeyConfig,
    /// Status auto-revert delays.
    pub status: StatusConfig,
    /// Widget settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
