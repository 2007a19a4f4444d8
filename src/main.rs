//! Application entry point for AI Text Agent.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the transform client and clipboard gateway.
//! 5. Register the global hotkey (fatal on failure).
//! 6. Spawn the pipeline orchestrator on the tokio runtime.
//! 7. Run [`eframe::run_native`] until the widget is closed, or wait for
//!    Ctrl-C when the widget is disabled.

use std::sync::Arc;

use anyhow::Context as _;
use eframe::egui;
use tokio::sync::mpsc;

use ai_text_agent::{
    app::{StatusWidget, WINDOW_TITLE},
    clipboard::SystemClipboard,
    config::{AppConfig, HotkeyConfig},
    hotkey::{parse_combo, HotkeyListener, KeyCombo, TriggerEvent},
    pipeline::PipelineOrchestrator,
    transform::GeminiClient,
};

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_decorations(false)
        .with_transparent(true)
        .with_inner_size([280.0, 100.0])
        .with_min_inner_size([220.0, 50.0])
        .with_resizable(false);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

/// The configured combination, or the default one if it does not parse.
fn trigger_combo(config: &HotkeyConfig) -> anyhow::Result<KeyCombo> {
    if let Some(combo) = parse_combo(&config.trigger) {
        return Ok(combo);
    }
    let fallback = HotkeyConfig::default().trigger;
    log::warn!(
        "unknown hotkey combination {:?}; using {fallback}",
        config.trigger
    );
    parse_combo(&fallback).context("default hotkey combination does not parse")
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("AI Text Agent starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Transform client + clipboard
    let transformer = Arc::new(GeminiClient::from_config(&config.transform));
    let clipboard = Arc::new(SystemClipboard::new().context("failed to start clipboard gateway")?);

    // 5. Hotkey listener thread
    let (trigger_tx, trigger_rx) = mpsc::channel::<TriggerEvent>(16);
    let combo = trigger_combo(&config.hotkey)?;
    let hotkey_listener = HotkeyListener::start(combo, trigger_tx).map_err(|e| {
        log::error!("{e}");
        e
    })?;
    let shortcut = hotkey_listener.combo().to_string();

    // 6. Pipeline orchestrator
    let orchestrator = PipelineOrchestrator::new(clipboard, transformer, &config.status);
    let status_rx = orchestrator.subscribe();
    rt.spawn(orchestrator.run(trigger_rx));

    log::info!("ready: copy some text and press {shortcut}");

    // 7. Status widget, or headless until Ctrl-C
    if config.ui.show_widget {
        let app = StatusWidget::new(status_rx, shortcut, config.clone());
        eframe::run_native(
            WINDOW_TITLE,
            native_options(&config),
            Box::new(move |_cc| Ok(Box::new(app))),
        )
        .map_err(|e| anyhow::anyhow!("status widget failed: {e}"))?;
    } else {
        drop(status_rx);
        rt.block_on(tokio::signal::ctrl_c())
            .context("failed to wait for Ctrl-C")?;
    }

    log::info!("AI Text Agent shutting down");
    Ok(())
}
