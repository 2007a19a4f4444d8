//! Floating status widget (egui/eframe application).
//!
//! [`StatusWidget`] is the top-level [`eframe::App`].  It owns a
//! `watch::Receiver<StatusSnapshot>` from the pipeline orchestrator and
//! renders the current status as a compact, always-on-top, borderless
//! window.  The widget never drives the pipeline; it only observes.
//! When it closes, a moved window position is saved to `settings.toml`.
//!
//! # Widget States
//!
//! | State | Visual |
//! |-------|--------|
//! | `Idle` | Usage hint (dim gray) |
//! | `Processing` | ⏳ spinner + "Processing..." (blue) |
//! | `Done` | ✅ "Done!" (green) |
//! | `Error` | ❌ error detail (orange) |

use std::time::Duration;

use eframe::egui;
use tokio::sync::watch;

use crate::config::AppConfig;
use crate::status::{StatusSnapshot, StatusState};

/// Title used for the native window.
pub const WINDOW_TITLE: &str = "AI Text Agent";

// ---------------------------------------------------------------------------
// StatusWidget
// ---------------------------------------------------------------------------

pub struct StatusWidget {
    status_rx: watch::Receiver<StatusSnapshot>,
    /// Human-readable trigger combination, e.g. `Meta+Shift+Space`.
    shortcut: String,
    /// Spinner animation phase (increases each frame).
    spinner_phase: f32,
    /// Loaded configuration; rewritten on exit if the window moved.
    config: AppConfig,
    /// Last observed outer window position.
    position: Option<egui::Pos2>,
}

impl StatusWidget {
    pub fn new(
        status_rx: watch::Receiver<StatusSnapshot>,
        shortcut: impl Into<String>,
        config: AppConfig,
    ) -> Self {
        Self {
            status_rx,
            shortcut: shortcut.into(),
            spinner_phase: 0.0,
            config,
            position: None,
        }
    }

    /// The configuration to write back on exit, if the window moved away from
    /// the saved position.
    fn config_to_persist(&self) -> Option<AppConfig> {
        let pos = self.position?;
        let position = Some((pos.x, pos.y));
        if self.config.ui.window_position == position {
            return None;
        }
        let mut config = self.config.clone();
        config.ui.window_position = position;
        Some(config)
    }

    /// Draw the draggable title bar with status glyph, title, and the quit
    /// button.
    fn draw_title_bar(&self, ui: &mut egui::Ui, ctx: &egui::Context, state: &StatusState) {
        ui.horizontal(|ui| {
            let glyph = match state {
                StatusState::Idle => "  ",
                other => other.glyph(),
            };
            ui.label(egui::RichText::new(glyph).color(state_color(state)))
                .on_hover_text(state.tooltip(&self.shortcut));

            let title_resp = ui.label(
                egui::RichText::new(WINDOW_TITLE)
                    .color(egui::Color32::from_rgb(200, 200, 200))
                    .size(13.0),
            );
            if title_resp.is_pointer_button_down_on() {
                if let Some(outer_rect) = ctx.input(|i| i.viewport().outer_rect) {
                    let delta = ctx.input(|i| i.pointer.delta());
                    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(
                        outer_rect.min + delta,
                    ));
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add(
                        egui::Button::new(
                            egui::RichText::new("Quit")
                                .color(egui::Color32::from_rgb(200, 100, 100))
                                .size(12.0),
                        )
                        .frame(false),
                    )
                    .on_hover_text("Quit AI Text Agent")
                    .clicked()
                {
                    log::info!("widget: quit requested");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });
        });
    }

    fn draw_body(&self, ui: &mut egui::Ui, state: &StatusState) {
        ui.add_space(4.0);
        match state {
            StatusState::Idle => {
                for line in usage_hint(&self.shortcut) {
                    ui.label(
                        egui::RichText::new(line)
                            .color(egui::Color32::from_rgb(120, 120, 120))
                            .size(12.0),
                    );
                }
            }
            StatusState::Processing => {
                ui.label(
                    egui::RichText::new(format!("{} {}", self.spinner_char(), state.label()))
                        .color(state_color(state)),
                );
            }
            StatusState::Done => {
                ui.label(egui::RichText::new(state.label()).color(state_color(state)));
                ui.label(
                    egui::RichText::new("Result copied to clipboard")
                        .color(egui::Color32::from_rgb(140, 140, 140))
                        .size(11.0),
                );
            }
            StatusState::Error(message) => {
                ui.label(egui::RichText::new(state.label()).color(state_color(state)));
                ui.label(
                    egui::RichText::new(message.as_str())
                        .color(egui::Color32::from_rgb(255, 136, 68))
                        .size(11.0),
                );
            }
        }
    }

    /// A simple rotating ASCII spinner character driven by `spinner_phase`.
    fn spinner_char(&self) -> char {
        let chars = ['|', '/', '-', '\\'];
        let idx = (self.spinner_phase as usize) % chars.len();
        chars[idx]
    }
}

// ---------------------------------------------------------------------------
// Presentation helpers
// ---------------------------------------------------------------------------

/// The three usage lines shown while idle.
pub fn usage_hint(shortcut: &str) -> [String; 3] {
    [
        "1. Copy text".to_string(),
        format!("2. Press {shortcut}"),
        "3. AI result \u{2192} clipboard".to_string(),
    ]
}

/// Accent colour for a status.
pub fn state_color(state: &StatusState) -> egui::Color32 {
    match state {
        StatusState::Idle => egui::Color32::from_rgb(100, 100, 100),
        StatusState::Processing => egui::Color32::from_rgb(68, 136, 255),
        StatusState::Done => egui::Color32::from_rgb(80, 200, 120),
        StatusState::Error(_) => egui::Color32::from_rgb(255, 136, 68),
    }
}

/// Window size for a status.
pub fn window_size(state: &StatusState) -> egui::Vec2 {
    match state {
        StatusState::Idle => egui::vec2(280.0, 100.0),
        StatusState::Processing => egui::vec2(280.0, 65.0),
        StatusState::Done | StatusState::Error(_) => egui::vec2(280.0, 80.0),
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for StatusWidget {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = self.status_rx.borrow_and_update().state.clone();

        if let Some(rect) = ctx.input(|i| i.viewport().outer_rect) {
            self.position = Some(rect.min);
        }

        self.spinner_phase += 0.08;
        if self.spinner_phase >= 4.0 {
            self.spinner_phase = 0.0;
        }

        // Status changes arrive from another task, so keep polling.
        let repaint = if state.is_processing() {
            Duration::from_millis(66)
        } else {
            Duration::from_millis(250)
        };
        ctx.request_repaint_after(repaint);

        ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(window_size(&state)));

        let frame = egui::Frame::new()
            .fill(egui::Color32::from_rgba_premultiplied(30, 30, 30, 220))
            .corner_radius(egui::CornerRadius::same(8))
            .inner_margin(egui::Margin::same(8));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.draw_title_bar(ui, ctx, &state);
            ui.separator();
            self.draw_body(ui, &state);
        });
    }

    /// Persist the window position in the config on exit (best-effort).
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("widget: closing");
        if let Some(config) = self.config_to_persist() {
            match config.save() {
                Ok(()) => log::debug!("widget: window position saved"),
                Err(e) => log::warn!("widget: could not save window position: {e}"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
