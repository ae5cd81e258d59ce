use std::time::{Duration, Instant};
use eframe::{egui, Frame};
use log::info;

use crate::config::ConfigManager;
use super::handlers::{DispatchHandler, ReadingHandler};
use super::state::AppState;

pub struct TelemetryApp {
    pub state: AppState,
    pub config: ConfigManager,
}

impl TelemetryApp {
    pub fn new(config: ConfigManager) -> Self {
        let state = AppState::new(config.get_config());
        let mut app = TelemetryApp { state, config };

        ReadingHandler::refresh_ports(&mut app);
        info!(
            "Ready: port {} at {} baud, recording to {}",
            app.config.get_config().serial.port,
            app.config.get_config().serial.baud_rate,
            app.config.get_config().recording.path
        );

        app
    }

    /// Persist the current port selection to the settings file.
    pub fn save_settings(&mut self) {
        self.config.get_config_mut().serial.port = self.state.connection.selected_port.trim().to_string();
        self.state.stats.status_message = match self.config.save() {
            Ok(()) => match self.config.config_path() {
                Some(path) => format!("Settings saved to {}", path.display()),
                None => "Settings kept in memory".to_string(),
            },
            Err(e) => format!("Failed to save settings: {}", e),
        };
    }
}

impl eframe::App for TelemetryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let now = Instant::now();
        DispatchHandler::handle_tick(self, now);

        crate::app::ui::render_control_bar(self, ctx);
        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_console_panel(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);
        crate::app::ui::render_error_dialog(self, ctx);

        // wake up for the next dispatch tick even without input
        let next_tick = self.state.dispatch_timer.remaining(Instant::now());
        ctx.request_repaint_after(next_tick.max(Duration::from_millis(10)));
    }
}

impl Drop for TelemetryApp {
    fn drop(&mut self) {
        info!("Shutting down");
        self.state.dispatcher.shutdown();
    }
}
