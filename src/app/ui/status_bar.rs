use eframe::egui;

use crate::app::app_core::TelemetryApp;
use crate::serial::ReaderState;

pub fn render_status_bar(app: &mut TelemetryApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("status_bar")
        .min_height(25.0)
        .show(ctx, |ui| {
            ui.add_space(3.0);
            ui.horizontal(|ui| {
                ui.label("Status:");

                let state = app.state.dispatcher.reader_state();
                let status_color = match state {
                    ReaderState::Reading => egui::Color32::from_rgb(0, 150, 0),
                    ReaderState::Connecting => egui::Color32::from_rgb(255, 165, 0),
                    ReaderState::Failed => egui::Color32::from_rgb(200, 0, 0),
                    ReaderState::Idle | ReaderState::Stopped => egui::Color32::from_rgb(120, 120, 120),
                };
                ui.colored_label(status_color, app.state.get_status_summary());

                ui.separator();

                let recorder = app.state.dispatcher.recorder();
                match recorder.path() {
                    Some(path) => {
                        ui.colored_label(
                            egui::Color32::from_rgb(200, 0, 0),
                            format!("● REC {} ({} rows)", path.display(), recorder.rows_written()),
                        );
                    }
                    None => {
                        ui.label("Not recording");
                    }
                }

                ui.separator();
                ui.label(format!(
                    "Lines: {}  Updates: {}  Malformed: {}",
                    app.state.stats.total_lines, app.state.stats.total_updates, app.state.stats.total_malformed
                ));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if !app.state.stats.status_message.is_empty() {
                        ui.colored_label(egui::Color32::from_rgb(0, 100, 200), &app.state.stats.status_message);
                    }
                });
            });
            ui.add_space(3.0);
        });
}
