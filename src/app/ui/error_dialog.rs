use eframe::egui;
use crate::app::app_core::TelemetryApp;

/// Blocking notification for connection errors. Nothing else is clickable
/// until it is dismissed.
pub fn render_error_dialog(app: &mut TelemetryApp, ctx: &egui::Context) {
    let Some(message) = app.state.connection.error_dialog.clone() else {
        return;
    };

    let response = egui::Modal::new(egui::Id::new("connection_error")).show(ctx, |ui| {
        ui.set_width(360.0);
        ui.heading("Error");
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(8.0);
        ui.button("OK").clicked()
    });

    if response.inner || response.should_close() {
        app.state.connection.error_dialog = None;
    }
}
