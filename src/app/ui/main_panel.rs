use eframe::egui;
use crate::app::app_core::TelemetryApp;

pub fn render_main_panel(app: &mut TelemetryApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            app.state.plot.ui(ui, &app.config.get_config().plot);
        });
    });
}
