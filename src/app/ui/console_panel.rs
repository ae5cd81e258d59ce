use eframe::egui;

use crate::app::app_core::TelemetryApp;
use crate::console::ConsoleKind;

pub fn render_console_panel(app: &mut TelemetryApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("console_panel")
        .resizable(true)
        .default_height(180.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Console");
                ui.label(format!("({} lines)", app.state.dispatcher.console().len()));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear").clicked() {
                        app.state.dispatcher.console_mut().clear();
                    }
                });
            });

            egui::ScrollArea::vertical()
                .stick_to_bottom(true)
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    for line in app.state.dispatcher.console().lines() {
                        let text = egui::RichText::new(&line.text).monospace();
                        let text = match line.kind {
                            ConsoleKind::Raw => text,
                            ConsoleKind::Info => text.color(egui::Color32::from_rgb(0, 100, 200)),
                            ConsoleKind::Error => text.color(egui::Color32::from_rgb(200, 0, 0)),
                        };
                        ui.label(text);
                    }
                });
        });
}
