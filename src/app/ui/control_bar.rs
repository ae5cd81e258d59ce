use eframe::egui;

use crate::app::app_core::TelemetryApp;
use crate::app::handlers::{ReadingHandler, RecordingHandler};

pub fn render_control_bar(app: &mut TelemetryApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("control_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                render_port_selector(app, ui);

                ui.separator();

                let can_start = app.state.can_start_reading();
                if ui.add_enabled(can_start, egui::Button::new("▶ Start Reading")).clicked() {
                    ReadingHandler::start_reading(app);
                }
                let can_stop = app.state.dispatcher.reader_state().is_active();
                if ui.add_enabled(can_stop, egui::Button::new("⏹ Stop Reading")).clicked() {
                    ReadingHandler::stop_reading(app);
                }

                ui.separator();

                let recording = app.state.dispatcher.is_recording();
                if ui.add_enabled(!recording, egui::Button::new("⏺ Start Recording")).clicked() {
                    RecordingHandler::start_recording(app);
                }
                if ui.add_enabled(recording, egui::Button::new("⏹ Stop Recording")).clicked() {
                    RecordingHandler::stop_recording(app);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("💾 Save Settings").clicked() {
                        app.save_settings();
                    }
                });
            });
            ui.add_space(5.0);
        });
}

fn render_port_selector(app: &mut TelemetryApp, ui: &mut egui::Ui) {
    let editable = app.state.can_start_reading();

    ui.label("Port:");
    ui.add_enabled(
        editable,
        egui::TextEdit::singleline(&mut app.state.connection.selected_port)
            .desired_width(120.0)
            .hint_text("/dev/ttyUSB0"),
    );

    ui.add_enabled_ui(editable, |ui| {
        egui::ComboBox::from_id_salt("port_list")
            .selected_text("Detected")
            .show_ui(ui, |ui| {
                if app.state.connection.available_ports.is_empty() {
                    ui.label("No serial ports found");
                }
                for port in &app.state.connection.available_ports {
                    ui.selectable_value(&mut app.state.connection.selected_port, port.clone(), port);
                }
            });
    });

    if ui.button("🔄").on_hover_text("Refresh serial ports").clicked() {
        ReadingHandler::refresh_ports(app);
    }

    ui.label(format!("{} baud", app.config.get_config().serial.baud_rate));
}
