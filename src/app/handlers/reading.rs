use log::info;

use crate::app::app_core::TelemetryApp;
use crate::serial;

pub struct ReadingHandler;

impl ReadingHandler {
    pub fn start_reading(app: &mut TelemetryApp) {
        let mut serial_config = app.config.get_config().serial.clone();
        serial_config.port = app.state.connection.selected_port.trim().to_string();

        match app.state.dispatcher.start_reading(&serial_config) {
            Ok(()) => app.state.stats.status_message = format!("Connecting to {}", serial_config.port),
            Err(e) => app.state.stats.status_message = e.to_string(),
        }
    }

    pub fn stop_reading(app: &mut TelemetryApp) {
        app.state.dispatcher.stop_reading();
        app.state.stats.status_message = "Stopping...".to_string();
    }

    pub fn refresh_ports(app: &mut TelemetryApp) {
        let ports = serial::available_ports();
        info!("Found {} serial ports", ports.len());
        app.state.connection.available_ports = ports;
    }
}
