use std::time::Instant;

use crate::app::app_core::TelemetryApp;

pub struct DispatchHandler;

impl DispatchHandler {
    /// Run a dispatch tick if one is due, then refresh the plot cache if due.
    pub fn handle_tick(app: &mut TelemetryApp, now: Instant) {
        if app.state.dispatch_timer.poll(now) {
            let report = app.state.dispatcher.tick();
            app.state.stats.record(&report);

            if let Some(message) = report.connection_errors.last() {
                app.state.connection.error_dialog = Some(message.clone());
                app.state.stats.status_message = "Connection failed".to_string();
            }
            if let Some(message) = report.recording_error {
                app.state.stats.status_message = message;
            }
        }

        app.state.plot.maybe_refresh(app.state.dispatcher.store(), now);
    }
}
