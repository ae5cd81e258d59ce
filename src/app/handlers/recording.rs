use crate::app::app_core::TelemetryApp;

pub struct RecordingHandler;

impl RecordingHandler {
    pub fn start_recording(app: &mut TelemetryApp) {
        let path = app.config.get_config().recording_path();
        app.state.dispatcher.set_recording_path(&path);

        app.state.stats.status_message = match app.state.dispatcher.start_recording() {
            Ok(()) => format!("Recording to {}", path.display()),
            Err(e) => format!("Recording failed: {}", e),
        };
    }

    pub fn stop_recording(app: &mut TelemetryApp) {
        let rows = app.state.dispatcher.recorder().rows_written();
        app.state.dispatcher.stop_recording();
        app.state.stats.status_message = format!("Recording saved ({} rows)", rows);
    }
}
