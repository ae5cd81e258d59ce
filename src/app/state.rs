use crate::config::AppConfig;
use crate::dispatch::Dispatcher;
use crate::plotter::TelemetryPlot;
use crate::types::TickReport;
use crate::utils::IntervalTimer;

/// Serial port selection and connection feedback
#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    pub available_ports: Vec<String>,
    pub selected_port: String,
    /// Shown in a blocking dialog until acknowledged
    pub error_dialog: Option<String>,
}

/// Running totals shown in the status bar
#[derive(Debug, Clone, Default)]
pub struct StatsState {
    pub total_lines: usize,
    pub total_updates: usize,
    pub total_malformed: usize,
    pub status_message: String,
}

impl StatsState {
    pub fn record(&mut self, report: &TickReport) {
        self.total_lines += report.lines;
        self.total_updates += report.updates;
        self.total_malformed += report.malformed;
    }
}

pub struct AppState {
    pub dispatcher: Dispatcher,
    pub plot: TelemetryPlot,
    pub dispatch_timer: IntervalTimer,
    pub connection: ConnectionState,
    pub stats: StatsState,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            dispatcher: Dispatcher::new(config),
            plot: TelemetryPlot::new(&config.plot),
            dispatch_timer: IntervalTimer::from_millis(config.dispatch.tick_interval_ms),
            connection: ConnectionState {
                available_ports: Vec::new(),
                selected_port: config.serial.port.clone(),
                error_dialog: None,
            },
            stats: StatsState::default(),
        }
    }

    pub fn get_status_summary(&self) -> &'static str {
        self.dispatcher.reader_state().label()
    }

    /// Start is only offered while no reader thread is alive.
    pub fn can_start_reading(&self) -> bool {
        !self.dispatcher.is_reading()
    }
}
