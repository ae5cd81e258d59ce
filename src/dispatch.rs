//! Dispatch loop.
//!
//! `Dispatcher` is the context object for the whole pipeline: it owns the
//! receiving end of the ingestion channel, the reader handle, the rolling
//! store, the recorder and the console. Everything here runs on the UI thread;
//! the reader thread only ever touches the channel.

use chrono::Local;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, SerialConfig};
use crate::console::Console;
use crate::error::{ReaderError, RecordingError};
use crate::parser::parse_line;
use crate::recorder::CsvRecorder;
use crate::serial::{ReaderState, SerialReader};
use crate::store::RollingStore;
use crate::types::{IngestEvent, TickReport};

pub struct Dispatcher {
    receiver: Receiver<IngestEvent>,
    sender: Sender<IngestEvent>,
    reader: SerialReader,
    store: RollingStore,
    recorder: CsvRecorder,
    console: Console,
    recording_path: PathBuf,
    record_unmatched_lines: bool,
}

impl Dispatcher {
    pub fn new(config: &AppConfig) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            reader: SerialReader::new(sender.clone()),
            receiver,
            sender,
            store: RollingStore::new(config.plot.history_capacity),
            recorder: CsvRecorder::new(config.recording.not_available.clone()),
            console: Console::new(config.console.max_lines),
            recording_path: config.recording_path(),
            record_unmatched_lines: config.dispatch.record_unmatched_lines,
        }
    }

    /// Producer end of the ingestion channel.
    pub fn sender(&self) -> Sender<IngestEvent> {
        self.sender.clone()
    }

    pub fn start_reading(&mut self, serial: &SerialConfig) -> Result<(), ReaderError> {
        match self.reader.start(serial) {
            Ok(()) => {
                info!("Connecting to {} at {} baud", serial.port, serial.baud_rate);
                self.console
                    .push_info(format!("Connecting to {} at {} baud...", serial.port, serial.baud_rate));
                Ok(())
            }
            Err(e) => {
                warn!("Start reading refused: {}", e);
                self.console.push_error(e.to_string());
                Err(e)
            }
        }
    }

    pub fn stop_reading(&mut self) {
        if self.reader.state().is_active() {
            self.reader.stop();
            self.console.push_info("Stopping serial reader...");
        }
    }

    pub fn start_recording(&mut self) -> Result<(), RecordingError> {
        let path = self.recording_path.clone();
        match self.recorder.start(&path) {
            Ok(()) => {
                self.console.push_info(format!("Recording to {}", path.display()));
                Ok(())
            }
            Err(e) => {
                error!("Failed to start recording: {}", e);
                self.console.push_error(format!("Recording failed: {}", e));
                Err(e)
            }
        }
    }

    pub fn stop_recording(&mut self) {
        if self.recorder.is_active() {
            let rows = self.recorder.rows_written();
            self.recorder.stop();
            self.console
                .push_info(format!("Recording stopped ({} rows written)", rows));
        }
    }

    pub fn set_recording_path<P: AsRef<Path>>(&mut self, path: P) {
        self.recording_path = path.as_ref().to_path_buf();
    }

    /// Process every event queued at the moment the tick starts, in order.
    /// Events that arrive during the tick wait for the next one.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let pending = self.receiver.len();

        let events: Vec<IngestEvent> = self.receiver.try_iter().take(pending).collect();
        for event in events {
            match event {
                IngestEvent::Line(line) => self.process_line(line, &mut report),
                IngestEvent::Connected { port } => {
                    self.console.push_info(format!("Connected to {}", port));
                }
                IngestEvent::Stopped { port } => {
                    self.console.push_info(format!("Stopped reading {}", port));
                }
                IngestEvent::ConnectionFailed(message) => {
                    self.console.push_error(message.clone());
                    report.connection_errors.push(message);
                }
            }
        }

        report
    }

    fn process_line(&mut self, line: String, report: &mut TickReport) {
        report.lines += 1;
        self.console.push_raw(line.as_str());

        let updated = match parse_line(&line) {
            Ok(Some(sample)) => {
                self.store.apply(&sample);
                report.updates += 1;
                true
            }
            Ok(None) => false,
            Err(e) => {
                debug!("Malformed line {:?}: {}", line, e);
                report.malformed += 1;
                return;
            }
        };

        if self.recorder.is_active() && (updated || self.record_unmatched_lines) {
            match self.recorder.write_row(&Local::now(), &self.store.latest_row()) {
                Ok(()) => report.rows_written += 1,
                Err(e) => {
                    let message = format!("Recording stopped: {}", e);
                    self.console.push_error(message.clone());
                    report.recording_error = Some(message);
                }
            }
        }
    }

    /// Stop reading and close any recording. Called on the exit path.
    pub fn shutdown(&mut self) {
        self.reader.stop();
        self.recorder.stop();
    }

    pub fn store(&self) -> &RollingStore {
        &self.store
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console {
        &mut self.console
    }

    pub fn recorder(&self) -> &CsvRecorder {
        &self.recorder
    }

    pub fn reader_state(&self) -> ReaderState {
        self.reader.state()
    }

    pub fn is_reading(&self) -> bool {
        self.reader.is_running()
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_active()
    }

    pub fn recording_path(&self) -> &Path {
        &self.recording_path
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
