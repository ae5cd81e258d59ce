//! CSV recording session.
//!
//! One row per processed line: a timestamp followed by the latest value of
//! every channel. Rows are flushed as they are written.

use chrono::{DateTime, Local};
use log::{error, info, warn};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::RecordingError;
use crate::types::Channel;
use crate::utils::format_timestamp;

pub const TIMESTAMP_COLUMN: &str = "Timestamp";

/// Header row: timestamp plus one column per channel.
pub fn header() -> [&'static str; Channel::COUNT + 1] {
    let mut header = [TIMESTAMP_COLUMN; Channel::COUNT + 1];
    for channel in Channel::ALL {
        header[channel.index() + 1] = channel.label();
    }
    header
}

struct Session {
    writer: csv::Writer<Box<dyn Write + Send>>,
    path: PathBuf,
    rows: usize,
}

pub struct CsvRecorder {
    session: Option<Session>,
    not_available: String,
}

impl CsvRecorder {
    pub fn new(not_available: impl Into<String>) -> Self {
        Self {
            session: None,
            not_available: not_available.into(),
        }
    }

    /// Create (or truncate) `path` and write the header.
    ///
    /// An already active session is stopped first.
    pub fn start<P: AsRef<Path>>(&mut self, path: P) -> Result<(), RecordingError> {
        let path = path.as_ref();
        if self.is_active() {
            warn!("Recording already active; closing it before starting a new one");
            self.stop();
        }
        let file = File::create(path).map_err(|source| RecordingError::Create {
            path: path.display().to_string(),
            source,
        })?;
        self.start_with_writer(Box::new(file), path.to_path_buf())
    }

    /// Start a session on an arbitrary sink. `path` is only reported back.
    pub fn start_with_writer(
        &mut self,
        sink: Box<dyn Write + Send>,
        path: PathBuf,
    ) -> Result<(), RecordingError> {
        if self.is_active() {
            warn!("Recording already active; closing it before starting a new one");
            self.stop();
        }

        let mut writer = csv::Writer::from_writer(sink);
        writer.write_record(header())?;
        writer.flush()?;

        info!("Recording started: {}", path.display());
        self.session = Some(Session { writer, path, rows: 0 });
        Ok(())
    }

    /// Flush and close the session. Does nothing when inactive.
    pub fn stop(&mut self) {
        if let Some(mut session) = self.session.take() {
            match session.writer.flush() {
                Ok(()) => info!(
                    "Recording stopped: {} ({} rows)",
                    session.path.display(),
                    session.rows
                ),
                Err(e) => error!("Failed to flush {}: {}", session.path.display(), e),
            }
        }
    }

    /// Append one row. On failure the session is closed.
    pub fn write_row(
        &mut self,
        timestamp: &DateTime<Local>,
        values: &[Option<f64>; Channel::COUNT],
    ) -> Result<(), RecordingError> {
        let session = self.session.as_mut().ok_or(RecordingError::NotActive)?;

        let mut record = Vec::with_capacity(Channel::COUNT + 1);
        record.push(format_timestamp(timestamp));
        record.extend(values.iter().map(|value| match value {
            Some(v) => format!("{:?}", v),
            None => self.not_available.clone(),
        }));

        let result = session
            .writer
            .write_record(&record)
            .map_err(RecordingError::from)
            .and_then(|()| session.writer.flush().map_err(RecordingError::from));

        match result {
            Ok(()) => {
                session.rows += 1;
                Ok(())
            }
            Err(e) => {
                error!("Recording to {} failed, closing session: {}", session.path.display(), e);
                // the writer may be unusable; drop it without another flush
                self.session = None;
                Err(e)
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn rows_written(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.rows)
    }

    pub fn path(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.path.as_path())
    }
}

impl Drop for CsvRecorder {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect()
    }

    fn at(second: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 2, 3, 4, second).unwrap()
    }

    #[test]
    fn start_then_stop_leaves_header_only() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data_log.csv");

        let mut recorder = CsvRecorder::new("N/A");
        recorder.start(&path).unwrap();
        assert!(recorder.is_active());
        recorder.stop();
        assert!(!recorder.is_active());

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0],
            vec![
                "Timestamp",
                "Rotation X",
                "Rotation Y",
                "Rotation Z",
                "Acceleration X",
                "Acceleration Y",
                "Acceleration Z",
                "Temperature"
            ]
        );
    }

    #[test]
    fn missing_values_use_sentinel() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("log.csv");

        let mut recorder = CsvRecorder::new("N/A");
        recorder.start(&path).unwrap();
        recorder
            .write_row(&at(5), &[Some(1.0), Some(-2.5), Some(0.25), None, None, None, Some(21.5)])
            .unwrap();
        assert_eq!(recorder.rows_written(), 1);
        recorder.stop();

        let rows = read_rows(&path);
        assert_eq!(
            rows[1],
            vec!["2024-01-02 03:04:05.000000", "1.0", "-2.5", "0.25", "N/A", "N/A", "N/A", "21.5"]
        );
    }

    #[test]
    fn restarting_truncates_and_closes_previous_session() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");

        let mut recorder = CsvRecorder::new("N/A");
        recorder.start(&first).unwrap();
        recorder.write_row(&at(1), &[None; Channel::COUNT]).unwrap();
        recorder.start(&second).unwrap();
        assert_eq!(recorder.path(), Some(second.as_path()));
        assert_eq!(recorder.rows_written(), 0);
        recorder.stop();

        assert_eq!(read_rows(&first).len(), 2);
        assert_eq!(read_rows(&second).len(), 1);

        // same path again: truncated back to the header
        recorder.start(&first).unwrap();
        recorder.stop();
        assert_eq!(read_rows(&first).len(), 1);
    }

    #[test]
    fn write_without_session_is_rejected() {
        let mut recorder = CsvRecorder::new("N/A");
        let err = recorder.write_row(&at(0), &[None; Channel::COUNT]).unwrap_err();
        assert!(matches!(err, RecordingError::NotActive));
    }

    #[test]
    fn create_failure_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("log.csv");

        let mut recorder = CsvRecorder::new("N/A");
        let err = recorder.start(&path).unwrap_err();
        assert!(matches!(err, RecordingError::Create { .. }));
        assert!(!recorder.is_active());
    }

    /// Accepts the header, then fails every write once `fail` is set.
    struct FlakySink {
        fail: Arc<Mutex<bool>>,
    }

    impl Write for FlakySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if *self.fail.lock().unwrap() {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failure_closes_session() {
        let fail = Arc::new(Mutex::new(false));
        let sink = FlakySink { fail: Arc::clone(&fail) };

        let mut recorder = CsvRecorder::new("N/A");
        recorder
            .start_with_writer(Box::new(sink), PathBuf::from("flaky.csv"))
            .unwrap();
        recorder.write_row(&at(1), &[Some(1.0); Channel::COUNT]).unwrap();

        *fail.lock().unwrap() = true;
        assert!(recorder.write_row(&at(2), &[Some(2.0); Channel::COUNT]).is_err());
        assert!(!recorder.is_active());
    }
}
