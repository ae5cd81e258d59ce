use crossbeam_channel::Sender;
use log::{debug, error, info, trace};
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::config::SerialConfig;
use crate::error::{ConnectionError, ReaderError};
use crate::types::IngestEvent;

/// Longest line kept while waiting for a terminator. Longer input is dropped
/// up to the next `\n`.
pub const MAX_LINE_BYTES: usize = 4096;

/// Lifecycle of the reader thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ReaderState {
    Idle = 0,
    Connecting = 1,
    Reading = 2,
    Stopped = 3,
    Failed = 4,
}

impl ReaderState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => ReaderState::Connecting,
            2 => ReaderState::Reading,
            3 => ReaderState::Stopped,
            4 => ReaderState::Failed,
            _ => ReaderState::Idle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReaderState::Idle => "Idle",
            ReaderState::Connecting => "Connecting",
            ReaderState::Reading => "Reading",
            ReaderState::Stopped => "Stopped",
            ReaderState::Failed => "Failed",
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, ReaderState::Connecting | ReaderState::Reading)
    }
}

/// Reader state shared between the reader thread and the GUI.
#[derive(Debug, Clone)]
struct SharedState(Arc<AtomicU8>);

impl SharedState {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ReaderState::Idle as u8)))
    }

    fn set(&self, state: ReaderState) {
        self.0.store(state as u8, Ordering::Release);
    }

    fn get(&self) -> ReaderState {
        ReaderState::from_u8(self.0.load(Ordering::Acquire))
    }
}

/// Handle to the background serial reader.
///
/// At most one reader thread runs at a time. Each start gets its own stop
/// flag, so a thread that is still winding down never sees a later start.
pub struct SerialReader {
    sender: Sender<IngestEvent>,
    state: SharedState,
    stop_flag: Option<Arc<AtomicBool>>,
    handle: Option<JoinHandle<()>>,
}

impl SerialReader {
    pub fn new(sender: Sender<IngestEvent>) -> Self {
        Self {
            sender,
            state: SharedState::new(),
            stop_flag: None,
            handle: None,
        }
    }

    pub fn state(&self) -> ReaderState {
        self.state.get()
    }

    /// True while a reader thread exists and has not exited.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Open the configured serial port on a new reader thread.
    pub fn start(&mut self, config: &SerialConfig) -> Result<(), ReaderError> {
        let port = config.port.clone();
        let baud_rate = config.baud_rate;
        let timeout = Duration::from_millis(config.read_timeout_ms);

        self.start_with(port.clone(), move || open_port(&port, baud_rate, timeout))
    }

    /// Start a reader thread whose device is produced by `opener`.
    ///
    /// `opener` runs on the reader thread, so a slow open never blocks the GUI.
    pub fn start_with<F, R>(&mut self, port: String, opener: F) -> Result<(), ReaderError>
    where
        F: FnOnce() -> Result<R, ConnectionError> + Send + 'static,
        R: Read + Send + 'static,
    {
        if self.is_running() {
            return Err(ReaderError::AlreadyRunning);
        }
        // reap the previous, already finished thread
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Previous serial reader thread panicked");
            }
        }

        let stop_flag = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop_flag);
        let sender = self.sender.clone();
        let state = self.state.clone();

        state.set(ReaderState::Connecting);
        let handle = thread::Builder::new()
            .name("serial-reader".to_string())
            .spawn(move || run_reader(port, opener, sender, thread_stop, state))
            .map_err(|e| {
                self.state.set(ReaderState::Failed);
                ReaderError::Spawn(e)
            })?;

        self.stop_flag = Some(stop_flag);
        self.handle = Some(handle);
        Ok(())
    }

    /// Ask the reader thread to exit. Takes effect within one read timeout.
    pub fn stop(&mut self) {
        if let Some(flag) = self.stop_flag.take() {
            flag.store(true, Ordering::Release);
            info!("Stop requested for serial reader");
        }
    }

    /// Stop and wait for the thread to exit.
    pub fn shutdown(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Serial reader thread panicked");
            }
        }
    }
}

impl Drop for SerialReader {
    fn drop(&mut self) {
        self.stop();
    }
}

fn open_port(port: &str, baud_rate: u32, timeout: Duration) -> Result<Box<dyn serialport::SerialPort>, ConnectionError> {
    serialport::new(port, baud_rate)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .stop_bits(serialport::StopBits::One)
        .flow_control(serialport::FlowControl::None)
        .timeout(timeout)
        .open()
        .map_err(|e| ConnectionError::Open {
            port: port.to_string(),
            reason: e.to_string(),
        })
}

fn run_reader<F, R>(
    port: String,
    opener: F,
    sender: Sender<IngestEvent>,
    stop_flag: Arc<AtomicBool>,
    state: SharedState,
) where
    F: FnOnce() -> Result<R, ConnectionError>,
    R: Read,
{
    debug!("Opening serial port {}", port);
    let device = match opener() {
        Ok(device) => device,
        Err(e) => {
            error!("{}", e);
            state.set(ReaderState::Failed);
            let _ = sender.send(IngestEvent::ConnectionFailed(e.to_string()));
            return;
        }
    };

    info!("Serial port {} open, reading", port);
    state.set(ReaderState::Reading);
    if sender.send(IngestEvent::Connected { port: port.clone() }).is_err() {
        state.set(ReaderState::Stopped);
        return;
    }

    match read_lines(device, &sender, &stop_flag) {
        Ok(()) => {
            info!("Serial reader on {} stopped", port);
            state.set(ReaderState::Stopped);
            let _ = sender.send(IngestEvent::Stopped { port });
        }
        Err(source) => {
            let e = ConnectionError::Read { port, source };
            error!("{}", e);
            state.set(ReaderState::Failed);
            let _ = sender.send(IngestEvent::ConnectionFailed(e.to_string()));
        }
    }
}

/// Read newline-terminated lines until the stop flag is set, the source ends,
/// or the receiver goes away.
///
/// Timeouts are not errors: a partial line is kept and completed by later
/// reads. Lines that are not valid UTF-8 or longer than [`MAX_LINE_BYTES`]
/// are dropped.
pub fn read_lines<R: Read>(
    mut device: R,
    sender: &Sender<IngestEvent>,
    stop_flag: &AtomicBool,
) -> io::Result<()> {
    let mut framer = LineFramer::new(MAX_LINE_BYTES);
    let mut chunk = [0u8; 256];

    while !stop_flag.load(Ordering::Acquire) {
        let n = match device.read(&mut chunk) {
            Ok(0) => {
                debug!("Serial source reached end of stream");
                break;
            }
            Ok(n) => n,
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                continue;
            }
            Err(e) => return Err(e),
        };

        for line in framer.push(&chunk[..n]) {
            if sender.send(IngestEvent::Line(line)).is_err() {
                debug!("Dispatch channel closed, reader exiting");
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Splits a byte stream on `\n`, holding at most `max_len` bytes of an
/// unterminated line.
#[derive(Debug)]
struct LineFramer {
    pending: Vec<u8>,
    max_len: usize,
    /// Inside an overlong line; skip until the next terminator
    discarding: bool,
}

impl LineFramer {
    fn new(max_len: usize) -> Self {
        Self {
            pending: Vec::with_capacity(256),
            max_len,
            discarding: false,
        }
    }

    /// Append `bytes` and return every line they complete.
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut lines = Vec::new();
        self.pending.extend_from_slice(bytes);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.pending.drain(..=pos).collect();
            if self.discarding {
                self.discarding = false;
                continue;
            }
            lines.extend(decode_line(&raw));
        }

        if self.pending.len() > self.max_len {
            debug!(
                "Dropping {} bytes with no line terminator (limit {})",
                self.pending.len(),
                self.max_len
            );
            self.pending.clear();
            self.discarding = true;
        }

        lines
    }

    #[cfg(test)]
    fn buffered(&self) -> usize {
        self.pending.len()
    }
}

/// UTF-8 decode and trim. `None` for empty or undecodable lines.
fn decode_line(raw: &[u8]) -> Option<String> {
    match std::str::from_utf8(raw) {
        Ok(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Err(e) => {
            trace!("Dropping undecodable line ({} bytes): {}", raw.len(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::collections::VecDeque;
    use std::time::Instant;

    /// Replays scripted reads; `Err` entries become timeouts.
    struct ScriptedPort {
        script: VecDeque<Result<Vec<u8>, io::ErrorKind>>,
        /// Behaviour once the script runs out
        tail: Option<io::ErrorKind>,
    }

    fn data(bytes: &[u8]) -> Result<Vec<u8>, io::ErrorKind> {
        Ok(bytes.to_vec())
    }

    impl ScriptedPort {
        fn new(script: Vec<Result<Vec<u8>, io::ErrorKind>>) -> Self {
            Self {
                script: script.into(),
                tail: None,
            }
        }

        fn then_time_out(mut self) -> Self {
            self.tail = Some(io::ErrorKind::TimedOut);
            self
        }
    }

    impl Read for ScriptedPort {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.script.pop_front() {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(kind)) => Err(io::Error::new(kind, "scripted")),
                None => match self.tail {
                    Some(kind) => {
                        thread::sleep(Duration::from_millis(5));
                        Err(io::Error::new(kind, "scripted"))
                    }
                    None => Ok(0),
                },
            }
        }
    }

    fn lines(events: Vec<IngestEvent>) -> Vec<String> {
        events
            .into_iter()
            .filter_map(|e| match e {
                IngestEvent::Line(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    fn wait_for_state(reader: &SerialReader, expected: ReaderState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while reader.state() != expected {
            assert!(Instant::now() < deadline, "reader never reached {:?}", expected);
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn splits_and_trims_lines() {
        let (tx, rx) = unbounded();
        let port = ScriptedPort::new(vec![data(b"Rotation X: 1, Y: 2, Z: 3\r\nTemp"), data(b"erature: 20\r\n\r\n")]);
        read_lines(port, &tx, &AtomicBool::new(false)).unwrap();

        let received: Vec<_> = rx.try_iter().collect();
        assert_eq!(lines(received), vec!["Rotation X: 1, Y: 2, Z: 3", "Temperature: 20"]);
    }

    #[test]
    fn timeout_keeps_partial_line() {
        let (tx, rx) = unbounded();
        let port = ScriptedPort::new(vec![
            data(b"Accel"),
            Err(io::ErrorKind::TimedOut),
            data(b"eration X: 1, Y: 2, Z: 3\n"),
        ]);
        read_lines(port, &tx, &AtomicBool::new(false)).unwrap();

        assert_eq!(lines(rx.try_iter().collect()), vec!["Acceleration X: 1, Y: 2, Z: 3"]);
    }

    #[test]
    fn overlong_line_is_dropped_and_buffer_stays_bounded() {
        let mut framer = LineFramer::new(MAX_LINE_BYTES);
        let noise = [b'A'; 256];
        for _ in 0..(MAX_LINE_BYTES / noise.len()) * 3 {
            assert!(framer.push(&noise).is_empty());
            assert!(framer.buffered() <= MAX_LINE_BYTES);
        }

        // the tail of the overlong line is discarded with it
        assert_eq!(framer.push(b"AAAA\nTemperature: 20\n"), vec!["Temperature: 20"]);
        assert_eq!(framer.buffered(), 0);
    }

    #[test]
    fn line_at_limit_is_kept() {
        let mut framer = LineFramer::new(8);
        assert_eq!(framer.push(b"12345678"), Vec::<String>::new());
        assert_eq!(framer.push(b"\n"), vec!["12345678"]);
    }

    #[test]
    fn reader_recovers_after_unterminated_noise() {
        let (tx, rx) = unbounded();
        let mut script: Vec<_> = (0..(MAX_LINE_BYTES / 256) + 2).map(|_| data(&[0x55; 256])).collect();
        script.push(data(b"\nRotation X: 1, Y: 2, Z: 3\n"));
        read_lines(ScriptedPort::new(script), &tx, &AtomicBool::new(false)).unwrap();

        assert_eq!(lines(rx.try_iter().collect()), vec!["Rotation X: 1, Y: 2, Z: 3"]);
    }

    #[test]
    fn restart_after_panicked_reader() {
        let (tx, rx) = unbounded();
        let mut reader = SerialReader::new(tx);

        reader
            .start_with("boom".to_string(), || -> Result<ScriptedPort, ConnectionError> {
                panic!("driver crashed")
            })
            .unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        while reader.is_running() {
            assert!(Instant::now() < deadline, "panicking reader never exited");
            thread::sleep(Duration::from_millis(5));
        }

        reader
            .start_with("scripted".to_string(), || Ok(ScriptedPort::new(vec![]).then_time_out()))
            .unwrap();
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            IngestEvent::Connected { port: "scripted".to_string() }
        );
        reader.shutdown();
        assert_eq!(reader.state(), ReaderState::Stopped);
    }

    #[test]
    fn undecodable_lines_are_skipped() {
        let (tx, rx) = unbounded();
        let port = ScriptedPort::new(vec![data(b"\xff\xfe\n"), data(b"ok\n")]);
        read_lines(port, &tx, &AtomicBool::new(false)).unwrap();

        assert_eq!(lines(rx.try_iter().collect()), vec!["ok"]);
    }

    #[test]
    fn stop_flag_ends_loop_before_reading() {
        let (tx, rx) = unbounded();
        let port = ScriptedPort::new(vec![data(b"never read\n")]);
        read_lines(port, &tx, &AtomicBool::new(true)).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn read_error_is_returned() {
        let (tx, _rx) = unbounded();
        let port = ScriptedPort::new(vec![Err(io::ErrorKind::BrokenPipe)]);
        let err = read_lines(port, &tx, &AtomicBool::new(false)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn open_failure_reports_connection_error() {
        let (tx, rx) = unbounded();
        let mut reader = SerialReader::new(tx);
        reader
            .start_with("/dev/missing".to_string(), || -> Result<ScriptedPort, _> {
                Err(ConnectionError::Open {
                    port: "/dev/missing".to_string(),
                    reason: "No such file or directory".to_string(),
                })
            })
            .unwrap();
        reader.shutdown();

        assert_eq!(reader.state(), ReaderState::Failed);
        match rx.try_recv().unwrap() {
            IngestEvent::ConnectionFailed(msg) => assert!(msg.contains("/dev/missing")),
            other => panic!("Expected ConnectionFailed, got: {:?}", other),
        }
    }

    #[test]
    fn start_read_stop_lifecycle() {
        let (tx, rx) = unbounded();
        let mut reader = SerialReader::new(tx);
        assert_eq!(reader.state(), ReaderState::Idle);

        reader
            .start_with("scripted".to_string(), || {
                Ok(ScriptedPort::new(vec![data(b"Temperature: 21.5 C\n")]).then_time_out())
            })
            .unwrap();
        let timeout = Duration::from_secs(5);
        assert_eq!(
            rx.recv_timeout(timeout).unwrap(),
            IngestEvent::Connected { port: "scripted".to_string() }
        );
        assert_eq!(
            rx.recv_timeout(timeout).unwrap(),
            IngestEvent::Line("Temperature: 21.5 C".to_string())
        );
        assert_eq!(reader.state(), ReaderState::Reading);
        assert!(reader.is_running());

        // a second start while the first thread is alive is refused
        let again = reader.start_with("scripted".to_string(), || Ok(ScriptedPort::new(vec![])));
        assert!(matches!(again, Err(ReaderError::AlreadyRunning)));

        reader.shutdown();
        assert_eq!(reader.state(), ReaderState::Stopped);
        assert!(!reader.is_running());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events, vec![IngestEvent::Stopped { port: "scripted".to_string() }]);
    }

    #[test]
    fn can_restart_after_stop() {
        let (tx, rx) = unbounded();
        let mut reader = SerialReader::new(tx);

        for i in 0..2 {
            reader
                .start_with(format!("run{}", i), || Ok(ScriptedPort::new(vec![]).then_time_out()))
                .unwrap();
            wait_for_state(&reader, ReaderState::Reading);
            reader.shutdown();
        }

        let stopped = rx
            .try_iter()
            .filter(|e| matches!(e, IngestEvent::Stopped { .. }))
            .count();
        assert_eq!(stopped, 2);
    }
}
