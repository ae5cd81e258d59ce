/// Messages sent from the reader thread to the dispatch loop.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    /// The port opened and the reader entered its read loop.
    Connected { port: String },
    /// One decoded, trimmed, non-empty line from the device.
    Line(String),
    /// The port could not be opened, or a read failed.
    ConnectionFailed(String),
    /// The reader observed its stop flag and exited.
    Stopped { port: String },
}
