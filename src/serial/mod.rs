//! # Serial ingestion
//!
//! Owns the device connection on a background thread and forwards decoded
//! text lines to the dispatch loop over an unbounded channel.
//!
//! The thread never blocks on the channel; its only blocking call is the
//! device read, bounded by the configured read timeout. Stop is cooperative:
//! the flag is checked once per read attempt.

pub mod reader;

pub use reader::{read_lines, ReaderState, SerialReader};

use log::warn;

/// Names of the serial ports present on this machine, sorted.
pub fn available_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => {
            let mut names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
            names.sort();
            names
        }
        Err(e) => {
            warn!("Failed to enumerate serial ports: {}", e);
            Vec::new()
        }
    }
}
