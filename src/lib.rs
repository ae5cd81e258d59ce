//! # SerialScope
//!
//! Live viewer and CSV recorder for line-oriented IMU telemetry read from a
//! serial port.
//!
//! A background thread reads lines from the device and pushes them onto an
//! unbounded channel; the GUI thread drains it on a fixed tick, parses each
//! line, updates the rolling per-channel history and, while recording, writes
//! one CSV row per reading.

pub mod app;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod parser;
pub mod plotter;
pub mod recorder;
pub mod serial;
pub mod store;
pub mod types;
pub mod utils;
