use chrono::Local;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;

/// Initialise env_logger. `RUST_LOG` wins over `default_level`.
pub fn init_logger(default_level: &str) {
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let level_color = match record.level() {
                Level::Error => "\x1b[31m\x1b[1m",
                Level::Warn => "\x1b[33m\x1b[1m",
                Level::Info => "\x1b[32m\x1b[1m",
                Level::Debug => "\x1b[36m\x1b[1m",
                Level::Trace => "\x1b[90m\x1b[1m",
            };
            let thread = std::thread::current();
            writeln!(
                buf,
                "{} {}{:<5}\x1b[0m [{}] [{}:{}] {}",
                time,
                level_color,
                record.level(),
                thread.name().unwrap_or("?"),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .init();
}
