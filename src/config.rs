use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default settings file, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "serialscope.toml";

/// Environment variables that override the serial section.
pub const ENV_PORT: &str = "SERIALSCOPE_PORT";
pub const ENV_BAUD_RATE: &str = "SERIALSCOPE_BAUD_RATE";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub serial: SerialConfig,
    pub window: WindowConfig,
    pub plot: PlotConfig,
    pub dispatch: DispatchConfig,
    pub recording: RecordingConfig,
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

/// Serial device settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub port: String,
    pub baud_rate: u32,
    /// Upper bound on a single blocking read, and so on stop latency.
    pub read_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
    pub hardware_acceleration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Samples kept per channel
    pub history_capacity: usize,
    pub refresh_interval_ms: u64,
    pub plot_height: f32,
    pub colors: PlotColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotColors {
    pub x_axis: [u8; 3],
    pub y_axis: [u8; 3],
    pub z_axis: [u8; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    pub tick_interval_ms: u64,
    /// Write a CSV row for lines that carry no reading. Malformed lines never
    /// produce a row.
    pub record_unmatched_lines: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub path: String,
    /// Written in place of a channel that has never received a value.
    pub not_available: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub max_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset
    pub level: String,
}

impl Default for SerialConfig {
    fn default() -> Self {
        let port = if cfg!(windows) { "COM4" } else { "/dev/ttyUSB0" };
        Self {
            port: port.to_string(),
            baud_rate: 115_200,
            read_timeout_ms: 1000,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 900.0,
            title: "SerialScope - Serial Telemetry Viewer".to_string(),
            resizable: true,
            vsync: true,
            hardware_acceleration: true,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            refresh_interval_ms: 1000,
            plot_height: 260.0,
            colors: PlotColors::default(),
        }
    }
}

impl Default for PlotColors {
    fn default() -> Self {
        Self {
            x_axis: [31, 119, 180],
            y_axis: [255, 127, 14],
            z_axis: [44, 160, 44],
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            record_unmatched_lines: true,
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            path: "data_log.csv".to_string(),
            not_available: "N/A".to_string(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { max_lines: 1000 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::IoError)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::ParseError)?;

        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::SerializeError)?;

        std::fs::write(path, content).map_err(ConfigError::IoError)?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.serial.port.trim().is_empty() {
            return Err(ConfigError::ValidationError("Serial port must not be empty".to_string()));
        }

        if self.serial.baud_rate == 0 {
            return Err(ConfigError::ValidationError("Baud rate must be positive".to_string()));
        }

        if self.serial.read_timeout_ms == 0 {
            return Err(ConfigError::ValidationError("Read timeout must be positive".to_string()));
        }

        if self.plot.history_capacity == 0 {
            return Err(ConfigError::ValidationError("History capacity must be positive".to_string()));
        }

        if self.plot.refresh_interval_ms == 0 || self.dispatch.tick_interval_ms == 0 {
            return Err(ConfigError::ValidationError("Refresh and tick intervals must be positive".to_string()));
        }

        if self.recording.path.trim().is_empty() {
            return Err(ConfigError::ValidationError("Recording path must not be empty".to_string()));
        }

        if self.console.max_lines == 0 {
            return Err(ConfigError::ValidationError("Console line limit must be positive".to_string()));
        }

        Ok(())
    }

    /// Apply `SERIALSCOPE_PORT` / `SERIALSCOPE_BAUD_RATE` overrides, reading a
    /// `.env` file first if there is one.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        dotenv::dotenv().ok();
        self.apply_overrides(
            std::env::var(ENV_PORT).ok(),
            std::env::var(ENV_BAUD_RATE).ok(),
        )
    }

    fn apply_overrides(&mut self, port: Option<String>, baud_rate: Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = port.filter(|p| !p.trim().is_empty()) {
            self.serial.port = port;
        }

        if let Some(baud) = baud_rate {
            self.serial.baud_rate = baud.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("{} is not a valid baud rate: {}", ENV_BAUD_RATE, baud))
            })?;
        }

        self.validate()
    }

    pub fn recording_path(&self) -> PathBuf {
        PathBuf::from(&self.recording.path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Owns the live configuration and where it was loaded from.
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Load `path` if it exists, otherwise start from defaults that will be
    /// saved to `path`. Environment overrides are applied either way.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut manager = if path.as_ref().exists() {
            Self::load_from_file(&path)?
        } else {
            Self {
                config: AppConfig::default(),
                config_path: Some(path.as_ref().to_path_buf()),
            }
        };
        manager.config.apply_env_overrides()?;
        Ok(manager)
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Write the current configuration back to where it came from.
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.validate()?;
            self.config.save_to_file(path)?;
        }
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
