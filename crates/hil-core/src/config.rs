//! Configuration loading and typed config structures for the HIL simulation.
//!
//! The canonical configuration lives in `hil-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty or partial file is valid.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::params::{ParamError, SensorParams};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A timing value is out of range.
    #[error("invalid timing configuration: {reason}")]
    InvalidTiming {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// An initial sensor parameter failed the same validation that
    /// operator commands go through.
    #[error("invalid sensor configuration: {source}")]
    Sensor {
        /// The underlying parameter error.
        #[from]
        source: ParamError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `hil-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Tick timing and run length.
    #[serde(default)]
    pub simulation: TimingConfig,

    /// Initial sensor model parameters.
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Artifact output paths.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or a
    /// validation error if any value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or a
    /// validation error if any value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects an empty document; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        let _ = self.sensor.to_params()?;
        Ok(())
    }
}

/// Tick timing configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingConfig {
    /// Total simulated run length in seconds. Ticks run while `t < duration`.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,

    /// Fixed simulated time step in seconds.
    #[serde(default = "default_dt_secs")]
    pub dt_secs: f64,

    /// Sleep between command polls while paused, in milliseconds.
    #[serde(default = "default_pause_poll_interval_ms")]
    pub pause_poll_interval_ms: u64,

    /// Seed for the sensor noise source. Unseeded runs use the thread RNG.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl TimingConfig {
    /// Validate the timing values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTiming`] if the duration or step is not
    /// a positive finite number, or the pause poll interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(ConfigError::InvalidTiming {
                reason: format!(
                    "duration_secs must be a positive number (got {})",
                    self.duration_secs
                ),
            });
        }
        if !self.dt_secs.is_finite() || self.dt_secs <= 0.0 {
            return Err(ConfigError::InvalidTiming {
                reason: format!("dt_secs must be a positive number (got {})", self.dt_secs),
            });
        }
        if self.pause_poll_interval_ms == 0 {
            return Err(ConfigError::InvalidTiming {
                reason: "pause_poll_interval_ms must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// The pause poll interval as a [`Duration`].
    pub const fn pause_poll_interval(&self) -> Duration {
        Duration::from_millis(self.pause_poll_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            dt_secs: default_dt_secs(),
            pause_poll_interval_ms: default_pause_poll_interval_ms(),
            seed: None,
        }
    }
}

/// Initial sensor model parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SensorConfig {
    /// Sine amplitude in rad/s.
    #[serde(default = "default_amplitude")]
    pub amplitude: f64,

    /// Sine frequency in Hz.
    #[serde(default = "default_frequency")]
    pub frequency: f64,

    /// Standard deviation of the Gaussian noise term.
    #[serde(default = "default_noise_std")]
    pub noise_std: f64,
}

impl SensorConfig {
    /// Build validated [`SensorParams`] from this section.
    ///
    /// # Errors
    ///
    /// Returns [`ParamError`] if any value would be rejected as an operator
    /// command.
    pub fn to_params(&self) -> Result<SensorParams, ParamError> {
        SensorParams::new(self.amplitude, self.frequency, self.noise_std)
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            amplitude: default_amplitude(),
            frequency: default_frequency(),
            noise_std: default_noise_std(),
        }
    }
}

/// Paths of the two artifacts written after a clean exit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// CSV log of every recorded sample.
    #[serde(default = "default_log_path")]
    pub log_path: PathBuf,

    /// SVG plot of reading vs. time.
    #[serde(default = "default_plot_path")]
    pub plot_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            log_path: default_log_path(),
            plot_path: default_plot_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_duration_secs() -> f64 {
    10.0
}

const fn default_dt_secs() -> f64 {
    0.1
}

const fn default_pause_poll_interval_ms() -> u64 {
    100
}

const fn default_amplitude() -> f64 {
    1.0
}

const fn default_frequency() -> f64 {
    0.5
}

const fn default_noise_std() -> f64 {
    0.1
}

fn default_log_path() -> PathBuf {
    PathBuf::from("hil_simulation_log.txt")
}

fn default_plot_path() -> PathBuf {
    PathBuf::from("gyro_data_interactive.svg")
}

fn default_log_level() -> String {
    "info".to_owned()
}
