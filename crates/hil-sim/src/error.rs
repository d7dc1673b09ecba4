//! Error types for the simulation binary.
//!
//! [`SimError`] is the top-level error type that wraps every failure mode
//! during startup, the run itself, and artifact output.

/// Top-level error for the simulation binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hil_core::config::ConfigError,
    },

    /// The initial sensor parameters were rejected.
    #[error("sensor parameter error: {source}")]
    Params {
        /// The underlying parameter error.
        #[from]
        source: hil_core::params::ParamError,
    },

    /// The operator input reader could not be started.
    #[error("input error: {source}")]
    Input {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: hil_core::runner::RunnerError,
    },

    /// Writing the log or plot failed.
    #[error("report error: {source}")]
    Report {
        /// The underlying report error.
        #[from]
        source: hil_core::report::ReportError,
    },
}
