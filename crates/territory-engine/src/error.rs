//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: territory_core::config::ConfigError,
    },

    /// Building the initial simulation state failed.
    #[error("setup error: {source}")]
    Setup {
        /// The underlying setup error.
        #[from]
        source: territory_core::setup::SetupError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: territory_core::runner::RunnerError,
    },

    /// Terminal setup or drawing failed.
    #[error("terminal error: {source}")]
    Terminal {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The run report could not be encoded.
    #[error("report encoding error: {source}")]
    ReportEncode {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The run report could not be written.
    #[error("failed to write report to {path}: {source}")]
    ReportWrite {
        /// Destination path.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The input task panicked or was cancelled.
    #[error("input task error: {message}")]
    InputTask {
        /// Description of the failure.
        message: String,
    },
}
