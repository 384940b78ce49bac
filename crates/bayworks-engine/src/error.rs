//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and the simulation run.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: bayworks_core::config::ConfigError,
    },

    /// Building or ticking the colony failed.
    #[error("colony error: {source}")]
    Colony {
        /// The underlying colony error.
        #[from]
        source: bayworks_core::error::ColonyError,
    },
}
