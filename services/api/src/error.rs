//! services/api/src/error.rs
//!
//! Defines the error type returned while starting and running the service.
//! Per-request failures are handled in `web::protocol`.

use crate::config::ConfigError;

/// The primary error type for the `quiz_api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
