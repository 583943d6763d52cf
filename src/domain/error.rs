//! Domain error types

use thiserror::Error;

/// Errors that can occur in the rig control application
#[derive(Error, Debug)]
pub enum SatrigError {
    #[error("Serial port error: {0}")]
    Serial(String),

    #[error("CI-V command error: {0}")]
    Civ(String),

    #[error("Ephemeris error: {0}")]
    Ephemeris(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rig control operations
pub type SatrigResult<T> = Result<T, SatrigError>;
