//! Telemetry: structured logging initialization.

pub mod logging;

pub use logging::init_logging;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Logging initialization error: {0}")]
    Init(String),
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
