use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File not found or could not be read: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse simulation config JSON: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to write statistics: {0}")]
    StatisticsError(#[from] csv::Error),

    #[error("Failed to build simulation model: {0}")]
    ConversionError(#[from] ConversionError),
}

/// Errors raised while turning DTOs (or CLI overrides) into validated domain types.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("Unknown strategy type: {0}")]
    UnknownStrategyType(String),

    #[error("Probability '{name}' must lie in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("Range '{name}' is inverted: [{low}, {high}]")]
    InvalidRange { name: &'static str, low: f64, high: f64 },

    #[error("Parameter '{name}' is invalid: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
