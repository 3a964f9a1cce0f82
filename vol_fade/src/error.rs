//! Error types for the vol_fade crate

use chrono::NaiveDate;
use thiserror::Error;

/// Custom error types for the vol_fade crate
#[derive(Debug, Error)]
pub enum StrategyError {
    /// Error related to input data validation
    #[error("Data error: {0}")]
    Data(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Error constructing an indicator
    #[error("Indicator error: {0}")]
    Indicator(String),

    /// A daily aggregate return at or below −100% cannot be log-compounded
    #[error("Daily return {value} on {date} is at or below -100% and cannot be compounded")]
    InvalidReturn { date: NaiveDate, value: f64 },

    /// Error from IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, StrategyError>;

impl From<signal_math::MathError> for StrategyError {
    fn from(err: signal_math::MathError) -> Self {
        StrategyError::Indicator(err.to_string())
    }
}

impl From<trade_data::DataError> for StrategyError {
    fn from(err: trade_data::DataError) -> Self {
        StrategyError::Data(err.to_string())
    }
}
