//! # Signal Math
//!
//! Incremental indicator arithmetic shared by the volatility-fade pipeline.
//! Indicators are small state machines fed one observation at a time; while
//! their lookback window is still filling they report `None` instead of a
//! value, so warm-up gaps stay explicit and never leak NaNs into downstream
//! arithmetic.

use thiserror::Error;

pub mod oscillators;
pub mod volatility;

pub use oscillators::Rsi;
pub use volatility::{BandSnapshot, RollingVariance, VolatilityBands};

/// Errors that can occur when constructing indicators
#[derive(Error, Debug)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for indicator construction
pub type Result<T> = std::result::Result<T, MathError>;
