//! Pipeline configuration
//!
//! All tunable constants live in one structure passed into the pipeline, so
//! multiple parameterizations can run side by side without interference.

use crate::error::{Result, StrategyError};
use crate::garch::GarchSpec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Source of the daily directional bias.
///
/// Exactly one rule is active per run; the builder never mixes sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DailyBiasRule {
    /// +1 when the session closed above its open, −1 otherwise
    OhlcSign,
    /// Sign of the prediction premium; absent when the premium is absent or zero
    PremiumSign,
}

/// Configuration for the full pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Trailing window for realized variance and each model refit, in sessions
    pub variance_window: usize,
    /// Volatility model order and fit limits
    pub garch: GarchSpec,
    /// RSI lookback, in intraday bars
    pub rsi_window: usize,
    /// Volatility band lookback, in intraday bars
    pub band_window: usize,
    /// Band width, in standard deviations
    pub band_multiplier: f64,
    /// RSI level above which a bar counts as overbought
    pub rsi_overbought: f64,
    /// RSI level below which a bar counts as oversold
    pub rsi_oversold: f64,
    /// Which rule produces the daily bias
    pub bias_rule: DailyBiasRule,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            variance_window: 180,
            garch: GarchSpec::default(),
            rsi_window: 20,
            band_window: 20,
            band_multiplier: 2.0,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            bias_rule: DailyBiasRule::OhlcSign,
        }
    }
}

impl StrategyConfig {
    /// Check the configuration for internally consistent, usable values
    pub fn validate(&self) -> Result<()> {
        if self.variance_window < 2 {
            return Err(StrategyError::InvalidParameter(
                "variance_window must be at least two sessions".to_string(),
            ));
        }
        if self.rsi_window == 0 {
            return Err(StrategyError::InvalidParameter(
                "rsi_window must be greater than zero".to_string(),
            ));
        }
        if self.band_window < 2 {
            return Err(StrategyError::InvalidParameter(
                "band_window must be at least two bars".to_string(),
            ));
        }
        if !self.band_multiplier.is_finite() || self.band_multiplier <= 0.0 {
            return Err(StrategyError::InvalidParameter(
                "band_multiplier must be positive and finite".to_string(),
            ));
        }
        if self.rsi_oversold >= self.rsi_overbought {
            return Err(StrategyError::InvalidParameter(format!(
                "rsi_oversold ({}) must be below rsi_overbought ({})",
                self.rsi_oversold, self.rsi_overbought
            )));
        }
        self.garch.validate()
    }

    /// Parse a configuration from a JSON string; omitted fields use defaults
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_parameters() {
        let config = StrategyConfig::default();
        assert_eq!(config.variance_window, 180);
        assert_eq!(config.garch.p, 1);
        assert_eq!(config.garch.q, 3);
        assert_eq!(config.rsi_window, 20);
        assert_eq!(config.band_window, 20);
        assert_eq!(config.band_multiplier, 2.0);
        assert_eq!(config.rsi_overbought, 70.0);
        assert_eq!(config.rsi_oversold, 30.0);
        assert_eq!(config.bias_rule, DailyBiasRule::OhlcSign);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config =
            StrategyConfig::from_json_str(r#"{"variance_window": 60, "bias_rule": "premium_sign"}"#)
                .unwrap();
        assert_eq!(config.variance_window, 60);
        assert_eq!(config.bias_rule, DailyBiasRule::PremiumSign);
        assert_eq!(config.rsi_window, 20);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = StrategyConfig::default();
        config.variance_window = 1;
        assert!(config.validate().is_err());

        let mut config = StrategyConfig::default();
        config.rsi_oversold = 80.0;
        assert!(config.validate().is_err());

        let mut config = StrategyConfig::default();
        config.band_multiplier = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_round_trip_preserves_the_config() {
        let config = StrategyConfig {
            variance_window: 90,
            bias_rule: DailyBiasRule::PremiumSign,
            ..StrategyConfig::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        let parsed = StrategyConfig::from_json_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
