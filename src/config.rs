use std::env;

use thiserror::Error;

use crate::over_prob::ModelWeights;
use crate::value_detect::DetectorConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("indicator weights must sum to 1.0, got {0:.6}")]
    WeightSum(f64),
    #[error("weight `{name}` out of [0, 1]: {value}")]
    WeightRange { name: &'static str, value: f64 },
    #[error("threshold `{name}` invalid: {value}")]
    Threshold { name: &'static str, value: f64 },
}

/// Everything one analysis run needs: the market line, the blend weights
/// and the detector thresholds. A single immutable value injected into the
/// pipeline, so tests can override any of it per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    pub market_line: f64,
    pub weights: ModelWeights,
    pub detector: DetectorConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            market_line: 1.5,
            weights: ModelWeights::default(),
            detector: DetectorConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Builds a config from environment variables, falling back to the
    /// defaults and clamping each override into its sane range. Variable
    /// names follow the longstanding deployment convention
    /// (`MIN_EV_THRESHOLD`, `MIN_CONFIDENCE_SCORE`, ...).
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        cfg.market_line = env_f64("MARKET_LINE", cfg.market_line).clamp(0.5, 6.5);
        cfg.detector.min_probability =
            env_f64("MIN_PROBABILITY", cfg.detector.min_probability).clamp(0.0, 1.0);
        cfg.detector.min_confidence =
            env_f64("MIN_CONFIDENCE_SCORE", cfg.detector.min_confidence).clamp(0.0, 100.0);
        cfg.detector.min_ev = env_f64("MIN_EV_THRESHOLD", cfg.detector.min_ev).clamp(0.0, 1.0);
        cfg.detector.min_odds = env_f64("MIN_ODDS", cfg.detector.min_odds).max(1.01);
        cfg.detector.max_odds =
            env_f64("MAX_ODDS", cfg.detector.max_odds).max(cfg.detector.min_odds);
        cfg.detector.kelly_multiplier =
            env_f64("KELLY_FRACTION", cfg.detector.kelly_multiplier).clamp(0.01, 1.0);
        cfg.detector.max_stake = env_f64("MAX_STAKE", cfg.detector.max_stake).clamp(0.0, 1.0);

        cfg
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.market_line.is_finite() || self.market_line <= 0.0 {
            return Err(ConfigError::Threshold {
                name: "market_line",
                value: self.market_line,
            });
        }
        self.weights.validate()?;
        self.detector.validate()
    }
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}
