use chrono::Utc;
use tracing::debug;

use crate::config::ConfigError;
use crate::types::{Fixture, OddsQuote, Opportunity, ProbabilityEstimate, QualityTier, RiskTier};

/// Eligibility thresholds and staking parameters for the detector.
/// The minimum-odds floor is 1.35: below that the payout rarely covers the
/// model's own calibration error on this market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectorConfig {
    pub min_probability: f64,
    /// On the 0-100 confidence scale.
    pub min_confidence: f64,
    pub min_odds: f64,
    pub max_odds: f64,
    pub min_ev: f64,
    /// Fractional-Kelly damping multiplier.
    pub kelly_multiplier: f64,
    /// Hard cap on the stake, as a fraction of bankroll.
    pub max_stake: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_probability: 0.65,
            min_confidence: 60.0,
            min_odds: 1.35,
            max_odds: 2.50,
            min_ev: 0.05,
            kelly_multiplier: 0.25,
            max_stake: 0.10,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, f64, bool); 5] = [
            (
                "min_probability",
                self.min_probability,
                (0.0..=1.0).contains(&self.min_probability),
            ),
            (
                "min_confidence",
                self.min_confidence,
                (0.0..=100.0).contains(&self.min_confidence),
            ),
            ("min_odds", self.min_odds, self.min_odds > 1.0),
            ("max_odds", self.max_odds, self.max_odds >= self.min_odds),
            (
                "kelly_multiplier",
                self.kelly_multiplier,
                self.kelly_multiplier > 0.0 && self.kelly_multiplier <= 1.0,
            ),
        ];
        for (name, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ConfigError::Threshold { name, value });
            }
        }
        if !self.max_stake.is_finite() || !(0.0..=1.0).contains(&self.max_stake) {
            return Err(ConfigError::Threshold {
                name: "max_stake",
                value: self.max_stake,
            });
        }
        Ok(())
    }
}

/// Expected value of a unit bet: `p * odds - 1`. Kept exact; rounding is a
/// display concern only.
pub fn expected_value(probability: f64, decimal_odds: f64) -> f64 {
    probability * decimal_odds - 1.0
}

/// Break-even odds for a probability, the advisory companion to the
/// detector. `None` for a zero or malformed probability.
pub fn fair_odds(probability: f64) -> Option<f64> {
    if probability.is_finite() && probability > 0.0 {
        Some(1.0 / probability)
    } else {
        None
    }
}

/// Fractional-Kelly stake. A non-positive full-Kelly edge yields zero,
/// never a negative stake.
pub fn kelly_stake(probability: f64, decimal_odds: f64, cfg: &DetectorConfig) -> f64 {
    let b = decimal_odds - 1.0;
    if b <= 0.0 || !b.is_finite() || !probability.is_finite() {
        return 0.0;
    }
    let q = 1.0 - probability;
    let full_kelly = (b * probability - q) / b;
    (full_kelly * cfg.kelly_multiplier).clamp(0.0, cfg.max_stake)
}

/// Decides whether the (probability, quote) pair is a value bet and, if
/// so, builds the full opportunity record. Degenerate quotes and inputs
/// return `None` rather than an error; a batch never aborts on one
/// fixture.
pub fn detect(
    fixture: &Fixture,
    estimate: &ProbabilityEstimate,
    odds: &OddsQuote,
    cfg: &DetectorConfig,
) -> Option<Opportunity> {
    let probability = estimate.probability;
    let confidence = estimate.confidence;
    let quote = odds.decimal_odds;

    if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
        debug!(match_id = fixture.match_id, probability, "invalid probability, skipping");
        return None;
    }
    if !quote.is_finite() || quote <= 1.0 {
        debug!(match_id = fixture.match_id, quote, "degenerate odds quote, skipping");
        return None;
    }
    if probability < cfg.min_probability
        || confidence < cfg.min_confidence
        || quote < cfg.min_odds
        || quote > cfg.max_odds
    {
        return None;
    }

    let ev = expected_value(probability, quote);
    if ev < cfg.min_ev {
        return None;
    }

    let implied_probability = 1.0 / quote;
    let edge = probability - implied_probability;
    let stake = kelly_stake(probability, quote, cfg);

    Some(Opportunity {
        match_id: fixture.match_id,
        home: fixture.home.clone(),
        away: fixture.away.clone(),
        league: fixture.league.clone(),
        kickoff: fixture.kickoff,
        market_line: odds.market_line,
        decimal_odds: quote,
        our_probability: probability,
        implied_probability,
        confidence,
        edge,
        expected_value: ev,
        kelly_fraction: stake,
        recommended_stake_pct: stake * 100.0,
        quality: quality_tier(ev, confidence, edge),
        risk: risk_tier(probability, confidence, quote),
        ranking_score: ev * (confidence / 100.0),
        breakdown: estimate.breakdown.clone(),
        analyzed_at: Utc::now(),
    })
}

/// Composite quality score mapped to an ordered tier. Monotone: raising
/// EV, confidence or edge while holding the others fixed can only hold or
/// raise the tier.
pub fn quality_tier(expected_value: f64, confidence: f64, edge: f64) -> QualityTier {
    let score = expected_value * 0.4 + (confidence / 100.0) * 0.3 + edge * 0.3;

    if score >= 0.25 && confidence >= 80.0 {
        QualityTier::Excellent
    } else if score >= 0.20 && confidence >= 70.0 {
        QualityTier::VeryGood
    } else if score >= 0.15 && confidence >= 60.0 {
        QualityTier::Good
    } else if score >= 0.10 {
        QualityTier::Regular
    } else {
        QualityTier::Weak
    }
}

/// Accumulates penalties from three independent rules, then bands the sum.
pub fn risk_tier(probability: f64, confidence: f64, decimal_odds: f64) -> RiskTier {
    let mut score = 0u8;

    if probability < 0.70 {
        score += 2;
    } else if probability < 0.75 {
        score += 1;
    }

    if confidence < 70.0 {
        score += 2;
    } else if confidence < 80.0 {
        score += 1;
    }

    if decimal_odds > 2.0 {
        score += 2;
    } else if decimal_odds > 1.7 {
        score += 1;
    }

    match score {
        0 => RiskTier::Low,
        1..=2 => RiskTier::Moderate,
        3..=4 => RiskTier::High,
        _ => RiskTier::VeryHigh,
    }
}
