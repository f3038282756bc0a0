use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-team, per-competition-season indicators after normalization.
/// Rates are in [0, 1]; averages are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamIndicators {
    pub goals_for_avg: f64,
    pub goals_against_avg: f64,
    pub recent_goals_avg: f64,
    pub over_rate: f64,
    pub recent_over_rate: f64,
    pub games_played: u32,
}

/// Head-to-head indicators. `sample_size == 0` means "no data, use baseline".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct H2hIndicators {
    pub over_rate: f64,
    pub avg_total_goals: f64,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonPhase {
    Early,
    Mid,
    Late,
}

impl SeasonPhase {
    /// Maps a round number onto a phase for a typical 38-round season.
    pub fn from_round(round: u32) -> Self {
        if round <= 10 {
            SeasonPhase::Early
        } else if round <= 28 {
            SeasonPhase::Mid
        } else {
            SeasonPhase::Late
        }
    }
}

/// Optional contextual adjustors for a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchContext {
    pub round_number: u32,
    pub season_phase: SeasonPhase,
    pub is_high_motivation: bool,
    pub is_high_importance: bool,
}

/// Names for the indicators that feed the weighted blend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Indicator {
    Poisson,
    HistoricalRate,
    RecentTrend,
    HeadToHead,
    OffensiveStrength,
    OffensiveTrend,
    SeasonPhase,
    Motivation,
    MatchImportance,
}

impl Indicator {
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Poisson => "poisson",
            Indicator::HistoricalRate => "historical_rate",
            Indicator::RecentTrend => "recent_trend",
            Indicator::HeadToHead => "h2h",
            Indicator::OffensiveStrength => "offensive_strength",
            Indicator::OffensiveTrend => "offensive_trend",
            Indicator::SeasonPhase => "season_phase",
            Indicator::Motivation => "motivation",
            Indicator::MatchImportance => "match_importance",
        }
    }
}

/// Result of the probability model. `breakdown` holds each indicator's
/// weighted contribution; the contributions sum to the probability before
/// the final clamp to [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEstimate {
    pub probability: f64,
    pub confidence: f64,
    pub breakdown: Vec<(Indicator, f64)>,
}

/// A bookmaker quote for one totals line. `decimal_odds > 1.0` holds for
/// any quote that clears the detector; degenerate quotes are rejected there.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OddsQuote {
    pub market_line: f64,
    pub decimal_odds: f64,
}

/// Identity of a fixture as handed over by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub match_id: u64,
    pub home: String,
    pub away: String,
    pub league: String,
    pub kickoff: DateTime<Utc>,
}

/// Ordered quality bands, weakest first so `Ord` ranks them naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum QualityTier {
    Weak,
    Regular,
    Good,
    VeryGood,
    Excellent,
}

impl QualityTier {
    pub fn label(self) -> &'static str {
        match self {
            QualityTier::Excellent => "EXCELLENT",
            QualityTier::VeryGood => "VERY GOOD",
            QualityTier::Good => "GOOD",
            QualityTier::Regular => "REGULAR",
            QualityTier::Weak => "WEAK",
        }
    }
}

/// Ordered risk bands, safest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Moderate => "MODERATE",
            RiskTier::High => "HIGH",
            RiskTier::VeryHigh => "VERY HIGH",
        }
    }
}

/// A value bet that cleared the eligibility gate. Created once per
/// (fixture, market line) pair and never mutated; re-analysis replaces the
/// record wholesale at the persistence boundary.
///
/// All numeric fields carry full precision. Rounding happens only when a
/// record is formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub match_id: u64,
    pub home: String,
    pub away: String,
    pub league: String,
    pub kickoff: DateTime<Utc>,

    pub market_line: f64,
    pub decimal_odds: f64,

    pub our_probability: f64,
    pub implied_probability: f64,
    pub confidence: f64,

    pub edge: f64,
    pub expected_value: f64,

    /// Fractional-Kelly stake as a fraction of bankroll, already damped
    /// and capped. Zero whenever the full Kelly criterion is non-positive.
    pub kelly_fraction: f64,
    pub recommended_stake_pct: f64,

    pub quality: QualityTier,
    pub risk: RiskTier,
    pub ranking_score: f64,

    pub breakdown: Vec<(Indicator, f64)>,
    pub analyzed_at: DateTime<Utc>,
}
