use crate::config::ConfigError;
use crate::normalize::BASELINE_OVER_RATE;
use crate::types::{
    H2hIndicators, Indicator, MatchContext, ProbabilityEstimate, SeasonPhase, TeamIndicators,
};

/// Confidence assigned to a degraded (baseline) estimate.
const DEGRADED_CONFIDENCE: f64 = 30.0;

/// Indicator weight table for the probability blend. Entries sum to
/// exactly 1.0; `validate` enforces it so a mistyped override cannot skew
/// the blend silently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelWeights {
    pub poisson: f64,
    pub historical_rate: f64,
    pub recent_trend: f64,
    pub h2h: f64,
    pub offensive_strength: f64,
    pub offensive_trend: f64,
    pub season_phase: f64,
    pub motivation: f64,
    pub match_importance: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            poisson: 0.25,
            historical_rate: 0.15,
            recent_trend: 0.10,
            h2h: 0.12,
            offensive_strength: 0.10,
            offensive_trend: 0.08,
            season_phase: 0.08,
            motivation: 0.07,
            match_importance: 0.05,
        }
    }
}

impl ModelWeights {
    pub fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("poisson", self.poisson),
            ("historical_rate", self.historical_rate),
            ("recent_trend", self.recent_trend),
            ("h2h", self.h2h),
            ("offensive_strength", self.offensive_strength),
            ("offensive_trend", self.offensive_trend),
            ("season_phase", self.season_phase),
            ("motivation", self.motivation),
            ("match_importance", self.match_importance),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut sum = 0.0;
        for (name, value) in self.entries() {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::WeightRange { name, value });
            }
            sum += value;
        }
        if (sum - 1.0).abs() > 1e-9 {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    NonFiniteInput,
    NonFiniteBlend,
}

/// Outcome of the probability model. A degraded estimate is still usable
/// downstream, but callers can tell it apart from a real model run instead
/// of relying on logs.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    Computed(ProbabilityEstimate),
    Degraded {
        estimate: ProbabilityEstimate,
        reason: DegradeReason,
    },
}

impl Estimate {
    pub fn value(&self) -> &ProbabilityEstimate {
        match self {
            Estimate::Computed(e) => e,
            Estimate::Degraded { estimate, .. } => estimate,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Estimate::Degraded { .. })
    }
}

/// P(total goals > line) under a Poisson(lambda) model for total goals.
/// Strictly increasing in lambda for a fixed line.
pub fn poisson_over_probability(lambda_total: f64, line: f64) -> f64 {
    let lambda = lambda_total.max(0.0);
    let k = line.floor().max(0.0) as u32;

    // CDF up to k goals via the running pmf term.
    let mut term = (-lambda).exp();
    let mut cdf = term;
    for i in 1..=k {
        term *= lambda / i as f64;
        cdf += term;
    }
    (1.0 - cdf).clamp(0.0, 1.0)
}

/// Expected total goals: each side's lambda is the average of its attack
/// average and the opponent's defense average.
pub fn expected_total_goals(home: &TeamIndicators, away: &TeamIndicators) -> f64 {
    let lambda_home = (home.goals_for_avg + away.goals_against_avg) / 2.0;
    let lambda_away = (away.goals_for_avg + home.goals_against_avg) / 2.0;
    lambda_home + lambda_away
}

/// Blends the Poisson base rate with the secondary and contextual
/// indicators into a final probability plus a confidence score. Never
/// fails: malformed inputs produce a tagged baseline estimate.
pub fn estimate(
    home: &TeamIndicators,
    away: &TeamIndicators,
    h2h: &H2hIndicators,
    context: Option<&MatchContext>,
    line: f64,
    weights: &ModelWeights,
) -> Estimate {
    if !inputs_finite(home) || !inputs_finite(away) || !h2h.over_rate.is_finite() {
        return degraded(DegradeReason::NonFiniteInput);
    }

    let poisson = poisson_over_probability(expected_total_goals(home, away), line);
    let values = [
        (Indicator::Poisson, poisson, weights.poisson),
        (
            Indicator::HistoricalRate,
            historical_rate(home, away),
            weights.historical_rate,
        ),
        (
            Indicator::RecentTrend,
            recent_trend(home, away),
            weights.recent_trend,
        ),
        (Indicator::HeadToHead, h2h_rate(h2h), weights.h2h),
        (
            Indicator::OffensiveStrength,
            offensive_strength(home, away),
            weights.offensive_strength,
        ),
        (
            Indicator::OffensiveTrend,
            offensive_trend(home, away),
            weights.offensive_trend,
        ),
        (
            Indicator::SeasonPhase,
            season_phase_rate(context),
            weights.season_phase,
        ),
        (
            Indicator::Motivation,
            motivation_rate(context),
            weights.motivation,
        ),
        (
            Indicator::MatchImportance,
            importance_rate(context),
            weights.match_importance,
        ),
    ];

    let mut breakdown = Vec::with_capacity(values.len());
    let mut blended = 0.0;
    for (indicator, value, weight) in values {
        let contribution = value * weight;
        if !contribution.is_finite() {
            return degraded(DegradeReason::NonFiniteBlend);
        }
        blended += contribution;
        breakdown.push((indicator, contribution));
    }

    Estimate::Computed(ProbabilityEstimate {
        probability: blended.clamp(0.0, 1.0),
        confidence: confidence(home, away, h2h),
        breakdown,
    })
}

/// Season over-rates, home side weighted slightly heavier.
fn historical_rate(home: &TeamIndicators, away: &TeamIndicators) -> f64 {
    home.over_rate * 0.55 + away.over_rate * 0.45
}

fn recent_trend(home: &TeamIndicators, away: &TeamIndicators) -> f64 {
    (home.recent_over_rate + away.recent_over_rate) / 2.0
}

/// H2H over-rate, shrunk toward the baseline when fewer than three
/// meetings exist. Mandatory: two matches that both went over must not
/// read as certainty.
fn h2h_rate(h2h: &H2hIndicators) -> f64 {
    if h2h.sample_size == 0 {
        return BASELINE_OVER_RATE;
    }
    if h2h.sample_size < 3 {
        h2h.over_rate * 0.6 + BASELINE_OVER_RATE * 0.4
    } else {
        h2h.over_rate
    }
}

/// Banded heuristic on the combined attack averages.
fn offensive_strength(home: &TeamIndicators, away: &TeamIndicators) -> f64 {
    let total_attack = home.goals_for_avg + away.goals_for_avg;
    let prob = if total_attack >= 3.0 {
        0.85 + ((total_attack - 3.0) * 0.05).min(0.10)
    } else if total_attack >= 2.5 {
        0.75
    } else if total_attack >= 2.0 {
        0.65
    } else {
        0.50 + (total_attack - 1.5) * 0.3
    };
    prob.clamp(0.0, 0.95)
}

/// Scales the baseline by how much each side's recent scoring deviates
/// from its season average.
fn offensive_trend(home: &TeamIndicators, away: &TeamIndicators) -> f64 {
    let improvement = |recent: f64, season: f64| {
        if season > 0.0 { recent / season } else { 1.0 }
    };
    let avg = (improvement(home.recent_goals_avg, home.goals_for_avg)
        + improvement(away.recent_goals_avg, away.goals_for_avg))
        / 2.0;
    (BASELINE_OVER_RATE * avg).clamp(0.0, 0.95)
}

fn season_phase_rate(context: Option<&MatchContext>) -> f64 {
    match context {
        None => BASELINE_OVER_RATE,
        Some(ctx) => match ctx.season_phase {
            SeasonPhase::Early => 0.70,
            SeasonPhase::Mid => 0.72,
            SeasonPhase::Late => 0.75,
        },
    }
}

fn motivation_rate(context: Option<&MatchContext>) -> f64 {
    match context {
        None => BASELINE_OVER_RATE,
        Some(ctx) if ctx.is_high_motivation => 0.78,
        Some(_) => 0.70,
    }
}

fn importance_rate(context: Option<&MatchContext>) -> f64 {
    match context {
        None => BASELINE_OVER_RATE,
        Some(ctx) if ctx.is_high_importance => 0.78,
        Some(_) => BASELINE_OVER_RATE,
    }
}

/// Confidence score on 0-100: more sample evidence behind the inputs means
/// a higher score, independent of the probability itself.
fn confidence(home: &TeamIndicators, away: &TeamIndicators, h2h: &H2hIndicators) -> f64 {
    let mut score: f64 = 50.0;

    if home.games_played >= 10 && away.games_played >= 10 {
        score += 20.0;
    } else if home.games_played >= 5 && away.games_played >= 5 {
        score += 10.0;
    }

    if h2h.sample_size >= 3 {
        score += 15.0;
    } else if h2h.sample_size >= 1 {
        score += 7.0;
    }

    let home_var = (home.over_rate - home.recent_over_rate).abs();
    let away_var = (away.over_rate - away.recent_over_rate).abs();
    let avg_var = (home_var + away_var) / 2.0;
    if avg_var < 0.10 {
        score += 15.0;
    } else if avg_var < 0.20 {
        score += 8.0;
    }

    score.min(100.0)
}

fn inputs_finite(t: &TeamIndicators) -> bool {
    t.goals_for_avg.is_finite()
        && t.goals_against_avg.is_finite()
        && t.recent_goals_avg.is_finite()
        && t.over_rate.is_finite()
        && t.recent_over_rate.is_finite()
}

fn degraded(reason: DegradeReason) -> Estimate {
    Estimate::Degraded {
        estimate: ProbabilityEstimate {
            probability: BASELINE_OVER_RATE,
            confidence: DEGRADED_CONFIDENCE,
            breakdown: Vec::new(),
        },
        reason,
    }
}
