use serde::{Deserialize, Serialize};

use crate::types::{H2hIndicators, TeamIndicators};

/// Long-run share of fixtures that clear the 1.5-goal line across the
/// covered leagues. Used whenever a direct rate is unavailable.
pub const BASELINE_OVER_RATE: f64 = 0.72;

/// Over-rate substituted when it has to be derived rather than observed.
pub const DERIVED_OVER_RATE: f64 = 0.70;

pub const BASELINE_GOALS_AVG: f64 = 1.5;
pub const BASELINE_H2H_TOTAL_GOALS: f64 = 2.5;

/// Raw per-team statistics as the provider hands them over. Any field may
/// be missing; the normalizer substitutes baselines, never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTeamStats {
    #[serde(default)]
    pub goals_for_avg: Option<f64>,
    #[serde(default)]
    pub goals_against_avg: Option<f64>,
    #[serde(default)]
    pub recent_goals_avg: Option<f64>,
    #[serde(default)]
    pub over_rate: Option<f64>,
    #[serde(default)]
    pub recent_over_rate: Option<f64>,
    #[serde(default)]
    pub games_played: Option<u32>,
}

/// One historical meeting between the two sides, final score only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawH2hMatch {
    pub home_goals: u32,
    pub away_goals: u32,
}

impl RawH2hMatch {
    pub fn total_goals(&self) -> u32 {
        self.home_goals + self.away_goals
    }
}

/// Converts raw team statistics into a complete indicator set. A team with
/// no played games gets the documented baselines so the model downstream
/// always has a usable input.
pub fn normalize_team(raw: &RawTeamStats) -> TeamIndicators {
    let games_played = raw.games_played.unwrap_or(0);
    if games_played == 0 {
        return baseline_team();
    }

    let goals_for_avg = sane_avg(raw.goals_for_avg).unwrap_or(BASELINE_GOALS_AVG);
    let goals_against_avg = sane_avg(raw.goals_against_avg).unwrap_or(BASELINE_GOALS_AVG);
    let recent_goals_avg = sane_avg(raw.recent_goals_avg).unwrap_or(goals_for_avg);

    let over_rate = sane_rate(raw.over_rate)
        .unwrap_or_else(|| over_rate_from_goal_averages(goals_for_avg + goals_against_avg));
    let recent_over_rate = sane_rate(raw.recent_over_rate).unwrap_or(over_rate);

    TeamIndicators {
        goals_for_avg,
        goals_against_avg,
        recent_goals_avg,
        over_rate,
        recent_over_rate,
        games_played,
    }
}

/// Estimates a team's over-rate from its combined scored + conceded
/// averages. Bands are monotone in expected total goals: low-scoring sides
/// carry an under bias, high-scoring sides an over bias.
pub fn over_rate_from_goal_averages(avg_total_goals: f64) -> f64 {
    let under_rate = if avg_total_goals <= 1.0 {
        0.60
    } else if avg_total_goals <= 1.5 {
        0.40
    } else if avg_total_goals <= 2.0 {
        0.30
    } else {
        0.20
    };
    1.0 - under_rate
}

/// Derives head-to-head indicators from past meetings. An empty history
/// yields the `sample_size = 0` baseline rather than an error.
pub fn normalize_h2h(matches: &[RawH2hMatch], line: f64) -> H2hIndicators {
    if matches.is_empty() {
        return H2hIndicators {
            over_rate: DERIVED_OVER_RATE,
            avg_total_goals: BASELINE_H2H_TOTAL_GOALS,
            sample_size: 0,
        };
    }

    let n = matches.len();
    let over_count = matches
        .iter()
        .filter(|m| m.total_goals() as f64 > line)
        .count();
    let total: u32 = matches.iter().map(RawH2hMatch::total_goals).sum();

    H2hIndicators {
        over_rate: over_count as f64 / n as f64,
        avg_total_goals: total as f64 / n as f64,
        sample_size: n,
    }
}

pub fn baseline_team() -> TeamIndicators {
    TeamIndicators {
        goals_for_avg: BASELINE_GOALS_AVG,
        goals_against_avg: BASELINE_GOALS_AVG,
        recent_goals_avg: BASELINE_GOALS_AVG,
        over_rate: DERIVED_OVER_RATE,
        recent_over_rate: DERIVED_OVER_RATE,
        games_played: 0,
    }
}

fn sane_avg(raw: Option<f64>) -> Option<f64> {
    raw.filter(|v| v.is_finite() && *v >= 0.0)
}

fn sane_rate(raw: Option<f64>) -> Option<f64> {
    raw.filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
}
