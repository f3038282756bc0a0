use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Opportunity, QualityTier, RiskTier};

/// Aggregate over one analysis batch, the payload behind the periodic
/// summary notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_analyzed: usize,
    pub total_opportunities: usize,
    pub avg_ev: f64,
    pub avg_confidence: f64,
    pub total_stake_pct: f64,
    pub quality_distribution: BTreeMap<QualityTier, usize>,
    pub risk_distribution: BTreeMap<RiskTier, usize>,
    pub generated_at: DateTime<Utc>,
}

pub fn summarize(total_analyzed: usize, opportunities: &[Opportunity]) -> BatchSummary {
    let n = opportunities.len();
    let (avg_ev, avg_confidence) = if n > 0 {
        (
            opportunities.iter().map(|o| o.expected_value).sum::<f64>() / n as f64,
            opportunities.iter().map(|o| o.confidence).sum::<f64>() / n as f64,
        )
    } else {
        (0.0, 0.0)
    };

    let total_stake_pct = opportunities.iter().map(|o| o.recommended_stake_pct).sum();

    let mut quality_distribution = BTreeMap::new();
    let mut risk_distribution = BTreeMap::new();
    for o in opportunities {
        *quality_distribution.entry(o.quality).or_insert(0) += 1;
        *risk_distribution.entry(o.risk).or_insert(0) += 1;
    }

    BatchSummary {
        total_analyzed,
        total_opportunities: n,
        avg_ev,
        avg_confidence,
        total_stake_pct,
        quality_distribution,
        risk_distribution,
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Indicator;
    use chrono::TimeZone;

    fn opp(ev: f64, confidence: f64, quality: QualityTier, risk: RiskTier) -> Opportunity {
        Opportunity {
            match_id: 1,
            home: "H".to_string(),
            away: "A".to_string(),
            league: "L".to_string(),
            kickoff: Utc.with_ymd_and_hms(2026, 3, 14, 18, 0, 0).unwrap(),
            market_line: 1.5,
            decimal_odds: 1.6,
            our_probability: 0.75,
            implied_probability: 0.625,
            confidence,
            edge: 0.125,
            expected_value: ev,
            kelly_fraction: 0.03,
            recommended_stake_pct: 3.0,
            quality,
            risk,
            ranking_score: ev * confidence / 100.0,
            breakdown: vec![(Indicator::Poisson, 0.2)],
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn empty_batch_summarizes_to_zeroes() {
        let s = summarize(14, &[]);
        assert_eq!(s.total_analyzed, 14);
        assert_eq!(s.total_opportunities, 0);
        assert_eq!(s.avg_ev, 0.0);
        assert!(s.quality_distribution.is_empty());
    }

    #[test]
    fn averages_and_distributions() {
        let opportunities = vec![
            opp(0.10, 80.0, QualityTier::Good, RiskTier::Low),
            opp(0.20, 60.0, QualityTier::Good, RiskTier::Moderate),
            opp(0.30, 70.0, QualityTier::Excellent, RiskTier::Low),
        ];
        let s = summarize(20, &opportunities);
        assert_eq!(s.total_opportunities, 3);
        assert!((s.avg_ev - 0.20).abs() < 1e-12);
        assert!((s.avg_confidence - 70.0).abs() < 1e-12);
        assert!((s.total_stake_pct - 9.0).abs() < 1e-12);
        assert_eq!(s.quality_distribution[&QualityTier::Good], 2);
        assert_eq!(s.quality_distribution[&QualityTier::Excellent], 1);
        assert_eq!(s.risk_distribution[&RiskTier::Low], 2);
    }
}
