use std::cmp::Ordering;

use crate::types::Opportunity;

/// Orders opportunities best-first: ranking score (EV weighted by
/// confidence) descending, ties broken by raw EV descending, then by the
/// earlier kickoff. Stable and deterministic; the input is left untouched.
pub fn rank_opportunities(opportunities: &[Opportunity]) -> Vec<Opportunity> {
    let mut ranked = opportunities.to_vec();
    ranked.sort_by(compare);
    ranked
}

fn compare(a: &Opportunity, b: &Opportunity) -> Ordering {
    b.ranking_score
        .total_cmp(&a.ranking_score)
        .then_with(|| b.expected_value.total_cmp(&a.expected_value))
        .then_with(|| a.kickoff.cmp(&b.kickoff))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Indicator, QualityTier, RiskTier};
    use chrono::{TimeZone, Utc};

    fn opp(match_id: u64, ev: f64, confidence: f64, kickoff_hour: u32) -> Opportunity {
        Opportunity {
            match_id,
            home: format!("H{match_id}"),
            away: format!("A{match_id}"),
            league: "L".to_string(),
            kickoff: Utc.with_ymd_and_hms(2026, 3, 14, kickoff_hour, 0, 0).unwrap(),
            market_line: 1.5,
            decimal_odds: 1.6,
            our_probability: 0.75,
            implied_probability: 0.625,
            confidence,
            edge: 0.125,
            expected_value: ev,
            kelly_fraction: 0.02,
            recommended_stake_pct: 2.0,
            quality: QualityTier::Good,
            risk: RiskTier::Moderate,
            ranking_score: ev * confidence / 100.0,
            breakdown: vec![(Indicator::Poisson, 0.2)],
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn orders_by_confidence_weighted_ev() {
        let list = vec![opp(1, 0.10, 60.0, 12), opp(2, 0.08, 95.0, 12), opp(3, 0.20, 70.0, 12)];
        let ranked = rank_opportunities(&list);
        let ids: Vec<u64> = ranked.iter().map(|o| o.match_id).collect();
        // scores: 0.060, 0.076, 0.140
        assert_eq!(ids, vec![3, 2, 1]);
        // Input order is untouched.
        assert_eq!(list[0].match_id, 1);
    }

    #[test]
    fn ties_break_on_ev_then_kickoff() {
        // Same score 0.06; b has the higher raw EV.
        let a = opp(1, 0.10, 60.0, 18);
        let b = opp(2, 0.12, 50.0, 18);
        let ranked = rank_opportunities(&[a.clone(), b.clone()]);
        assert_eq!(ranked[0].match_id, 2);

        // Identical score and EV; earlier kickoff wins.
        let c = opp(3, 0.10, 60.0, 20);
        let d = opp(4, 0.10, 60.0, 15);
        let ranked = rank_opportunities(&[c, d]);
        assert_eq!(ranked[0].match_id, 4);
    }

    #[test]
    fn ranking_is_idempotent() {
        let list = vec![opp(1, 0.10, 60.0, 12), opp(2, 0.08, 95.0, 13), opp(3, 0.20, 70.0, 14)];
        let once = rank_opportunities(&list);
        let twice = rank_opportunities(&once);
        assert_eq!(once, twice);
    }
}
