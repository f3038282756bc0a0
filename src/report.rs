use std::fmt::Write;

use crate::summary::BatchSummary;
use crate::types::{Fixture, OddsQuote, Opportunity, ProbabilityEstimate};

/// Renders one opportunity as the human-readable notification payload.
/// This is the display boundary: every number is rounded here and nowhere
/// else.
pub fn format_opportunity(o: &Opportunity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "VALUE BET  {} vs {}", o.home, o.away);
    let _ = writeln!(out, "  league:     {}", o.league);
    let _ = writeln!(out, "  kickoff:    {}", o.kickoff.format("%Y-%m-%d %H:%M UTC"));
    let _ = writeln!(out, "  market:     Over {:.1}  @  {:.2}", o.market_line, o.decimal_odds);
    let _ = writeln!(
        out,
        "  model:      {:.1}% vs implied {:.1}%  (edge {:+.1}%)",
        o.our_probability * 100.0,
        o.implied_probability * 100.0,
        o.edge * 100.0
    );
    let _ = writeln!(out, "  EV:         {:+.1}%", o.expected_value * 100.0);
    let _ = writeln!(out, "  stake:      {:.1}% of bankroll", o.recommended_stake_pct);
    let _ = writeln!(
        out,
        "  quality:    {}  |  risk: {}  |  confidence: {:.0}%",
        o.quality.label(),
        o.risk.label(),
        o.confidence
    );
    out
}

/// Advisory line for a fixture that failed the EV gate: report the
/// break-even price so a human can still watch the market. Never produces
/// an opportunity record.
pub fn format_fair_odds_advisory(
    fixture: &Fixture,
    estimate: &ProbabilityEstimate,
    quote: &OddsQuote,
    fair: f64,
) -> String {
    format!(
        "no value: {} vs {} (Over {:.1}) quoted {:.2}, fair odds {:.2} at {:.1}% model probability",
        fixture.home,
        fixture.away,
        quote.market_line,
        quote.decimal_odds,
        fair,
        estimate.probability * 100.0
    )
}

pub fn format_summary(s: &BatchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "BATCH SUMMARY");
    let _ = writeln!(out, "  analyzed:      {}", s.total_analyzed);
    let _ = writeln!(out, "  opportunities: {}", s.total_opportunities);
    if s.total_opportunities > 0 {
        let _ = writeln!(out, "  avg EV:        {:+.1}%", s.avg_ev * 100.0);
        let _ = writeln!(out, "  avg conf:      {:.1}%", s.avg_confidence);
        let _ = writeln!(out, "  stake total:   {:.1}%", s.total_stake_pct);
        for (tier, count) in &s.quality_distribution {
            let _ = writeln!(out, "  quality {:>10}: {count}", tier.label());
        }
        for (tier, count) in &s.risk_distribution {
            let _ = writeln!(out, "  risk {:>13}: {count}", tier.label());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize;
    use crate::types::{Indicator, QualityTier, RiskTier};
    use chrono::{TimeZone, Utc};

    fn opp() -> Opportunity {
        Opportunity {
            match_id: 42,
            home: "Ajax".to_string(),
            away: "PSV".to_string(),
            league: "Eredivisie".to_string(),
            kickoff: Utc.with_ymd_and_hms(2026, 4, 5, 14, 30, 0).unwrap(),
            market_line: 1.5,
            decimal_odds: 1.62,
            our_probability: 0.784321,
            implied_probability: 1.0 / 1.62,
            confidence: 85.0,
            edge: 0.784321 - 1.0 / 1.62,
            expected_value: 0.784321 * 1.62 - 1.0,
            kelly_fraction: 0.052,
            recommended_stake_pct: 5.2,
            quality: QualityTier::Excellent,
            risk: RiskTier::Low,
            ranking_score: 0.22,
            breakdown: vec![(Indicator::Poisson, 0.19)],
            analyzed_at: Utc::now(),
        }
    }

    #[test]
    fn opportunity_block_contains_display_rounded_fields() {
        let text = format_opportunity(&opp());
        assert!(text.contains("Ajax vs PSV"));
        assert!(text.contains("Over 1.5  @  1.62"));
        assert!(text.contains("78.4%"));
        assert!(text.contains("5.2% of bankroll"));
        assert!(text.contains("EXCELLENT"));
        assert!(text.contains("LOW"));
    }

    #[test]
    fn summary_block_lists_distributions() {
        let s = summarize(10, &[opp()]);
        let text = format_summary(&s);
        assert!(text.contains("analyzed:      10"));
        assert!(text.contains("opportunities: 1"));
        assert!(text.contains("EXCELLENT"));
    }
}
