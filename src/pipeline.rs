use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::ScanConfig;
use crate::data_source::FixtureRecord;
use crate::normalize::{normalize_h2h, normalize_team};
use crate::over_prob::{self, Estimate};
use crate::rankings::rank_opportunities;
use crate::summary::{BatchSummary, summarize};
use crate::types::{Fixture, OddsQuote, Opportunity};
use crate::value_detect::{self, fair_odds};

/// Per-fixture outcome. The estimate is always present (possibly
/// degraded); the opportunity only when the market was quoted and the bet
/// cleared the gate.
#[derive(Debug, Clone)]
pub struct FixtureAnalysis {
    pub fixture: Fixture,
    pub estimate: Estimate,
    pub quote: Option<OddsQuote>,
    pub opportunity: Option<Opportunity>,
    /// Break-even odds when a quoted market failed the gate, for the
    /// advisory message. Never persisted.
    pub fair_odds: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub analyses: Vec<FixtureAnalysis>,
    pub ranked: Vec<Opportunity>,
    pub summary: BatchSummary,
}

/// Runs the full per-fixture pipeline: normalize, estimate, detect. Pure;
/// any data problem degrades the estimate or skips the market instead of
/// failing.
pub fn analyze_fixture(record: &FixtureRecord, cfg: &ScanConfig) -> FixtureAnalysis {
    let home = normalize_team(&record.home_stats);
    let away = normalize_team(&record.away_stats);
    let h2h = normalize_h2h(&record.h2h, cfg.market_line);

    let estimate = over_prob::estimate(
        &home,
        &away,
        &h2h,
        record.context.as_ref(),
        cfg.market_line,
        &cfg.weights,
    );
    if let Estimate::Degraded { reason, .. } = &estimate {
        warn!(
            match_id = record.fixture.match_id,
            ?reason,
            "probability model degraded to baseline"
        );
    }

    // Absence of the line in the odds map is a valid state: skip the market.
    let quote = record
        .odds
        .iter()
        .find(|q| (q.market_line - cfg.market_line).abs() < f64::EPSILON)
        .copied();

    let (opportunity, advisory_fair_odds) = match quote {
        None => {
            debug!(match_id = record.fixture.match_id, line = cfg.market_line, "line not quoted");
            (None, None)
        }
        Some(q) => {
            let opp = value_detect::detect(&record.fixture, estimate.value(), &q, &cfg.detector);
            let fair = if opp.is_none() {
                fair_odds(estimate.value().probability)
            } else {
                None
            };
            (opp, fair)
        }
    };

    FixtureAnalysis {
        fixture: record.fixture.clone(),
        estimate,
        quote,
        opportunity,
        fair_odds: advisory_fair_odds,
    }
}

/// Analyzes a batch of fixtures in parallel, then ranks and summarizes.
/// Fixtures are independent; one bad record never aborts the batch.
pub fn analyze_batch(records: &[FixtureRecord], cfg: &ScanConfig) -> BatchResult {
    let analyses: Vec<FixtureAnalysis> = records
        .par_iter()
        .map(|record| analyze_fixture(record, cfg))
        .collect();

    let opportunities: Vec<Opportunity> = analyses
        .iter()
        .filter_map(|a| a.opportunity.clone())
        .collect();
    let ranked = rank_opportunities(&opportunities);
    let summary = summarize(records.len(), &ranked);

    BatchResult {
        analyses,
        ranked,
        summary,
    }
}
