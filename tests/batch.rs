use chrono::{Duration, TimeZone, Utc};

use overgoal::config::ScanConfig;
use overgoal::data_source::{DataSource, FixtureRecord, SyntheticSource};
use overgoal::normalize::RawTeamStats;
use overgoal::pipeline::analyze_batch;
use overgoal::rankings::rank_opportunities;
use overgoal::types::{Fixture, OddsQuote};

fn record(match_id: u64, goals_for: f64, decimal_odds: f64, hours_ahead: i64) -> FixtureRecord {
    FixtureRecord {
        fixture: Fixture {
            match_id,
            home: format!("Home {match_id}"),
            away: format!("Away {match_id}"),
            league: "Serie A".to_string(),
            kickoff: Utc.with_ymd_and_hms(2026, 3, 14, 12, 0, 0).unwrap()
                + Duration::hours(hours_ahead),
        },
        home_stats: RawTeamStats {
            goals_for_avg: Some(goals_for),
            goals_against_avg: Some(1.4),
            recent_goals_avg: Some(goals_for),
            over_rate: Some(0.80),
            recent_over_rate: Some(0.78),
            games_played: Some(16),
        },
        away_stats: RawTeamStats {
            goals_for_avg: Some(goals_for - 0.3),
            goals_against_avg: Some(1.3),
            recent_goals_avg: Some(goals_for - 0.3),
            over_rate: Some(0.76),
            recent_over_rate: Some(0.74),
            games_played: Some(16),
        },
        h2h: Vec::new(),
        context: None,
        odds: vec![OddsQuote {
            market_line: 1.5,
            decimal_odds,
        }],
    }
}

#[test]
fn one_degenerate_fixture_never_aborts_the_batch() {
    let mut poisoned = record(7, 2.2, 1.60, 3);
    poisoned.home_stats.goals_for_avg = Some(f64::NAN);
    // A NaN average is filtered at normalization, so this fixture
    // degrades gracefully rather than propagating the NaN.
    let batch = vec![record(1, 2.2, 1.60, 1), poisoned, record(9, 2.3, 1.65, 5)];

    let result = analyze_batch(&batch, &ScanConfig::default());
    assert_eq!(result.analyses.len(), 3);
    assert_eq!(result.summary.total_analyzed, 3);
    assert!(result.ranked.iter().any(|o| o.match_id == 1));
    assert!(result.ranked.iter().any(|o| o.match_id == 9));
}

#[test]
fn ranked_output_is_ordered_and_idempotent() {
    let batch = vec![
        record(1, 1.9, 1.55, 4),
        record(2, 2.4, 1.70, 2),
        record(3, 2.1, 1.60, 6),
    ];
    let result = analyze_batch(&batch, &ScanConfig::default());
    assert!(result.ranked.len() >= 2);

    for pair in result.ranked.windows(2) {
        assert!(pair[0].ranking_score >= pair[1].ranking_score);
    }
    let re_ranked = rank_opportunities(&result.ranked);
    assert_eq!(re_ranked, result.ranked);
}

#[test]
fn summary_reflects_the_ranked_batch() {
    let batch = vec![record(1, 2.3, 1.60, 1), record(2, 2.3, 1.60, 2)];
    let result = analyze_batch(&batch, &ScanConfig::default());

    assert_eq!(result.summary.total_analyzed, 2);
    assert_eq!(result.summary.total_opportunities, result.ranked.len());
    let quality_total: usize = result.summary.quality_distribution.values().sum();
    assert_eq!(quality_total, result.ranked.len());
    let stake_sum: f64 = result.ranked.iter().map(|o| o.recommended_stake_pct).sum();
    assert!((result.summary.total_stake_pct - stake_sum).abs() < 1e-12);
}

#[test]
fn synthetic_batch_runs_end_to_end() {
    let records = SyntheticSource::new(40, 99).collect().unwrap();
    let result = analyze_batch(&records, &ScanConfig::default());

    assert_eq!(result.analyses.len(), 40);
    // Every analysis carries a usable estimate, degraded or not.
    for analysis in &result.analyses {
        let p = analysis.estimate.value().probability;
        assert!((0.0..=1.0).contains(&p));
    }
    // Opportunities are a subset of the quoted fixtures.
    assert!(result.ranked.len() <= 40);
}
