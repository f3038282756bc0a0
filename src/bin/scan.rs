use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use overgoal::config::ScanConfig;
use overgoal::data_source::{DataSource, JsonSource, SyntheticSource};
use overgoal::pipeline::analyze_batch;
use overgoal::report;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cfg = ScanConfig::from_env();
    cfg.validate()?;

    // With a path argument, analyze that batch file; otherwise run a
    // synthetic batch so the pipeline can be exercised offline.
    let records = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => JsonSource::new(path).collect()?,
        None => SyntheticSource::new(12, 2026).collect()?,
    };

    let result = analyze_batch(&records, &cfg);

    for opportunity in &result.ranked {
        println!("{}", report::format_opportunity(opportunity));
    }
    for analysis in &result.analyses {
        if let (Some(fair), Some(quote)) = (analysis.fair_odds, analysis.quote) {
            println!(
                "{}",
                report::format_fair_odds_advisory(
                    &analysis.fixture,
                    analysis.estimate.value(),
                    &quote,
                    fair,
                )
            );
        }
    }
    println!();
    println!("{}", report::format_summary(&result.summary));

    Ok(())
}
