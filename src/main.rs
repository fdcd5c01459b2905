// Courtvision entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr; stdout carries the report)
// 2. Load config, copying defaults on first run
// 3. Load the normalized team snapshot
// 4. Run the analytics pass (aggregates, predictions, report card, scouting)
// 5. Print the report

use courtvision::analytics::{aggregate, scorer, trend, weakness};
use courtvision::config;
use courtvision::report;
use courtvision::snapshot;

use anyhow::Context;
use std::path::Path;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("courtvision starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: exploit threshold {:.0}%, {} percentage categories",
        config.analysis.exploit_threshold * 100.0,
        config.analysis.percentage_stat_ids.len()
    );

    // 3. Load the team snapshot
    let snapshot = snapshot::load_snapshot(Path::new(&config.snapshot_path))
        .context("failed to load team snapshot")?;
    info!(
        "Snapshot loaded: {} ({}), through week {}",
        snapshot.team_name, snapshot.league_name, snapshot.current_week
    );
    let catalog = snapshot.catalog();

    // 4. Run the analytics pass
    let aggregates = aggregate::aggregate_roster(&snapshot.roster_weeks, &catalog);
    let ranges = aggregate::stat_ranges(&aggregates);
    info!(
        "Aggregated {} players across {} roster weeks",
        aggregates.len(),
        snapshot.roster_weeks.len()
    );

    let predictions = trend::predict_roster(&snapshot.roster_weeks, &catalog);

    let summaries = scorer::build_category_summaries(&snapshot.matchups);
    info!(
        "Scored {} categories from {} matchups",
        summaries.len(),
        snapshot.matchups.len()
    );

    let scouting = match &snapshot.opponent {
        Some(opponent) => {
            let opponent_aggregates =
                aggregate::aggregate_roster(&opponent.roster_weeks, &catalog);
            let opponent_totals = weakness::category_totals(
                &opponent_aggregates,
                &config.analysis.percentage_stat_ids,
            );
            let user_totals =
                weakness::category_totals(&aggregates, &config.analysis.percentage_stat_ids);
            let weaknesses = weakness::identify_weaknesses(
                &opponent_totals,
                &user_totals,
                config.analysis.exploit_threshold,
            );
            info!(
                "Scouted {}: {} exploitable of {} compared categories",
                opponent.team_name,
                weaknesses.iter().filter(|w| w.is_exploitable).count(),
                weaknesses.len()
            );
            Some((opponent.team_name.clone(), weaknesses))
        }
        None => None,
    };

    // 5. Print the report
    let data = report::ReportData {
        aggregates: &aggregates,
        ranges: &ranges,
        predictions: &predictions,
        summaries: &summaries,
        scouting: scouting
            .as_ref()
            .map(|(name, weaknesses)| (name.as_str(), weaknesses.as_slice())),
    };
    print!("{}", report::render(&snapshot, &data));

    Ok(())
}

/// Initialize tracing to stderr so the report itself stays clean on stdout.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("courtvision=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
