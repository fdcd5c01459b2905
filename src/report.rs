// Plain-text season report.
//
// Rendering and number formatting live here so the engine can emit plain
// numbers. Percentage-style categories (display name containing '%') are
// stored as fractions upstream and scaled to percent only for display.

use crate::analytics::aggregate::{PlayerAggregate, StatRange};
use crate::analytics::direction::is_lower_better;
use crate::analytics::scorer::{CategorySummary, Grade};
use crate::analytics::trend::{InjuryStatus, PlayerPrediction};
use crate::analytics::weakness::CategoryWeakness;
use crate::snapshot::TeamSnapshot;
use chrono::Local;
use std::collections::BTreeMap;
use std::fmt::Write;

// ---------------------------------------------------------------------------
// Value formatting
// ---------------------------------------------------------------------------

/// Render a stat value for display: one decimal, percentage categories
/// scaled to percent, missing values as "-".
pub fn format_value(display_name: &str, value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if display_name.contains('%') => format!("{:.1}%", v * 100.0),
        Some(v) => format!("{v:.1}"),
    }
}

/// Render a signed margin: two decimals with an explicit sign, percentage
/// categories scaled to percent.
pub fn format_margin(display_name: &str, margin: Option<f64>) -> String {
    match margin {
        None => "-".to_string(),
        Some(m) if display_name.contains('%') => format!("{:+.1}%", m * 100.0),
        Some(m) => format!("{m:+.2}"),
    }
}

// ---------------------------------------------------------------------------
// Report assembly
// ---------------------------------------------------------------------------

/// Everything the report prints, already computed by the engine.
pub struct ReportData<'a> {
    pub aggregates: &'a [PlayerAggregate],
    pub ranges: &'a BTreeMap<String, StatRange>,
    pub predictions: &'a [PlayerPrediction],
    pub summaries: &'a [CategorySummary],
    /// Opponent team name and weaknesses, when an opponent was scouted.
    pub scouting: Option<(&'a str, &'a [CategoryWeakness])>,
}

/// Render the full report as plain text.
pub fn render(snapshot: &TeamSnapshot, data: &ReportData) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} - {}", snapshot.league_name, snapshot.team_name);
    let _ = writeln!(
        out,
        "Through week {} | generated {}",
        snapshot.current_week,
        Local::now().format("%Y-%m-%d %H:%M")
    );

    render_averages(&mut out, data);
    render_predictions(&mut out, snapshot.current_week, data);
    render_report_card(&mut out, data);
    if let Some((opponent_name, weaknesses)) = data.scouting {
        render_scouting(&mut out, opponent_name, weaknesses);
    }

    out
}

fn render_averages(out: &mut String, data: &ReportData) {
    let _ = writeln!(out, "\n== ROSTER AVERAGES ==");
    for player in data.aggregates {
        let _ = writeln!(out, "\n{}", player.name);
        for stat in &player.stats {
            let marker = if is_roster_best(stat.stat_id.as_str(), &stat.display_name, stat.average, data.ranges) {
                " *"
            } else {
                ""
            };
            let _ = writeln!(
                out,
                "  {:<12} {:>8}  (min {}, max {}, sd {}){}",
                stat.display_name,
                format_value(&stat.display_name, stat.average),
                format_value(&stat.display_name, stat.min),
                format_value(&stat.display_name, stat.max),
                format_value(&stat.display_name, stat.standard_deviation),
                marker
            );
        }
    }
}

/// Whether this average is the roster's best for the category.
///
/// Best means the top of the roster range, or the bottom for
/// lower-is-better categories; a degenerate range marks nobody.
fn is_roster_best(
    stat_id: &str,
    display_name: &str,
    average: Option<f64>,
    ranges: &BTreeMap<String, StatRange>,
) -> bool {
    let (Some(avg), Some(range)) = (average, ranges.get(stat_id)) else {
        return false;
    };
    match range.normalized(avg) {
        Some(position) if is_lower_better(stat_id, display_name) => position == 0.0,
        Some(position) => position == 1.0,
        None => false,
    }
}

fn render_predictions(out: &mut String, current_week: u32, data: &ReportData) {
    let _ = writeln!(out, "\n== WEEK {} PROJECTIONS ==", current_week + 1);
    for player in data.predictions {
        let status = InjuryStatus::from_code(player.status.as_deref());
        let tag = match status {
            InjuryStatus::Active => String::new(),
            _ => format!("  [{}]", status.label()),
        };
        let _ = writeln!(out, "\n{}{}", player.name, tag);

        if !player.has_sufficient_data {
            let _ = writeln!(out, "  insufficient history (fewer than 2 weeks)");
            continue;
        }

        for stat in &player.predicted_stats {
            let band = match stat.confidence_interval {
                Some(ci) => format!(" ±{}", format_value(&stat.display_name, Some(ci))),
                None => String::new(),
            };
            let _ = writeln!(
                out,
                "  {:<12} {:>8}{}  [{}]",
                stat.display_name,
                format_value(&stat.display_name, stat.predicted_value),
                band,
                stat.trend.arrow()
            );
        }
    }
}

fn render_report_card(out: &mut String, data: &ReportData) {
    let _ = writeln!(out, "\n== SEASON REPORT CARD ==");
    if data.summaries.is_empty() {
        let _ = writeln!(out, "  no completed matchups yet");
        return;
    }
    for summary in data.summaries {
        let grade = Grade::from_win_rate(summary.win_rate());
        let _ = writeln!(
            out,
            "  [{}] {:<12} {}-{}-{}  win rate {:>5.1}%  avg margin {}",
            grade.label(),
            summary.display_name,
            summary.wins,
            summary.losses,
            summary.ties,
            summary.win_rate() * 100.0,
            format_margin(&summary.display_name, summary.average_margin)
        );
    }
}

fn render_scouting(out: &mut String, opponent_name: &str, weaknesses: &[CategoryWeakness]) {
    let _ = writeln!(out, "\n== SCOUTING: {opponent_name} ==");
    if weaknesses.is_empty() {
        let _ = writeln!(out, "  no comparable categories");
        return;
    }
    for w in weaknesses {
        let flag = if w.is_exploitable { "  << exploitable" } else { "" };
        let _ = writeln!(
            out,
            "  {:<12} them {} vs us {}  gap {:.1}% ({}){}",
            w.display_name,
            format_value(&w.display_name, Some(w.opponent_value)),
            format_value(&w.display_name, Some(w.user_value)),
            w.percentage_difference,
            w.severity.label(),
            flag
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
