// Opponent scouting: category totals and exploitable weakness detection.
//
// Totals roll each roster up to one number per category (sum of per-player
// averages; percentage categories average instead, since summing percentages
// is meaningless), then the two teams' totals are compared direction-aware
// to find the categories where the opponent can be beaten.

use crate::analytics::aggregate::PlayerAggregate;
use crate::analytics::direction::{is_lower_better, should_skip_highlight};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Category totals
// ---------------------------------------------------------------------------

/// One team's rolled-up value for a category.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotal {
    pub display_name: String,
    pub total: f64,
    /// How many players contributed a numeric average.
    pub players: u32,
}

/// Roll per-player averages up to one total per category.
///
/// `percentage_stat_ids` names the categories whose total is the mean of the
/// contributing players' averages instead of their sum. The id set comes
/// from the caller's league taxonomy; it is league-specific and deliberately
/// not hard-coded here.
pub fn category_totals(
    roster: &[PlayerAggregate],
    percentage_stat_ids: &[String],
) -> BTreeMap<String, CategoryTotal> {
    let mut totals: BTreeMap<String, CategoryTotal> = BTreeMap::new();

    for player in roster {
        for stat in &player.stats {
            let Some(average) = stat.average else {
                continue;
            };
            totals
                .entry(stat.stat_id.clone())
                .and_modify(|t| {
                    t.total += average;
                    t.players += 1;
                })
                .or_insert_with(|| CategoryTotal {
                    display_name: stat.display_name.clone(),
                    total: average,
                    players: 1,
                });
        }
    }

    for stat_id in percentage_stat_ids {
        if let Some(total) = totals.get_mut(stat_id) {
            if total.players > 0 {
                total.total /= total.players as f64;
            }
        }
    }

    totals
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// How pronounced a category gap is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// 20%+ gap.
    High,
    /// 10-20% gap.
    Medium,
    /// Under 10%.
    Low,
}

impl Severity {
    /// Classify from the absolute percentage difference.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage.abs() >= 20.0 {
            Severity::High
        } else if percentage.abs() >= 10.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Sort rank, most severe first.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::High => 0,
            Severity::Medium => 1,
            Severity::Low => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Weakness records
// ---------------------------------------------------------------------------

/// One category's comparison between the opponent's roster and ours.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWeakness {
    pub stat_id: String,
    pub display_name: String,
    pub opponent_value: f64,
    pub user_value: f64,
    /// Absolute gap magnitude.
    pub difference: f64,
    /// Absolute gap as a percentage of our own total.
    pub percentage_difference: f64,
    pub severity: Severity,
    pub is_exploitable: bool,
}

/// Compare two teams' category totals and classify opponent weaknesses.
///
/// A category is scored only when both teams have a total for it; composite
/// made/attempted categories and categories where both totals are exactly
/// zero are skipped. The signed difference is oriented so positive means
/// the opponent is weaker (higher total for lower-is-better categories,
/// lower total otherwise); a weakness is exploitable when that signed gap
/// is positive and at least `threshold` (a fraction, e.g. 0.10) of our own
/// total. Output: exploitable first, then by severity, then by percentage
/// magnitude.
pub fn identify_weaknesses(
    opponent_totals: &BTreeMap<String, CategoryTotal>,
    user_totals: &BTreeMap<String, CategoryTotal>,
    threshold: f64,
) -> Vec<CategoryWeakness> {
    let mut weaknesses: Vec<CategoryWeakness> = Vec::new();

    for (stat_id, opponent) in opponent_totals {
        let Some(user) = user_totals.get(stat_id) else {
            continue;
        };
        if opponent.total == 0.0 && user.total == 0.0 {
            continue;
        }

        let display_name = if opponent.display_name.is_empty() {
            user.display_name.clone()
        } else {
            opponent.display_name.clone()
        };
        if should_skip_highlight(&display_name) {
            continue;
        }

        // Positive difference means the opponent is weaker than us here.
        let difference = if is_lower_better(stat_id, &display_name) {
            opponent.total - user.total
        } else {
            user.total - opponent.total
        };
        let percentage_difference = if user.total != 0.0 {
            difference / user.total * 100.0
        } else {
            0.0
        };
        let is_exploitable = difference > 0.0 && percentage_difference >= threshold * 100.0;

        weaknesses.push(CategoryWeakness {
            stat_id: stat_id.clone(),
            display_name,
            opponent_value: opponent.total,
            user_value: user.total,
            difference: difference.abs(),
            percentage_difference: percentage_difference.abs(),
            severity: Severity::from_percentage(percentage_difference),
            is_exploitable,
        });
    }

    weaknesses.sort_by(|a, b| {
        b.is_exploitable
            .cmp(&a.is_exploitable)
            .then_with(|| a.severity.rank().cmp(&b.severity.rank()))
            .then_with(|| {
                b.percentage_difference
                    .partial_cmp(&a.percentage_difference)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    weaknesses
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate::AggregatedStat;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn aggregate(name: &str, stats: &[(&str, &str, f64)]) -> PlayerAggregate {
        PlayerAggregate {
            name: name.into(),
            stats: stats
                .iter()
                .map(|(id, display, avg)| AggregatedStat {
                    stat_id: (*id).into(),
                    display_name: (*display).into(),
                    average: Some(*avg),
                    min: Some(*avg),
                    max: Some(*avg),
                    standard_deviation: Some(0.0),
                })
                .collect(),
        }
    }

    fn totals_for(entries: &[(&str, &str, f64)]) -> BTreeMap<String, CategoryTotal> {
        entries
            .iter()
            .map(|(id, display, total)| {
                (
                    (*id).to_string(),
                    CategoryTotal {
                        display_name: (*display).into(),
                        total: *total,
                        players: 1,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn counting_totals_sum_player_averages() {
        let roster = vec![
            aggregate("A", &[("12", "Points", 22.0)]),
            aggregate("B", &[("12", "Points", 18.0)]),
        ];
        let totals = category_totals(&roster, &[]);
        let points = totals.get("12").unwrap();
        assert!(approx_eq(points.total, 40.0, 1e-9));
        assert_eq!(points.players, 2);
    }

    #[test]
    fn percentage_totals_average_instead() {
        let roster = vec![
            aggregate("A", &[("5", "FG%", 0.50)]),
            aggregate("B", &[("5", "FG%", 0.40)]),
        ];
        let totals = category_totals(&roster, &["5".to_string()]);
        assert!(approx_eq(totals.get("5").unwrap().total, 0.45, 1e-9));
    }

    #[test]
    fn null_averages_do_not_contribute() {
        let mut roster = vec![aggregate("A", &[("12", "Points", 20.0)])];
        roster.push(PlayerAggregate {
            name: "B".into(),
            stats: vec![AggregatedStat {
                stat_id: "12".into(),
                display_name: "Points".into(),
                average: None,
                min: None,
                max: None,
                standard_deviation: None,
            }],
        });
        let totals = category_totals(&roster, &[]);
        let points = totals.get("12").unwrap();
        assert!(approx_eq(points.total, 20.0, 1e-9));
        assert_eq!(points.players, 1);
    }

    #[test]
    fn weaker_opponent_is_exploitable_high() {
        let opponent = totals_for(&[("12", "Points", 5.0)]);
        let user = totals_for(&[("12", "Points", 10.0)]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);

        assert_eq!(weaknesses.len(), 1);
        let w = &weaknesses[0];
        assert!(w.is_exploitable);
        assert!(approx_eq(w.difference, 5.0, 1e-9));
        assert!(approx_eq(w.percentage_difference, 50.0, 1e-9));
        assert_eq!(w.severity, Severity::High);
    }

    #[test]
    fn turnover_gap_flips_direction() {
        // Opponent commits more turnovers than us: that is their weakness.
        let opponent = totals_for(&[("19", "Turnovers", 14.0)]);
        let user = totals_for(&[("19", "Turnovers", 10.0)]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);

        let w = &weaknesses[0];
        assert!(w.is_exploitable);
        assert!(approx_eq(w.difference, 4.0, 1e-9));
        assert!(approx_eq(w.percentage_difference, 40.0, 1e-9));
    }

    #[test]
    fn stronger_opponent_is_not_exploitable() {
        let opponent = totals_for(&[("12", "Points", 12.0)]);
        let user = totals_for(&[("12", "Points", 10.0)]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);

        let w = &weaknesses[0];
        assert!(!w.is_exploitable);
        // Magnitudes stay non-negative in the output record.
        assert!(approx_eq(w.difference, 2.0, 1e-9));
        assert!(approx_eq(w.percentage_difference, 20.0, 1e-9));
        assert_eq!(w.severity, Severity::High);
    }

    #[test]
    fn below_threshold_gap_is_not_exploitable() {
        let opponent = totals_for(&[("12", "Points", 9.5)]);
        let user = totals_for(&[("12", "Points", 10.0)]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);

        let w = &weaknesses[0];
        assert!(!w.is_exploitable);
        assert_eq!(w.severity, Severity::Low);
    }

    #[test]
    fn skips_one_sided_zero_zero_and_composite_categories() {
        let opponent = totals_for(&[
            ("12", "Points", 50.0),
            ("15", "Rebounds", 30.0),
            ("9004003", "FGM/A", 250.0),
            ("18", "Blocks", 0.0),
        ]);
        let user = totals_for(&[
            ("12", "Points", 55.0),
            ("9004003", "FGM/A", 260.0),
            ("18", "Blocks", 0.0),
        ]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);

        // Rebounds is one-sided, FGM/A is composite, blocks is 0-0.
        assert_eq!(weaknesses.len(), 1);
        assert_eq!(weaknesses[0].stat_id, "12");
    }

    #[test]
    fn zero_user_total_has_zero_percentage() {
        let opponent = totals_for(&[("17", "Steals", 8.0)]);
        let user = totals_for(&[("17", "Steals", 0.0)]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);

        let w = &weaknesses[0];
        assert!(approx_eq(w.percentage_difference, 0.0, 1e-12));
        assert!(!w.is_exploitable);
    }

    #[test]
    fn ordering_exploitable_then_severity_then_magnitude() {
        let opponent = totals_for(&[
            ("12", "Points", 70.0),   // exploitable, high (30%)
            ("15", "Rebounds", 85.0), // exploitable, medium (15%)
            ("16", "Assists", 88.0),  // positive gap but under threshold
            ("17", "Steals", 130.0),  // opponent stronger, high magnitude
        ]);
        let user = totals_for(&[
            ("12", "Points", 100.0),
            ("15", "Rebounds", 100.0),
            ("16", "Assists", 95.0),
            ("17", "Steals", 100.0),
        ]);
        let weaknesses = identify_weaknesses(&opponent, &user, 0.10);
        let ids: Vec<&str> = weaknesses.iter().map(|w| w.stat_id.as_str()).collect();

        // Assists gap is 7.4%: positive but under the 10% threshold.
        assert_eq!(ids, vec!["12", "15", "17", "16"]);
        assert!(weaknesses[0].is_exploitable && weaknesses[1].is_exploitable);
        assert!(!weaknesses[2].is_exploitable && !weaknesses[3].is_exploitable);
    }

    #[test]
    fn severity_tiers() {
        assert_eq!(Severity::from_percentage(25.0), Severity::High);
        assert_eq!(Severity::from_percentage(-25.0), Severity::High);
        assert_eq!(Severity::from_percentage(20.0), Severity::High);
        assert_eq!(Severity::from_percentage(15.0), Severity::Medium);
        assert_eq!(Severity::from_percentage(10.0), Severity::Medium);
        assert_eq!(Severity::from_percentage(9.9), Severity::Low);
    }
}
