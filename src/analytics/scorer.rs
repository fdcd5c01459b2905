// Season category report card.
//
// Scores every completed matchup category-by-category into win/loss/tie
// tallies, win points, an average victory margin, and a letter grade derived
// from the category win rate.

use crate::analytics::direction::{is_lower_better, should_skip_highlight};
use crate::analytics::math::parse_numeric;
use crate::snapshot::MatchupRecord;
use serde::Serialize;
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Outcome of one (matchup, category) pair
// ---------------------------------------------------------------------------

/// How one category went in one matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

/// Resolve one category of one matchup.
///
/// Returns `None` when the pair cannot be scored: the opponent has no entry
/// for the stat, or either side's value is not numeric. Such pairs count
/// toward neither wins nor games. The margin is normalized so positive
/// always means advantage for our team (opponent minus team for
/// lower-is-better categories).
pub fn determine_outcome(
    matchup: &MatchupRecord,
    stat_id: &str,
    display_name: &str,
) -> Option<(Outcome, f64)> {
    let team_stat = matchup.team_stat(stat_id)?;
    let opponent_stat = matchup.opponent_stat(stat_id)?;

    let team_value = parse_numeric(&team_stat.value)?;
    let opponent_value = parse_numeric(&opponent_stat.value)?;

    if team_value == opponent_value {
        return Some((Outcome::Tie, 0.0));
    }

    let lower_is_better = is_lower_better(stat_id, display_name);
    let team_won = if lower_is_better {
        team_value < opponent_value
    } else {
        team_value > opponent_value
    };
    let margin = if lower_is_better {
        opponent_value - team_value
    } else {
        team_value - opponent_value
    };

    let outcome = if team_won { Outcome::Win } else { Outcome::Loss };
    Some((outcome, margin))
}

// ---------------------------------------------------------------------------
// Category summary
// ---------------------------------------------------------------------------

/// Season tallies for one category. Invariant: wins + losses + ties == games.
#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub stat_id: String,
    pub display_name: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub games: u32,
    pub win_points: f64,
    pub average_margin: Option<f64>,
}

impl CategorySummary {
    fn new(stat_id: &str, display_name: &str) -> Self {
        CategorySummary {
            stat_id: stat_id.into(),
            display_name: display_name.into(),
            wins: 0,
            losses: 0,
            ties: 0,
            games: 0,
            win_points: 0.0,
            average_margin: None,
        }
    }

    /// Fraction of win points earned over games played.
    pub fn win_rate(&self) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.win_points / self.games as f64
    }

    fn record(&mut self, outcome: Outcome, margin: f64) {
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                self.win_points += 1.0;
            }
            Outcome::Loss => self.losses += 1,
            Outcome::Tie => {
                self.ties += 1;
                self.win_points += 0.5;
            }
        }
        self.games += 1;

        // Incremental mean keeps the running margin exact per game count.
        let prior_total = self.average_margin.unwrap_or(0.0) * (self.games - 1) as f64;
        self.average_margin = Some((prior_total + margin) / self.games as f64);
    }
}

/// Score all completed matchups into per-category summaries.
///
/// Only `postevent` matchups count. Composite made/attempted categories are
/// skipped, and unscoreable (matchup, category) pairs contribute nothing.
/// Output keeps only categories with at least one game, sorted descending by
/// win rate; equal win rates stay in first-encounter order.
pub fn build_category_summaries(matchups: &[MatchupRecord]) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for matchup in matchups.iter().filter(|m| m.is_complete()) {
        for team_stat in &matchup.team_stats {
            if should_skip_highlight(&team_stat.display_name) {
                continue;
            }

            let Some((outcome, margin)) =
                determine_outcome(matchup, &team_stat.stat_id, &team_stat.display_name)
            else {
                continue;
            };

            let idx = *index.entry(team_stat.stat_id.clone()).or_insert_with(|| {
                summaries.push(CategorySummary::new(
                    &team_stat.stat_id,
                    &team_stat.display_name,
                ));
                summaries.len() - 1
            });
            summaries[idx].record(outcome, margin);
        }
    }

    summaries.retain(|s| s.games > 0);
    summaries.sort_by(|a, b| {
        b.win_rate()
            .partial_cmp(&a.win_rate())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    summaries
}

// ---------------------------------------------------------------------------
// Letter grades
// ---------------------------------------------------------------------------

/// Letter grade for a category win rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

/// Minimum win rate for each grade, checked highest-first.
const GRADE_THRESHOLDS: &[(f64, Grade)] = &[
    (0.75, Grade::A),
    (0.60, Grade::B),
    (0.50, Grade::C),
    (0.40, Grade::D),
];

impl Grade {
    /// Map a win rate to a letter grade via the fixed threshold table.
    pub fn from_win_rate(win_rate: f64) -> Self {
        for &(min, grade) in GRADE_THRESHOLDS {
            if win_rate >= min {
                return grade;
            }
        }
        Grade::F
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
