// Multi-week roster aggregation.
//
// Groups weekly roster rows by player identity and reduces each player's
// observed stat values to average/min/max/standard deviation. A player absent
// in some weeks simply has fewer observations; a missing week is never
// treated as a zero.

use crate::analytics::math;
use crate::snapshot::{RosterWeek, StatCatalog, StatValue};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Player histories (grouping)
// ---------------------------------------------------------------------------

/// One player's stat line for one week, after grouping.
#[derive(Debug, Clone)]
pub struct PlayerWeekStats {
    pub week: u32,
    pub stats: Vec<StatValue>,
}

/// All observed weeks for one player, sorted ascending by week.
#[derive(Debug, Clone)]
pub struct PlayerHistory {
    pub name: String,
    /// Injury status captured the first week the player appears.
    pub status: Option<String>,
    pub weeks: Vec<PlayerWeekStats>,
}

impl PlayerHistory {
    /// Raw values for one stat across all observed weeks, in week order.
    /// Includes placeholder values; callers filter through `math`.
    pub fn raw_values(&self, stat_id: &str) -> Vec<&str> {
        self.weeks
            .iter()
            .filter_map(|w| w.stats.iter().find(|s| s.stat_id == stat_id))
            .map(|s| s.value.as_str())
            .collect()
    }

    /// Parseable (week, value) points for one stat, in week order.
    pub fn series(&self, stat_id: &str) -> Vec<(u32, f64)> {
        self.weeks
            .iter()
            .filter_map(|w| {
                let raw = w.stats.iter().find(|s| s.stat_id == stat_id)?;
                math::parse_numeric(&raw.value).map(|v| (w.week, v))
            })
            .collect()
    }

    /// Every stat id observed in any week, deduplicated, in ascending
    /// numeric id order (ids that do not parse sort after those that do).
    pub fn observed_stat_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for week in &self.weeks {
            for stat in &week.stats {
                if !ids.contains(&stat.stat_id) {
                    ids.push(stat.stat_id.clone());
                }
            }
        }
        sort_stat_ids(&mut ids);
        ids
    }
}

/// Ascending numeric sort for stat ids, with non-numeric ids last.
pub fn sort_stat_ids(ids: &mut [String]) {
    ids.sort_by_key(|id| (id.parse::<u64>().unwrap_or(u64::MAX), id.clone()));
}

/// Group weekly roster snapshots by player name.
///
/// Output order is first-appearance order across weeks (ascending), so the
/// grouping is stable for identical inputs. Each player's weeks come out
/// sorted ascending regardless of input order.
pub fn player_histories(weeks: &[RosterWeek]) -> Vec<PlayerHistory> {
    let mut ordered: Vec<&RosterWeek> = weeks.iter().collect();
    ordered.sort_by_key(|w| w.week);

    let mut histories: Vec<PlayerHistory> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for roster in ordered {
        for row in &roster.players {
            let idx = *by_name.entry(row.name.clone()).or_insert_with(|| {
                histories.push(PlayerHistory {
                    name: row.name.clone(),
                    status: row.status.clone(),
                    weeks: Vec::new(),
                });
                histories.len() - 1
            });
            histories[idx].weeks.push(PlayerWeekStats {
                week: roster.week,
                stats: row.stats.clone(),
            });
        }
    }

    histories
}

// ---------------------------------------------------------------------------
// Aggregated output
// ---------------------------------------------------------------------------

/// Reduced view of one stat across a player's observed weeks.
/// `None` fields mean zero qualifying (numeric) observations.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedStat {
    pub stat_id: String,
    pub display_name: String,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub standard_deviation: Option<f64>,
}

/// All aggregated stats for one player, sorted by ascending numeric stat id.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub stats: Vec<AggregatedStat>,
}

/// Aggregate every player's stats across all observed weeks.
pub fn aggregate_roster(weeks: &[RosterWeek], catalog: &StatCatalog) -> Vec<PlayerAggregate> {
    player_histories(weeks)
        .iter()
        .map(|history| aggregate_player(history, catalog))
        .collect()
}

fn aggregate_player(history: &PlayerHistory, catalog: &StatCatalog) -> PlayerAggregate {
    let mut stats = Vec::new();

    for stat_id in history.observed_stat_ids() {
        let raw = history.raw_values(&stat_id);
        stats.push(AggregatedStat {
            display_name: catalog.display_name(&stat_id).to_string(),
            average: math::average(&raw),
            min: math::min(&raw),
            max: math::max(&raw),
            standard_deviation: math::std_dev(&raw),
            stat_id,
        });
    }

    PlayerAggregate {
        name: history.name.clone(),
        stats,
    }
}

// ---------------------------------------------------------------------------
// Stat ranges (roster-wide spread of player averages)
// ---------------------------------------------------------------------------

/// Min/max of per-player averages for one stat, for heat scaling.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatRange {
    pub min: f64,
    pub max: f64,
}

impl StatRange {
    /// Position of a value in this range, 0.0 (min) to 1.0 (max).
    /// `None` when the range is degenerate (all players identical).
    pub fn normalized(&self, value: f64) -> Option<f64> {
        if self.max == self.min {
            return None;
        }
        Some((value - self.min) / (self.max - self.min))
    }
}

/// Per-stat spread of player averages across the roster.
///
/// Stats where no player has a numeric average are absent from the map.
pub fn stat_ranges(players: &[PlayerAggregate]) -> BTreeMap<String, StatRange> {
    let mut ranges: BTreeMap<String, StatRange> = BTreeMap::new();

    for player in players {
        for stat in &player.stats {
            let Some(avg) = stat.average else {
                continue;
            };
            ranges
                .entry(stat.stat_id.clone())
                .and_modify(|r| {
                    r.min = r.min.min(avg);
                    r.max = r.max.max(avg);
                })
                .or_insert(StatRange { min: avg, max: avg });
        }
    }

    ranges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
