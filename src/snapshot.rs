// Normalized team snapshot: the engine's input records and their JSON loader.
//
// The upstream fantasy API returns deeply nested, array-indexed JSON. That
// unpacking is the fetch layer's job and happens once, at the boundary; the
// engine only ever sees the flat records defined here. Stat values stay as
// raw strings ("12", "0.482", "-") because the API uses placeholder strings
// for unrecorded stats, and "no data" must never become 0.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Matchup status marking a completed, scoreable week.
pub const STATUS_COMPLETE: &str = "postevent";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid snapshot: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Stat records
// ---------------------------------------------------------------------------

/// One raw stat observation: the category id and its unparsed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatValue {
    pub stat_id: String,
    pub value: String,
}

/// A stat category definition from league settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatDefinition {
    pub stat_id: String,
    pub display_name: String,
}

/// League stat taxonomy: display-name lookup plus the settings display order.
#[derive(Debug, Clone)]
pub struct StatCatalog {
    defs: Vec<StatDefinition>,
    index: HashMap<String, usize>,
}

impl StatCatalog {
    pub fn new(defs: &[StatDefinition]) -> Self {
        let index = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.stat_id.clone(), i))
            .collect();
        StatCatalog {
            defs: defs.to_vec(),
            index,
        }
    }

    /// Display name for a stat id, or `""` for ids the league never defined.
    pub fn display_name(&self, stat_id: &str) -> &str {
        self.index
            .get(stat_id)
            .map(|&i| self.defs[i].display_name.as_str())
            .unwrap_or("")
    }

    /// Position of a stat id in the league settings order.
    pub fn order_index(&self, stat_id: &str) -> Option<usize> {
        self.index.get(stat_id).copied()
    }

    pub fn definitions(&self) -> &[StatDefinition] {
        &self.defs
    }
}

// ---------------------------------------------------------------------------
// Weekly roster records
// ---------------------------------------------------------------------------

/// One player's stat line for a single week.
///
/// Identity is the display name, case- and whitespace-sensitive; two rows
/// with the same name in different weeks are the same logical player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerWeekRow {
    pub name: String,
    #[serde(default)]
    pub status: Option<String>,
    pub stats: Vec<StatValue>,
}

impl PlayerWeekRow {
    /// Raw value for a stat id, if recorded this week.
    pub fn stat(&self, stat_id: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|s| s.stat_id == stat_id)
            .map(|s| s.value.as_str())
    }
}

/// Roster snapshot for one league week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterWeek {
    pub week: u32,
    pub players: Vec<PlayerWeekRow>,
}

// ---------------------------------------------------------------------------
// Matchup records
// ---------------------------------------------------------------------------

/// A stat entry inside a matchup, carrying its display name from settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedStat {
    pub stat_id: String,
    pub display_name: String,
    pub value: String,
}

/// One head-to-head weekly matchup: our totals vs. one opponent's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub week: u32,
    pub status: String,
    pub team_stats: Vec<NamedStat>,
    pub opponent_stats: Vec<NamedStat>,
}

impl MatchupRecord {
    /// Whether this matchup has finished and can be scored.
    pub fn is_complete(&self) -> bool {
        self.status == STATUS_COMPLETE
    }

    pub fn team_stat(&self, stat_id: &str) -> Option<&NamedStat> {
        self.team_stats.iter().find(|s| s.stat_id == stat_id)
    }

    pub fn opponent_stat(&self, stat_id: &str) -> Option<&NamedStat> {
        self.opponent_stats.iter().find(|s| s.stat_id == stat_id)
    }
}

// ---------------------------------------------------------------------------
// Top-level snapshot
// ---------------------------------------------------------------------------

/// An opposing team's roster history, for weakness scouting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentSnapshot {
    pub team_name: String,
    pub roster_weeks: Vec<RosterWeek>,
}

/// Everything the engine needs for one team: league taxonomy, weekly roster
/// history, season matchups, and optionally an opponent to scout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub league_name: String,
    pub team_name: String,
    pub current_week: u32,
    pub stat_categories: Vec<StatDefinition>,
    pub roster_weeks: Vec<RosterWeek>,
    #[serde(default)]
    pub matchups: Vec<MatchupRecord>,
    #[serde(default)]
    pub opponent: Option<OpponentSnapshot>,
}

impl TeamSnapshot {
    pub fn catalog(&self) -> StatCatalog {
        StatCatalog::new(&self.stat_categories)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load and validate a team snapshot from a JSON file.
pub fn load_snapshot(path: &Path) -> Result<TeamSnapshot, SnapshotError> {
    let text = std::fs::read_to_string(path).map_err(|e| SnapshotError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let snapshot: TeamSnapshot =
        serde_json::from_str(&text).map_err(|e| SnapshotError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;

    validate(&snapshot)?;

    let complete = snapshot.matchups.iter().filter(|m| m.is_complete()).count();
    debug!(
        "snapshot loaded: {} stat categories, {} roster weeks, {}/{} matchups complete",
        snapshot.stat_categories.len(),
        snapshot.roster_weeks.len(),
        complete,
        snapshot.matchups.len()
    );

    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject malformed snapshots up front.
///
/// Sparse data (missing weeks, unrecorded stats) is normal and flows through
/// the engine as-is; the conditions here are producer bugs, not sparsity.
fn validate(snapshot: &TeamSnapshot) -> Result<(), SnapshotError> {
    if snapshot.current_week == 0 {
        return Err(SnapshotError::Validation(
            "current_week must be at least 1".into(),
        ));
    }

    if snapshot.stat_categories.is_empty() {
        warn!("snapshot has no stat category definitions; display names will be blank");
    }

    validate_roster_weeks(&snapshot.roster_weeks, snapshot.current_week, "team")?;
    if let Some(opponent) = &snapshot.opponent {
        validate_roster_weeks(
            &opponent.roster_weeks,
            snapshot.current_week,
            &opponent.team_name,
        )?;
    }

    Ok(())
}

fn validate_roster_weeks(
    weeks: &[RosterWeek],
    current_week: u32,
    label: &str,
) -> Result<(), SnapshotError> {
    let mut seen_weeks = HashSet::new();

    for roster in weeks {
        if roster.week == 0 || roster.week > current_week {
            return Err(SnapshotError::Validation(format!(
                "{label} roster week {} is outside 1..={current_week}",
                roster.week
            )));
        }
        if !seen_weeks.insert(roster.week) {
            return Err(SnapshotError::Validation(format!(
                "{label} roster has two snapshots for week {}",
                roster.week
            )));
        }

        let mut seen_players = HashSet::new();
        for row in &roster.players {
            if !seen_players.insert(row.name.as_str()) {
                return Err(SnapshotError::Validation(format!(
                    "{label} roster week {} lists player \"{}\" twice",
                    roster.week, row.name
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(id: &str, value: &str) -> StatValue {
        StatValue {
            stat_id: id.into(),
            value: value.into(),
        }
    }

    fn snapshot_with_weeks(weeks: Vec<RosterWeek>) -> TeamSnapshot {
        TeamSnapshot {
            league_name: "Test League".into(),
            team_name: "Test Team".into(),
            current_week: 3,
            stat_categories: vec![StatDefinition {
                stat_id: "12".into(),
                display_name: "Points".into(),
            }],
            roster_weeks: weeks,
            matchups: Vec::new(),
            opponent: None,
        }
    }

    fn week(n: u32, names: &[&str]) -> RosterWeek {
        RosterWeek {
            week: n,
            players: names
                .iter()
                .map(|name| PlayerWeekRow {
                    name: (*name).into(),
                    status: None,
                    stats: vec![stat("12", "20")],
                })
                .collect(),
        }
    }

    #[test]
    fn catalog_lookup_and_order() {
        let defs = vec![
            StatDefinition {
                stat_id: "5".into(),
                display_name: "FG%".into(),
            },
            StatDefinition {
                stat_id: "12".into(),
                display_name: "Points".into(),
            },
        ];
        let catalog = StatCatalog::new(&defs);

        assert_eq!(catalog.display_name("12"), "Points");
        assert_eq!(catalog.display_name("99"), "");
        assert_eq!(catalog.order_index("5"), Some(0));
        assert_eq!(catalog.order_index("12"), Some(1));
        assert_eq!(catalog.order_index("99"), None);
    }

    #[test]
    fn row_stat_lookup() {
        let row = PlayerWeekRow {
            name: "A. Player".into(),
            status: None,
            stats: vec![stat("12", "31"), stat("19", "-")],
        };
        assert_eq!(row.stat("12"), Some("31"));
        assert_eq!(row.stat("19"), Some("-"));
        assert_eq!(row.stat("15"), None);
    }

    #[test]
    fn valid_snapshot_passes() {
        let snapshot = snapshot_with_weeks(vec![week(1, &["A"]), week(2, &["A", "B"])]);
        assert!(validate(&snapshot).is_ok());
    }

    #[test]
    fn duplicate_week_rejected() {
        let snapshot = snapshot_with_weeks(vec![week(1, &["A"]), week(1, &["B"])]);
        assert!(matches!(
            validate(&snapshot),
            Err(SnapshotError::Validation(_))
        ));
    }

    #[test]
    fn duplicate_player_in_week_rejected() {
        let snapshot = snapshot_with_weeks(vec![week(2, &["A", "A"])]);
        assert!(matches!(
            validate(&snapshot),
            Err(SnapshotError::Validation(_))
        ));
    }

    #[test]
    fn week_beyond_current_rejected() {
        let snapshot = snapshot_with_weeks(vec![week(7, &["A"])]);
        assert!(matches!(
            validate(&snapshot),
            Err(SnapshotError::Validation(_))
        ));
    }

    #[test]
    fn matchup_completion_and_lookup() {
        let matchup = MatchupRecord {
            week: 1,
            status: STATUS_COMPLETE.into(),
            team_stats: vec![NamedStat {
                stat_id: "12".into(),
                display_name: "Points".into(),
                value: "310".into(),
            }],
            opponent_stats: Vec::new(),
        };
        assert!(matchup.is_complete());
        assert_eq!(matchup.team_stat("12").unwrap().value, "310");
        assert!(matchup.opponent_stat("12").is_none());

        let live = MatchupRecord {
            status: "live".into(),
            ..matchup
        };
        assert!(!live.is_complete());
    }

    #[test]
    fn snapshot_roundtrips_through_json() {
        let snapshot = snapshot_with_weeks(vec![week(1, &["A"])]);
        let text = serde_json::to_string(&snapshot).unwrap();
        let back: TeamSnapshot = serde_json::from_str(&text).unwrap();
        assert_eq!(back.team_name, snapshot.team_name);
        assert_eq!(back.roster_weeks.len(), 1);
        assert!(back.opponent.is_none());
    }
}
