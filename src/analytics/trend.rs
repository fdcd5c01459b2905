// Next-week stat prediction.
//
// Three stages per stat: an ordinary-least-squares trend classification over
// the recent weeks, a weighted moving average forecast over the last three
// observations, and an injury-status damping applied to the forecast. A
// player with fewer than two observed weeks gets explicit null predictions;
// the regression and forecast math is never invoked for them.

use crate::analytics::aggregate::{player_histories, PlayerHistory};
use crate::snapshot::{RosterWeek, StatCatalog};
use serde::Serialize;

/// Slope cutoff separating improving/declining from stable, in raw stat
/// units per week. Applied uniformly across categories regardless of their
/// natural scale.
const SLOPE_THRESHOLD: f64 = 0.1;

/// Trend classification looks at no more than this many recent weeks.
const TREND_WINDOW: usize = 5;

/// Forecast weights for the last three observations, oldest first.
const FORECAST_WEIGHTS: [f64; 3] = [0.2, 0.3, 0.5];

// ---------------------------------------------------------------------------
// Trend direction
// ---------------------------------------------------------------------------

/// Direction of a player's recent performance in one stat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Stable,
    Declining,
}

impl Trend {
    pub fn label(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Stable => "stable",
            Trend::Declining => "declining",
        }
    }

    /// Single-character marker for compact table output.
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Improving => "+",
            Trend::Stable => "=",
            Trend::Declining => "-",
        }
    }
}

/// Classify the trend of (week, value) points via the OLS slope of the last
/// `TREND_WINDOW` points. Fewer than two points is always `Stable`.
pub fn calculate_trend(points: &[(u32, f64)]) -> Trend {
    if points.len() < 2 {
        return Trend::Stable;
    }

    let start = points.len().saturating_sub(TREND_WINDOW);
    let window = &points[start..];

    let n = window.len() as f64;
    let sum_x: f64 = window.iter().map(|(w, _)| *w as f64).sum();
    let sum_y: f64 = window.iter().map(|(_, v)| v).sum();
    let sum_xy: f64 = window.iter().map(|(w, v)| *w as f64 * v).sum();
    let sum_x2: f64 = window.iter().map(|(w, _)| (*w as f64).powi(2)).sum();

    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);

    if slope > SLOPE_THRESHOLD {
        Trend::Improving
    } else if slope < -SLOPE_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

/// Weighted moving average over the most recent one to three values
/// (oldest-to-newest input order). Weights: one value takes it as-is, two
/// weigh 40/60, three or more weigh the last three 20/30/50.
pub fn weighted_moving_average(values: &[f64]) -> Option<f64> {
    match values {
        [] => None,
        [only] => Some(*only),
        [prev, last] => Some(0.4 * prev + 0.6 * last),
        [.., v0, v1, v2] => {
            Some(FORECAST_WEIGHTS[0] * v0 + FORECAST_WEIGHTS[1] * v1 + FORECAST_WEIGHTS[2] * v2)
        }
    }
}

/// Forecast for one stat: predicted value, ±1 standard deviation band, trend.
#[derive(Debug, Clone, Copy)]
pub struct StatForecast {
    pub predicted_value: Option<f64>,
    pub confidence_interval: Option<f64>,
    pub trend: Trend,
}

impl StatForecast {
    fn insufficient() -> Self {
        StatForecast {
            predicted_value: None,
            confidence_interval: None,
            trend: Trend::Stable,
        }
    }
}

/// Predict next week's value from this stat's (week, value) history.
///
/// Requires at least two observations; otherwise every field is null and the
/// trend reads stable. The confidence interval is the population standard
/// deviation of the full history, not just the forecast window.
pub fn predict_next_week(series: &[(u32, f64)]) -> StatForecast {
    if series.len() < 2 {
        return StatForecast::insufficient();
    }

    let values: Vec<f64> = series.iter().map(|(_, v)| *v).collect();

    StatForecast {
        predicted_value: weighted_moving_average(&values),
        confidence_interval: crate::analytics::math::std_dev_of(&values),
        trend: calculate_trend(series),
    }
}

// ---------------------------------------------------------------------------
// Injury status
// ---------------------------------------------------------------------------

/// Injury designation parsed from the roster status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InjuryStatus {
    /// INJ or O: not expected to play at all.
    Out,
    /// DTD or Q: availability uncertain.
    Questionable,
    /// No designation, or one we do not recognize.
    Active,
}

impl InjuryStatus {
    /// Parse an upstream status code, case-insensitively.
    pub fn from_code(code: Option<&str>) -> Self {
        let Some(code) = code else {
            return InjuryStatus::Active;
        };
        match code.to_uppercase().as_str() {
            "INJ" | "O" => InjuryStatus::Out,
            "DTD" | "Q" => InjuryStatus::Questionable,
            _ => InjuryStatus::Active,
        }
    }

    /// Multiplier applied to a forecast for a player in this status.
    pub fn damping(&self) -> f64 {
        match self {
            InjuryStatus::Out => 0.0,
            InjuryStatus::Questionable => 0.6,
            InjuryStatus::Active => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InjuryStatus::Out => "OUT",
            InjuryStatus::Questionable => "QUESTIONABLE",
            InjuryStatus::Active => "ACTIVE",
        }
    }
}

/// Damp a forecast for injury status. A null forecast stays null.
pub fn adjust_for_injury(predicted: Option<f64>, status: InjuryStatus) -> Option<f64> {
    predicted.map(|v| v * status.damping())
}

// ---------------------------------------------------------------------------
// Per-player prediction
// ---------------------------------------------------------------------------

/// One stat's prediction for the upcoming week.
#[derive(Debug, Clone, Serialize)]
pub struct PredictedStat {
    pub stat_id: String,
    pub display_name: String,
    pub predicted_value: Option<f64>,
    pub confidence_interval: Option<f64>,
    pub trend: Trend,
}

/// All predicted stats for one player.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPrediction {
    pub name: String,
    pub status: Option<String>,
    pub has_sufficient_data: bool,
    pub predicted_stats: Vec<PredictedStat>,
}

/// Predict next week's stats for every player on the roster.
pub fn predict_roster(weeks: &[RosterWeek], catalog: &StatCatalog) -> Vec<PlayerPrediction> {
    player_histories(weeks)
        .iter()
        .map(|history| predict_player(history, catalog))
        .collect()
}

/// Predict next week's stats for one player.
///
/// A player observed in fewer than two weeks gets null predictions for every
/// stat; the forecast math is skipped entirely. Output follows the league
/// settings stat order, with unknown ids after the known ones.
pub fn predict_player(history: &PlayerHistory, catalog: &StatCatalog) -> PlayerPrediction {
    let mut stat_ids = history.observed_stat_ids();
    stat_ids.sort_by_key(|id| catalog.order_index(id).unwrap_or(usize::MAX));

    let has_sufficient_data = history.weeks.len() >= 2;
    let status = InjuryStatus::from_code(history.status.as_deref());

    let predicted_stats = stat_ids
        .into_iter()
        .map(|stat_id| {
            let forecast = if has_sufficient_data {
                predict_next_week(&history.series(&stat_id))
            } else {
                StatForecast::insufficient()
            };
            PredictedStat {
                display_name: catalog.display_name(&stat_id).to_string(),
                predicted_value: adjust_for_injury(forecast.predicted_value, status),
                confidence_interval: forecast.confidence_interval,
                trend: forecast.trend,
                stat_id,
            }
        })
        .collect();

    PlayerPrediction {
        name: history.name.clone(),
        status: history.status.clone(),
        has_sufficient_data,
        predicted_stats,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
