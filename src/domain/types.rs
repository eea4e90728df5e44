//! Shared domain types.
//!
//! Everything here is created fresh per fetch (dashboard load) or per assistant
//! reply and is never mutated after construction. Types are serializable so the
//! same values can be:
//!
//! - printed by the terminal front-end
//! - exported to JSON/CSV
//! - exchanged with the conversational backend (chart payloads)

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Category assigned when a series name is not in the classification table.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Observation date as received upstream (`YYYY-MM` or `YYYY-MM-DD`).
///
/// The original text is kept for output; ordering uses the parsed calendar day
/// (`YYYY-MM` maps to the first of the month).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservationDate {
    day: NaiveDate,
    label: String,
}

impl ObservationDate {
    pub fn parse(raw: &str) -> Option<Self> {
        let label = raw.trim();
        let day = NaiveDate::parse_from_str(label, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(&format!("{label}-01"), "%Y-%m-%d"))
            .ok()?;
        Some(Self {
            day,
            label: label.to_string(),
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn as_str(&self) -> &str {
        &self.label
    }
}

impl Ord for ObservationDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.day.cmp(&other.day).then_with(|| self.label.cmp(&other.label))
    }
}

impl PartialOrd for ObservationDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for ObservationDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

impl<'de> Deserialize<'de> for ObservationDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ObservationDate::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid observation date '{raw}'")))
    }
}

/// How MoM/YoY changes are expressed for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeBasis {
    /// `(v[i] - v[i-k]) / v[i-k] * 100`.
    Percent,
    /// `v[i] - v[i-k]` (rate series such as an unemployment rate).
    Points,
}

/// One monthly reading plus its derived metrics.
///
/// `None` always means "no data"; `Some(0.0)` is a real, flat reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: ObservationDate,
    pub value: Option<f64>,
    pub mom_change: Option<f64>,
    pub yoy_change: Option<f64>,
    pub mom_12mo_avg: Option<f64>,
    pub mom_36mo_avg: Option<f64>,
}

impl Observation {
    /// A bare reading with no derived fields.
    pub fn raw(date: ObservationDate, value: Option<f64>) -> Self {
        Self {
            date,
            value,
            mom_change: None,
            yoy_change: None,
            mom_12mo_avg: None,
            mom_36mo_avg: None,
        }
    }
}

/// A fully processed series: normalized, enriched, and categorized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    pub category: String,
    pub basis: ChangeBasis,
    /// Unique per date, ascending.
    pub observations: Vec<Observation>,
}

impl Series {
    pub fn latest(&self) -> Option<&Observation> {
        self.observations.last()
    }
}

/// Consumer-dashboard view: only the most recent observation is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub id: String,
    pub series_name: String,
    pub basis: ChangeBasis,
    pub latest: Option<Observation>,
}

impl From<&Series> for Indicator {
    fn from(series: &Series) -> Self {
        Self {
            id: series.id.clone(),
            series_name: series.name.clone(),
            basis: series.basis,
            latest: series.latest().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub material: String,
    pub points: Vec<ChartPoint>,
}

/// Chart-ready payload exchanged with the conversational backend.
///
/// Wire shape is either `{title, points}` or `{title, series}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPayload {
    Multi {
        title: String,
        series: Vec<ChartSeries>,
    },
    Single {
        title: String,
        points: Vec<ChartPoint>,
    },
}

impl ChartPayload {
    pub fn title(&self) -> &str {
        match self {
            ChartPayload::Multi { title, .. } | ChartPayload::Single { title, .. } => title,
        }
    }

    /// Every point in every series, in payload order.
    pub fn all_points(&self) -> Vec<&ChartPoint> {
        match self {
            ChartPayload::Single { points, .. } => points.iter().collect(),
            ChartPayload::Multi { series, .. } => series.iter().flat_map(|s| s.points.iter()).collect(),
        }
    }

    /// Points grouped per line (a single-series payload is one line).
    pub fn lines(&self) -> Vec<&[ChartPoint]> {
        match self {
            ChartPayload::Single { points, .. } => vec![points.as_slice()],
            ChartPayload::Multi { series, .. } => series.iter().map(|s| s.points.as_slice()).collect(),
        }
    }
}

/// Kind of data-quality event raised while building a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MalformedDocument,
    DroppedObservation,
    DuplicateDate,
    DroppedSeries,
    UnmatchedCategory,
}

/// A non-fatal data-quality event, kept for upstream triage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub subject: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
        }
    }
}

/// Whether precomputed upstream metrics are trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsPolicy {
    /// Recompute every derived field, ignoring upstream values.
    pub recompute: bool,
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Number of trailing levels shown in a grid sparkline.
    pub trend_window: usize,
    /// Number of trailing MoM points per chart line.
    pub chart_window: usize,
    /// Categories shown first on the grid, in this order.
    pub category_priority: Vec<String>,
    /// Series ids or names whose changes are percentage points.
    pub rate_series: Vec<String>,
    pub metrics: MetricsPolicy,
    /// Optional replacement for the built-in category table.
    pub category_table: Option<PathBuf>,
}

pub const DEFAULT_TREND_WINDOW: usize = 36;
pub const DEFAULT_CHART_WINDOW: usize = 36;

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            trend_window: DEFAULT_TREND_WINDOW,
            chart_window: DEFAULT_CHART_WINDOW,
            category_priority: vec!["Econ Indicators".to_string(), "Indexes/Inputs".to_string()],
            rate_series: vec![
                "UNRATE".to_string(),
                "Unemployment Rate".to_string(),
                "Labor Force Participation Rate".to_string(),
            ],
            metrics: MetricsPolicy::default(),
            category_table: None,
        }
    }
}

impl PipelineConfig {
    pub fn basis_for(&self, id: &str, name: &str) -> ChangeBasis {
        if self.rate_series.iter().any(|s| s == id || s == name) {
            ChangeBasis::Points
        } else {
            ChangeBasis::Percent
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_and_day_dates_order_together() {
        let month = ObservationDate::parse("2024-03").unwrap();
        let day = ObservationDate::parse("2024-02-15").unwrap();
        assert!(day < month);
        assert_eq!(month.day(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(month.as_str(), "2024-03");
    }

    #[test]
    fn rejects_garbage_dates() {
        assert!(ObservationDate::parse("March 2024").is_none());
        assert!(ObservationDate::parse("2024-13").is_none());
        assert!(ObservationDate::parse("").is_none());
    }

    #[test]
    fn chart_payload_wire_shapes() {
        let single: ChartPayload =
            serde_json::from_str(r#"{"title":"Cement","points":[{"date":"2024-01","value":0.5}]}"#).unwrap();
        assert!(matches!(single, ChartPayload::Single { ref points, .. } if points.len() == 1));

        let multi: ChartPayload = serde_json::from_str(
            r#"{"title":"Steel vs Copper","series":[{"material":"Steel","points":[]},{"material":"Copper","points":[]}]}"#,
        )
        .unwrap();
        assert!(matches!(multi, ChartPayload::Multi { ref series, .. } if series.len() == 2));
        assert_eq!(multi.title(), "Steel vs Copper");
    }

    #[test]
    fn rate_series_use_points_basis() {
        let config = PipelineConfig::default();
        assert_eq!(config.basis_for("UNRATE", "anything"), ChangeBasis::Points);
        assert_eq!(config.basis_for("x", "Unemployment Rate"), ChangeBasis::Points);
        assert_eq!(config.basis_for("WPU", "Cement"), ChangeBasis::Percent);
    }
}
