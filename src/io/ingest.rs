//! Document ingest and normalization (the series loader).
//!
//! This module turns raw store documents into clean, date-ordered series that
//! are safe to enrich:
//!
//! - **Schema drift** is handled once, here, through an explicit synonym table
//!   (`mom_growth` and `mom_change` are the same field).
//! - **Row-level validation**: observations with unusable dates are dropped and
//!   reported, never guessed.
//! - **Uniqueness**: one observation per calendar day; the last occurrence in
//!   document order wins.
//! - No derived-metric math and no categorization here.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{Diagnostic, DiagnosticKind, Observation, ObservationDate};
use crate::error::AppError;

/// Derived fields an upstream document may already carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricField {
    MomChange,
    YoyChange,
    Mom12moAvg,
    Mom36moAvg,
}

/// Accepted upstream spellings per field, checked in this order.
pub const FIELD_SYNONYMS: [(MetricField, &[&str]); 4] = [
    (MetricField::MomChange, &["mom_change", "mom_growth"]),
    (MetricField::YoyChange, &["yoy_change", "yoy_growth"]),
    (MetricField::Mom12moAvg, &["mom_12mo_avg"]),
    (MetricField::Mom36moAvg, &["mom_36mo_avg"]),
];

/// Names that stand in for "no name" in upstream documents.
const PLACEHOLDER_NAMES: [&str; 3] = ["—", "-", "N/A"];

/// A normalized series before enrichment and categorization.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub id: String,
    /// Trimmed `series_name`; empty when the document had none.
    pub name: String,
    /// Unique per day, ascending.
    pub observations: Vec<Observation>,
}

impl LoadedSeries {
    /// True when the name is empty or a known placeholder.
    pub fn has_placeholder_name(&self) -> bool {
        self.name.is_empty() || PLACEHOLDER_NAMES.contains(&self.name.as_str())
    }
}

/// Ingest output: normalized series + everything that was dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub series: Vec<LoadedSeries>,
    pub diagnostics: Vec<Diagnostic>,
    pub documents_read: usize,
}

/// Read an offline document file.
///
/// Accepts either a bare JSON array of documents or `{"documents": [...]}`.
pub fn read_documents_json(path: &Path) -> Result<Vec<Value>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open documents '{}': {e}", path.display())))?;
    let value: Value = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid documents JSON '{}': {e}", path.display())))?;
    documents_from_value(value).map_err(|msg| AppError::new(2, format!("{msg} ('{}')", path.display())))
}

/// Unwrap a document collection body into its documents.
pub fn documents_from_value(value: Value) -> Result<Vec<Value>, String> {
    match value {
        Value::Array(docs) => Ok(docs),
        Value::Object(mut obj) => match obj.remove("documents") {
            Some(Value::Array(docs)) => Ok(docs),
            _ => Err("Expected a JSON array of documents or an object with a `documents` array".to_string()),
        },
        _ => Err("Expected a JSON array of documents".to_string()),
    }
}

/// Normalize raw documents into series, in document order.
pub fn load_documents(documents: &[Value]) -> LoadReport {
    let mut report = LoadReport {
        documents_read: documents.len(),
        ..LoadReport::default()
    };

    for (idx, doc) in documents.iter().enumerate() {
        let Some(obj) = doc.as_object() else {
            warn!(index = idx, "skipping non-object document");
            report.diagnostics.push(Diagnostic::new(
                DiagnosticKind::MalformedDocument,
                format!("document #{idx}"),
                "document is not a JSON object",
            ));
            continue;
        };

        let series = load_document(idx, obj, &mut report.diagnostics);
        debug!(id = %series.id, observations = series.observations.len(), "loaded series");
        report.series.push(series);
    }

    report
}

fn load_document(idx: usize, obj: &Map<String, Value>, diagnostics: &mut Vec<Diagnostic>) -> LoadedSeries {
    let name = obj
        .get("series_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("")
        .to_string();

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ if !name.is_empty() => name.clone(),
        _ => format!("document-{idx}"),
    };

    let raw_observations: &[Value] = match obj.get("observations") {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(_) => {
            warn!(id = %id, "`observations` is not an array");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::MalformedDocument,
                id.clone(),
                "`observations` is not an array",
            ));
            &[]
        }
    };

    // Keyed by calendar day so `2024-01` and `2024-01-01` collapse to one reading.
    let mut by_day: BTreeMap<NaiveDate, Observation> = BTreeMap::new();
    for (line, raw) in raw_observations.iter().enumerate() {
        match parse_observation(raw) {
            Ok(obs) => {
                if let Some(prev) = by_day.insert(obs.date.day(), obs) {
                    warn!(id = %id, date = %prev.date, "duplicate observation date; keeping the later one");
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::DuplicateDate,
                        id.clone(),
                        format!("duplicate observation for {}", prev.date),
                    ));
                }
            }
            Err(message) => {
                warn!(id = %id, index = line, %message, "dropping observation");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DroppedObservation,
                    id.clone(),
                    format!("observation #{line}: {message}"),
                ));
            }
        }
    }

    LoadedSeries {
        id,
        name,
        observations: by_day.into_values().collect(),
    }
}

fn parse_observation(raw: &Value) -> Result<Observation, String> {
    let obj = raw.as_object().ok_or_else(|| "not a JSON object".to_string())?;

    let date_raw = obj
        .get("date")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing `date`".to_string())?;
    let date = ObservationDate::parse(date_raw)
        .ok_or_else(|| format!("invalid date '{date_raw}' (expected YYYY-MM or YYYY-MM-DD)"))?;

    Ok(Observation {
        mom_change: field(obj, MetricField::MomChange),
        yoy_change: field(obj, MetricField::YoyChange),
        mom_12mo_avg: field(obj, MetricField::Mom12moAvg),
        mom_36mo_avg: field(obj, MetricField::Mom36moAvg),
        ..Observation::raw(date, obj.get("value").and_then(numeric))
    })
}

/// First numeric value among the field's synonyms, in declared order.
fn field(obj: &Map<String, Value>, wanted: MetricField) -> Option<f64> {
    let (_, names) = FIELD_SYNONYMS.iter().find(|(f, _)| *f == wanted)?;
    names.iter().find_map(|name| obj.get(*name).and_then(numeric))
}

/// Interpret a JSON value as a finite number.
///
/// Numeric strings are accepted (some exports quote everything); `"."`, `""`,
/// `null` and non-finite values are absent, never zero.
pub fn numeric(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed == "." {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };
    if v.is_finite() { Some(v) } else { None }
}
