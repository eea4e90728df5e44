//! Shared dashboard pipeline used by every front-end command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! documents -> load -> derived metrics -> filter -> categorize -> rank/group
//!
//! The `build_*` functions are pure and deterministic: the same documents give
//! structurally identical output. The `load_*`/`ask_*` functions wrap them with
//! the external fetch and turn collaborator failures into `Fetched::Failed`.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::category::{CategoryTable, Categorizer};
use crate::chart::{ChartView, Sparkline, build_payload};
use crate::data::{AssistantClient, AssistantReply, StoreClient};
use crate::domain::{ChangeBasis, Diagnostic, DiagnosticKind, Indicator, Observation, PipelineConfig, Series};
use crate::error::AppError;
use crate::io::ingest::{LoadedSeries, load_documents, read_documents_json};
use crate::metrics::derive_metrics;
use crate::rank::{CategoryGroup, group_by_category, rank_items};

/// Where documents come from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Offline JSON file.
    File(PathBuf),
    /// A collection in the observation store.
    Store { collection: String },
}

/// Outcome of a step that crosses an external boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ready(T),
    /// The collaborator failed; the reason has already been logged.
    Failed(AppError),
}

/// Read-only grid row: `{name, category, latest, trend}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub basis: ChangeBasis,
    pub latest: Option<Observation>,
    pub trend: Sparkline,
}

/// The category-grouped materials dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridDashboard {
    pub groups: Vec<CategoryGroup<GridRow>>,
    /// Most recent observation date across all rows.
    pub latest_month: Option<String>,
    pub series_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The ranked consumer indicator dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorDashboard {
    pub indicators: Vec<Indicator>,
    pub diagnostics: Vec<Diagnostic>,
}

/// What the assistant view should show.
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantOutcome {
    Text(String),
    Chart(ChartView),
    Silent,
}

/// Build the categorizer configured for this run.
pub fn categorizer_for(config: &PipelineConfig) -> Result<Categorizer, AppError> {
    let table = match &config.category_table {
        Some(path) => CategoryTable::from_json(path)?,
        None => CategoryTable::builtin(),
    };
    for (name, categories) in table.conflicts() {
        warn!(series = %name, categories = ?categories, "name listed in several categories; first wins");
    }
    Ok(Categorizer::new(table))
}

/// Load, enrich and categorize documents; drop series with nothing to show.
///
/// Returns series in document order plus every diagnostic raised on the way.
pub fn prepare_series(
    documents: &[Value],
    config: &PipelineConfig,
    categorizer: &Categorizer,
) -> (Vec<Series>, Vec<Diagnostic>) {
    let report = load_documents(documents);
    let mut diagnostics = report.diagnostics;
    let mut out = Vec::with_capacity(report.series.len());

    for loaded in report.series {
        if loaded.has_placeholder_name() {
            warn!(id = %loaded.id, "dropping series without a usable name");
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::DroppedSeries,
                loaded.id.clone(),
                "missing or placeholder series name",
            ));
            continue;
        }

        let LoadedSeries { id, name, observations } = loaded;
        let basis = config.basis_for(&id, &name);
        let observations = derive_metrics(&observations, basis, config.metrics);

        let has_data = observations.last().is_some_and(|o| o.mom_change.is_some() || o.yoy_change.is_some())
            || observations.iter().any(|o| o.value.is_some());
        if !has_data {
            warn!(id = %id, "dropping series without data");
            diagnostics.push(Diagnostic::new(DiagnosticKind::DroppedSeries, id, "no MoM, YoY or history"));
            continue;
        }

        let classification = categorizer.classify(&name);
        diagnostics.extend(classification.diagnostic());

        out.push(Series {
            id,
            category: classification.category().to_string(),
            name,
            basis,
            observations,
        });
    }

    (out, diagnostics)
}

/// Grid dashboard from raw documents.
pub fn build_grid(documents: &[Value], config: &PipelineConfig, categorizer: &Categorizer) -> GridDashboard {
    let (series, diagnostics) = prepare_series(documents, config, categorizer);

    let latest_month = series
        .iter()
        .filter_map(|s| s.latest().map(|o| &o.date))
        .max()
        .map(|d| d.to_string());

    let rows: Vec<GridRow> = series
        .iter()
        .map(|s| GridRow {
            id: s.id.clone(),
            name: s.name.clone(),
            category: s.category.clone(),
            basis: s.basis,
            latest: s.latest().cloned(),
            trend: Sparkline::from_series(s, config.trend_window),
        })
        .collect();

    let series_count = rows.len();
    let groups = group_by_category(rows, |r| r.category.as_str(), &config.category_priority);

    GridDashboard {
        groups,
        latest_month,
        series_count,
        diagnostics,
    }
}

/// Ranked indicator dashboard from raw documents.
pub fn build_indicators(documents: &[Value], config: &PipelineConfig, categorizer: &Categorizer) -> IndicatorDashboard {
    let (series, diagnostics) = prepare_series(documents, config, categorizer);
    let indicators: Vec<Indicator> = series.iter().map(Indicator::from).collect();
    IndicatorDashboard {
        indicators: rank_items(&indicators),
        diagnostics,
    }
}

/// Chart view for the requested series (matched by id, then by name), in request order.
pub fn build_chart(
    documents: &[Value],
    wanted: &[String],
    metric: Option<&str>,
    config: &PipelineConfig,
    categorizer: &Categorizer,
) -> Result<ChartView, AppError> {
    let (series, _) = prepare_series(documents, config, categorizer);

    let mut selected = Vec::with_capacity(wanted.len());
    for key in wanted {
        let key = key.trim();
        let found = series
            .iter()
            .find(|s| s.id == key)
            .or_else(|| series.iter().find(|s| s.name == key))
            .ok_or_else(|| AppError::new(3, format!("Series '{key}' not found or has no data.")))?;
        selected.push(found.clone());
    }

    Ok(ChartView::new(build_payload(&selected, config.chart_window, metric)))
}

/// Map an assistant reply onto what the chat view shows.
pub fn handle_assistant_reply(reply: AssistantReply) -> AssistantOutcome {
    match reply {
        AssistantReply::Text(text) => AssistantOutcome::Text(text),
        AssistantReply::Chart(payload) => AssistantOutcome::Chart(ChartView::new(payload)),
        AssistantReply::NoOp => AssistantOutcome::Silent,
    }
}

/// Fetch raw documents from the configured source.
pub fn fetch_documents(source: &DocumentSource) -> Result<Vec<Value>, AppError> {
    match source {
        DocumentSource::File(path) => read_documents_json(path),
        DocumentSource::Store { collection } => StoreClient::from_env()?.fetch_collection(collection),
    }
}

/// Fetch the documents for specific series ids.
///
/// A file source is read once; the store is queried per id.
pub fn fetch_series_documents(source: &DocumentSource, ids: &[String]) -> Result<Vec<Value>, AppError> {
    match source {
        DocumentSource::File(path) => read_documents_json(path),
        DocumentSource::Store { .. } => {
            let client = StoreClient::from_env()?;
            let mut docs = Vec::new();
            for id in ids {
                docs.extend(client.fetch_series(id)?);
            }
            Ok(docs)
        }
    }
}

/// Fetch + build the grid; fetch failures become `Fetched::Failed`.
pub fn load_grid(source: &DocumentSource, config: &PipelineConfig, categorizer: &Categorizer) -> Fetched<GridDashboard> {
    match fetch_documents(source) {
        Ok(docs) => {
            let grid = build_grid(&docs, config, categorizer);
            info!(series = grid.series_count, groups = grid.groups.len(), "grid dashboard ready");
            Fetched::Ready(grid)
        }
        Err(err) => {
            error!(error = %err, "document fetch failed");
            Fetched::Failed(err)
        }
    }
}

/// Fetch + build the indicator ranking; fetch failures become `Fetched::Failed`.
pub fn load_indicators(
    source: &DocumentSource,
    config: &PipelineConfig,
    categorizer: &Categorizer,
) -> Fetched<IndicatorDashboard> {
    match fetch_documents(source) {
        Ok(docs) => {
            let dashboard = build_indicators(&docs, config, categorizer);
            info!(indicators = dashboard.indicators.len(), "indicator dashboard ready");
            Fetched::Ready(dashboard)
        }
        Err(err) => {
            error!(error = %err, "document fetch failed");
            Fetched::Failed(err)
        }
    }
}

/// Ask the assistant; transport failures become `Fetched::Failed`.
pub fn ask_assistant(client: &AssistantClient, prompt: &str) -> Fetched<AssistantOutcome> {
    match client.ask(prompt) {
        Ok(reply) => Fetched::Ready(handle_assistant_reply(reply)),
        Err(err) => {
            error!(error = %err, "assistant call failed");
            Fetched::Failed(err)
        }
    }
}
