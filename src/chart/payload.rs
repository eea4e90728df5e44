//! Chart payload builders.
//!
//! Charts plot the MoM change (trend of percentage change, not the raw level).
//! Observations without a MoM value are skipped rather than drawn at zero, then
//! the trailing `window` points are kept.

use crate::domain::{ChartPayload, ChartPoint, ChartSeries, Series};

/// Trailing MoM points of one series.
pub fn mom_points(series: &Series, window: usize) -> Vec<ChartPoint> {
    let points: Vec<ChartPoint> = series
        .observations
        .iter()
        .filter_map(|o| {
            o.mom_change.map(|value| ChartPoint {
                date: o.date.to_string(),
                value,
            })
        })
        .collect();
    let skip = points.len().saturating_sub(window);
    points.into_iter().skip(skip).collect()
}

/// `{title, points}` payload for one series.
pub fn build_single(series: &Series, window: usize, metric: Option<&str>) -> ChartPayload {
    ChartPayload::Single {
        title: title_for(&[series.name.as_str()], metric),
        points: mom_points(series, window),
    }
}

/// `{title, series}` payload; each series is windowed on its own.
pub fn build_multi(series: &[Series], window: usize, metric: Option<&str>) -> ChartPayload {
    let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
    ChartPayload::Multi {
        title: title_for(&names, metric),
        series: series
            .iter()
            .map(|s| ChartSeries {
                material: s.name.clone(),
                points: mom_points(s, window),
            })
            .collect(),
    }
}

/// Single payload for one series, multi payload otherwise.
pub fn build_payload(series: &[Series], window: usize, metric: Option<&str>) -> ChartPayload {
    match series {
        [only] => build_single(only, window, metric),
        _ => build_multi(series, window, metric),
    }
}

fn title_for(names: &[&str], metric: Option<&str>) -> String {
    let subject = if names.is_empty() {
        "No series".to_string()
    } else {
        names.join(" vs ")
    };
    match metric.map(str::trim).filter(|m| !m.is_empty()) {
        Some(metric) => format!("{subject}: {metric}"),
        None => format!("{subject}: MoM % change"),
    }
}
