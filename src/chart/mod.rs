//! Chart-ready projections of series.
//!
//! - `payload`: `{points}` / `{series}` builders (MoM trend lines)
//! - `domain`: the shared value domain and scaling rules
//! - `ChartView`: payload + global domain + axis labels, for full charts
//! - `Sparkline`: trailing raw levels for the grid, scaled the same way

pub mod domain;
pub mod payload;

pub use domain::*;
pub use payload::*;

use serde::Serialize;

use crate::domain::{ChartPayload, Series};

/// A payload plus everything a renderer needs to lay it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub payload: ChartPayload,
    /// Computed over every point of every line; `None` when nothing is plottable.
    pub domain: Option<ValueDomain>,
    /// Axis labels, taken by index from the first non-empty line.
    pub first_date: Option<String>,
    pub last_date: Option<String>,
}

impl ChartView {
    pub fn new(payload: ChartPayload) -> Self {
        let domain = ValueDomain::of(payload.all_points().into_iter().map(|p| p.value));
        let label_line = payload.lines().into_iter().find(|line| !line.is_empty());
        let first_date = label_line.and_then(|l| l.first()).map(|p| p.date.clone());
        let last_date = label_line.and_then(|l| l.last()).map(|p| p.date.clone());
        Self {
            payload,
            domain,
            first_date,
            last_date,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.domain.is_none()
    }
}

/// Grid sparkline: the trailing raw levels of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sparkline {
    pub values: Vec<f64>,
    pub domain: Option<ValueDomain>,
}

impl Sparkline {
    pub fn from_series(series: &Series, window: usize) -> Self {
        let levels: Vec<f64> = series.observations.iter().filter_map(|o| o.value).collect();
        let skip = levels.len().saturating_sub(window);
        Self::from_values(levels.into_iter().skip(skip).collect())
    }

    pub fn from_values(values: Vec<f64>) -> Self {
        let domain = ValueDomain::of(values.iter().copied());
        Self { values, domain }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeBasis, ChartPoint, ChartSeries, Observation, ObservationDate};

    fn points(start: f64, n: usize) -> Vec<ChartPoint> {
        (0..n)
            .map(|i| ChartPoint {
                date: format!("p{i}"),
                value: start + i as f64,
            })
            .collect()
    }

    #[test]
    fn domain_spans_all_series_combined() {
        // 24 points in [-5, 18] and 36 points in [10, 45].
        let payload = ChartPayload::Multi {
            title: "t".to_string(),
            series: vec![
                ChartSeries {
                    material: "A".to_string(),
                    points: points(-5.0, 24),
                },
                ChartSeries {
                    material: "B".to_string(),
                    points: points(10.0, 36),
                },
            ],
        };
        let view = ChartView::new(payload);
        let domain = view.domain.unwrap();
        assert_eq!(view.payload.all_points().len(), 60);
        assert_eq!(domain.min, -5.0);
        assert_eq!(domain.max, 45.0);
        assert!(domain.crosses_zero);
        assert_eq!(view.first_date.as_deref(), Some("p0"));
        assert_eq!(view.last_date.as_deref(), Some("p23"));
    }

    #[test]
    fn empty_payload_has_no_domain() {
        let view = ChartView::new(ChartPayload::Single {
            title: "t".to_string(),
            points: Vec::new(),
        });
        assert!(view.is_empty());
        assert_eq!(view.first_date, None);
    }

    #[test]
    fn sparkline_keeps_trailing_levels_and_handles_one_point() {
        let series = Series {
            id: "x".to_string(),
            name: "x".to_string(),
            category: "General".to_string(),
            basis: ChangeBasis::Percent,
            observations: (1..=5)
                .map(|m| {
                    let date = ObservationDate::parse(&format!("2024-{m:02}")).unwrap();
                    Observation::raw(date, if m == 3 { None } else { Some(f64::from(m)) })
                })
                .collect(),
        };
        let spark = Sparkline::from_series(&series, 3);
        assert_eq!(spark.values, vec![2.0, 4.0, 5.0]);
        assert_eq!(spark.domain.map(|d| (d.min, d.max)), Some((2.0, 5.0)));

        let single = Sparkline::from_values(vec![7.0]);
        assert_eq!(single.domain.map(|d| d.span()), Some(1.0));
        assert!(Sparkline::from_values(Vec::new()).domain.is_none());
    }
}
