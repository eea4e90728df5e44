//! Formatted terminal output for the dashboards.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of presentation concerns (rounding, dashes)
//! - output changes are localized (important for snapshot tests)
//!
//! Sign is printed as-is; whether a rise is "good" is left to the reader.

use crate::app::pipeline::{GridDashboard, GridRow, IndicatorDashboard};
use crate::domain::{ChangeBasis, Diagnostic, Indicator, Observation, ObservationDate};
use crate::plot::render_sparkline;

const SPARK_WIDTH: usize = 24;

/// Category-grouped materials table.
pub fn format_grid(grid: &GridDashboard) -> String {
    let mut out = String::new();

    out.push_str("=== Latest pricing data ===\n");
    out.push_str(&format!(
        "Latest month: {}\n",
        grid.latest_month
            .as_deref()
            .and_then(ObservationDate::parse)
            .map(|d| month_label(&d))
            .unwrap_or_else(|| "N/A".to_string())
    ));
    out.push_str(&format!("Series: {}\n", grid.series_count));

    for group in &grid.groups {
        out.push('\n');
        out.push_str(&format!("## {}\n", group.category));
        out.push_str(&grid_table(&group.items));
    }

    out
}

/// Ranked consumer indicators.
pub fn format_indicators(dashboard: &IndicatorDashboard) -> String {
    let mut out = String::new();
    out.push_str("=== Consumer indicators ===\n");
    out.push_str(&format!("{} economic series tracked\n\n", dashboard.indicators.len()));
    out.push_str(&indicator_table(&dashboard.indicators));
    out
}

/// Data-quality events, one per line.
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    if diagnostics.is_empty() {
        return out;
    }
    out.push_str(&format!("Diagnostics ({}):\n", diagnostics.len()));
    for d in diagnostics {
        out.push_str(&format!("- [{:?}] {}: {}\n", d.kind, d.subject, d.message));
    }
    out
}

fn grid_table(rows: &[GridRow]) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<40} {:>9} {:>9} {}", "name", "mom", "yoy", "trend").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<40} {:-<9} {:-<9} {:-<w$}", "", "", "", "", w = SPARK_WIDTH).trim_end());
    out.push('\n');

    for r in rows {
        let latest = r.latest.as_ref();
        out.push_str(
            format!(
                "{:<40} {:>9} {:>9} {}",
                truncate(&r.name.to_uppercase(), 40),
                fmt_change(latest.and_then(|o| o.mom_change), r.basis),
                fmt_change(latest.and_then(|o| o.yoy_change), r.basis),
                render_sparkline(&r.trend, SPARK_WIDTH),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

fn indicator_table(indicators: &[Indicator]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<40} {:<8} {:>12} {:>9} {:>9} {:>9} {:>9}",
            "series", "month", "value", "mom", "yoy", "avg12", "avg36"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<40} {:-<8} {:-<12} {:-<9} {:-<9} {:-<9} {:-<9}",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for ind in indicators {
        let line = match &ind.latest {
            Some(o) => format!(
                "{:<40} {:<8} {:>12} {:>9} {:>9} {:>9} {:>9}",
                truncate(&ind.series_name, 40),
                month_label(&o.date),
                fmt_value(o),
                fmt_change(o.mom_change, ind.basis),
                fmt_change(o.yoy_change, ind.basis),
                fmt_change(o.mom_12mo_avg, ind.basis),
                fmt_change(o.mom_36mo_avg, ind.basis),
            ),
            None => format!("{:<40} {:<8}", truncate(&ind.series_name, 40), "no data"),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}

/// `Mar 2024` style label.
fn month_label(date: &ObservationDate) -> String {
    date.day().format("%b %Y").to_string()
}

/// Percent changes get `%`, rate series get percentage points (`pp`).
fn fmt_change(v: Option<f64>, basis: ChangeBasis) -> String {
    match (v, basis) {
        (Some(x), ChangeBasis::Percent) => format!("{x:.2}%"),
        (Some(x), ChangeBasis::Points) => format!("{x:.2}pp"),
        (None, _) => "-".to_string(),
    }
}

/// Small readings (rates, ratios) keep more decimals.
fn fmt_value(o: &Observation) -> String {
    match o.value {
        Some(v) if v.abs() < 1.0 => format!("{v:.4}"),
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Sparkline;
    use crate::domain::{DiagnosticKind, ObservationDate};
    use crate::rank::CategoryGroup;

    fn obs(date: &str, value: f64, mom: Option<f64>) -> Observation {
        Observation {
            mom_change: mom,
            ..Observation::raw(ObservationDate::parse(date).unwrap(), Some(value))
        }
    }

    #[test]
    fn absent_values_render_as_dash_and_zero_as_zero() {
        assert_eq!(fmt_change(None, ChangeBasis::Percent), "-");
        assert_eq!(fmt_change(Some(0.0), ChangeBasis::Percent), "0.00%");
        assert_eq!(fmt_change(Some(-1.236), ChangeBasis::Percent), "-1.24%");
        assert_eq!(fmt_change(Some(0.2), ChangeBasis::Points), "0.20pp");
    }

    #[test]
    fn grid_groups_and_latest_month() {
        let grid = GridDashboard {
            groups: vec![CategoryGroup {
                category: "Concrete".to_string(),
                items: vec![GridRow {
                    id: "c".to_string(),
                    name: "Cement".to_string(),
                    category: "Concrete".to_string(),
                    basis: ChangeBasis::Percent,
                    latest: Some(obs("2024-03-01", 101.0, Some(1.0))),
                    trend: Sparkline::from_values(vec![100.0, 101.0]),
                }],
            }],
            latest_month: Some("2024-03-01".to_string()),
            series_count: 1,
            diagnostics: Vec::new(),
        };
        let txt = format_grid(&grid);
        assert!(txt.contains("Latest month: Mar 2024"));
        assert!(txt.contains("## Concrete"));
        assert!(txt.contains("CEMENT"));
        assert!(txt.contains("1.00%"));
    }

    #[test]
    fn indicators_without_data_say_so() {
        let dash = IndicatorDashboard {
            indicators: vec![
                Indicator {
                    id: "u".to_string(),
                    series_name: "Unemployment Rate".to_string(),
                    basis: ChangeBasis::Points,
                    latest: Some(Observation {
                        yoy_change: Some(-0.1),
                        ..obs("2024-05", 0.041, Some(0.2))
                    }),
                },
                Indicator {
                    id: "x".to_string(),
                    series_name: "Empty".to_string(),
                    basis: ChangeBasis::Percent,
                    latest: None,
                },
            ],
            diagnostics: Vec::new(),
        };
        let txt = format_indicators(&dash);
        assert!(txt.contains("2 economic series tracked"));
        assert!(txt.contains("May 2024"));
        assert!(txt.contains("0.0410"));
        assert!(txt.contains("0.20pp"));
        assert!(txt.contains("-0.10pp"));
        assert!(!txt.contains('%'));
        assert!(txt.contains("no data"));
    }

    #[test]
    fn diagnostics_listing() {
        let diags = vec![Diagnostic::new(DiagnosticKind::UnmatchedCategory, "Mystery", "no category")];
        assert_eq!(
            format_diagnostics(&diags),
            "Diagnostics (1):\n- [UnmatchedCategory] Mystery: no category\n"
        );
        assert_eq!(format_diagnostics(&[]), "");
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
