//! Exports: finalized series to CSV, any view to pretty JSON.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::Series;
use crate::error::AppError;

const CSV_HEADER: [&str; 6] = ["date", "value", "mom_change", "yoy_change", "mom_12mo_avg", "mom_36mo_avg"];

/// Write one series as CSV. Absent values become empty cells.
pub fn write_series_csv(path: &Path, series: &Series) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_series_csv_to(file, series)
}

/// CSV writer over any sink (used by tests and the file variant).
pub fn write_series_csv_to<W: std::io::Write>(sink: W, series: &Series) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for o in &series.observations {
        writer
            .write_record([
                o.date.to_string(),
                fmt_cell(o.value),
                fmt_cell(o.mom_change),
                fmt_cell(o.yoy_change),
                fmt_cell(o.mom_12mo_avg),
                fmt_cell(o.mom_36mo_avg),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Write any serializable view as pretty JSON.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create JSON export '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write JSON export: {e}")))
}

fn fmt_cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChangeBasis, Observation, ObservationDate};

    #[test]
    fn absent_values_are_empty_cells() {
        let series = Series {
            id: "WPU1".to_string(),
            name: "Cement".to_string(),
            category: "Concrete".to_string(),
            basis: ChangeBasis::Percent,
            observations: vec![
                Observation::raw(ObservationDate::parse("2024-01").unwrap(), Some(100.0)),
                Observation {
                    mom_change: Some(0.0),
                    ..Observation::raw(ObservationDate::parse("2024-02").unwrap(), Some(100.0))
                },
            ],
        };

        let mut buf = Vec::new();
        write_series_csv_to(&mut buf, &series).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,value,mom_change,yoy_change,mom_12mo_avg,mom_36mo_avg");
        assert_eq!(lines[1], "2024-01,100,,,,");
        assert_eq!(lines[2], "2024-02,100,0,,,");
    }
}
