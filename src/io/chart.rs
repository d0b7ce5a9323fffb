//! Read/write chart JSON files.
//!
//! Chart JSON is the portable representation of a rendered view: the full
//! `ChartSpec` (axes, traces, hover metadata) wrapped with a small header so a
//! later `kz plot` can tell what it is looking at.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::ChartSpec;
use crate::error::AppError;
use crate::fit::PolynomialFit;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFile {
    pub tool: String,
    pub generated: String,
    /// Present for per-country Kuznets charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fit: Option<PolynomialFit>,
    pub chart: ChartSpec,
}

impl ChartFile {
    pub fn new(chart: ChartSpec, fit: Option<PolynomialFit>) -> Self {
        Self {
            tool: "kz".to_string(),
            generated: chrono::Local::now().to_rfc3339(),
            fit,
            chart,
        }
    }
}

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, file: &ChartFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::io(format!("Failed to write chart JSON: {e}")))?;
    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    let chart: ChartFile =
        serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid chart JSON: {e}")))?;
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::build_kuznets_chart;
    use crate::domain::{Indicator, MergedRow, MergedTable};

    #[test]
    fn chart_file_survives_disk() {
        let table = MergedTable {
            country: "Saudi Arabia".into(),
            indicator: Indicator::Depletion,
            rows: (0..6)
                .map(|i| MergedRow {
                    period: format!("{}", 2010 + i),
                    gdp_per_capita: 20000.0 + 500.0 * i as f64,
                    value: Some(30.0 - 2.0 * i as f64),
                })
                .collect(),
        };
        let chart = build_kuznets_chart(&table, "Saudi Arabia").unwrap();
        let file = ChartFile::new(chart.spec, Some(chart.fit));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.json");
        write_chart_json(&path, &file).unwrap();
        let back = read_chart_json(&path).unwrap();

        assert_eq!(back.tool, "kz");
        assert_eq!(back.chart.title, file.chart.title);
        assert_eq!(back.chart.traces.len(), 2);
        assert_eq!(back.chart.traces[0].hover, file.chart.traces[0].hover);
        assert!(back.fit.is_some());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_chart_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }
}
