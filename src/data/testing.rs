//! In-memory `SeriesProvider` for tests.

use std::cell::Cell;

use crate::data::dbnomics::SeriesProvider;
use crate::domain::{Indicator, RawObservation, SeriesId};
use crate::error::AppError;

#[derive(Debug, Default)]
pub struct StubProvider {
    series: Vec<(SeriesId, Vec<RawObservation>)>,
    fail_with: Option<AppError>,
    pub calls: Cell<usize>,
}

impl StubProvider {
    pub fn with_series(mut self, indicator: Indicator, code: &str, label: &str, obs: &[(&str, Option<f64>)]) -> Self {
        let id = SeriesId::wdi_annual(indicator, code);
        let rows = obs
            .iter()
            .map(|(period, value)| RawObservation {
                series: id.clone(),
                original_period: period.to_string(),
                value: *value,
                country: Some(label.to_string()),
            })
            .collect();
        self.series.push((id, rows));
        self
    }

    pub fn failing(err: AppError) -> Self {
        Self {
            fail_with: Some(err),
            ..Self::default()
        }
    }
}

impl SeriesProvider for StubProvider {
    fn fetch_series(&self, ids: &[SeriesId]) -> Result<Vec<RawObservation>, AppError> {
        self.calls.set(self.calls.get() + 1);
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        let mut out = Vec::new();
        for id in ids {
            let Some((_, rows)) = self.series.iter().find(|(sid, _)| sid == id) else {
                return Err(AppError::fetch(format!("Unknown series: {id}")));
            };
            out.extend(rows.iter().cloned());
        }
        Ok(out)
    }
}
