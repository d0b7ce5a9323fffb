//! Shared fetch -> merge -> fit -> chart logic used by both CLI and TUI front-ends.
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::chart::{ChartSpec, KuznetsChart, build_kuznets_chart, plot_greenhouse};
use crate::data::{SeriesProvider, load_pair};
use crate::domain::{ChartView, IndicatorTable, MergedTables, Pairing};
use crate::error::AppError;
use crate::merge::merge_per_country;

/// Everything loaded for one Kuznets pairing.
#[derive(Debug, Clone)]
pub struct IndicatorDataset {
    pub pairing: Pairing,
    pub gdp: IndicatorTable,
    pub indicator: IndicatorTable,
    pub merged: MergedTables,
}

impl IndicatorDataset {
    pub fn countries(&self) -> Vec<&str> {
        self.merged.countries()
    }
}

/// Fetch both tables for `pairing` and merge them per country.
pub fn load_dataset<P: SeriesProvider + ?Sized>(
    provider: &P,
    pairing: Pairing,
    countries: &[String],
) -> Result<IndicatorDataset, AppError> {
    let (gdp, indicator) = load_pair(provider, pairing, countries)?;
    let merged = merge_per_country(&gdp, &indicator);
    if merged.is_empty() {
        return Err(AppError::data("GDP per capita table has no countries."));
    }
    Ok(IndicatorDataset {
        pairing,
        gdp,
        indicator,
        merged,
    })
}

/// Kuznets chart for one country of an already loaded dataset.
pub fn country_chart(dataset: &IndicatorDataset, country: &str) -> Result<KuznetsChart, AppError> {
    let table = dataset.merged.get(country).ok_or_else(|| {
        AppError::data(format!(
            "No data for country '{country}'. Available: {}.",
            dataset.countries().join(", ")
        ))
    })?;
    build_kuznets_chart(table, country)
}

/// Output of a one-shot chart build.
#[derive(Debug, Clone)]
pub struct ViewChart {
    pub dataset: IndicatorDataset,
    pub chart: ChartSpec,
    /// Set for per-country views.
    pub kuznets: Option<(String, KuznetsChart)>,
}

/// Load, merge and chart `view`. Per-country views default to the first country.
pub fn build_view_chart<P: SeriesProvider + ?Sized>(
    provider: &P,
    view: ChartView,
    country: Option<&str>,
    countries: &[String],
) -> Result<ViewChart, AppError> {
    let dataset = load_dataset(provider, view.pairing(), countries)?;

    if view == ChartView::GreenhouseAll {
        let chart = plot_greenhouse(&dataset.merged)?;
        return Ok(ViewChart {
            dataset,
            chart,
            kuznets: None,
        });
    }

    let country = match country {
        Some(c) => c.to_string(),
        None => dataset
            .countries()
            .first()
            .map(|c| c.to_string())
            .ok_or_else(|| AppError::data("No countries available."))?,
    };
    let kuznets = country_chart(&dataset, &country)?;
    Ok(ViewChart {
        chart: kuznets.spec.clone(),
        kuznets: Some((country, kuznets)),
        dataset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::TraceMode;
    use crate::data::testing::StubProvider;
    use crate::domain::Indicator;
    use crate::error::ErrorKind;

    fn countries() -> Vec<String> {
        vec!["FRA".to_string(), "IND".to_string()]
    }

    fn years(base: f64, step: f64) -> Vec<(String, Option<f64>)> {
        (0..8).map(|i| (format!("{}", 1988 + i), Some(base + step * i as f64))).collect()
    }

    fn as_refs(v: &[(String, Option<f64>)]) -> Vec<(&str, Option<f64>)> {
        v.iter().map(|(p, x)| (p.as_str(), *x)).collect()
    }

    fn provider() -> StubProvider {
        let fra_gdp = years(30000.0, 400.0);
        let ind_gdp = years(500.0, 40.0);
        let fra_dep = years(0.2, -0.01);
        let fra_ghg = years(550000.0, -2000.0);
        let ind_ghg = years(1500000.0, 60000.0);

        StubProvider::default()
            .with_series(Indicator::GdpPerCapita, "FRA", "France", &as_refs(&fra_gdp))
            .with_series(Indicator::GdpPerCapita, "IND", "India", &as_refs(&ind_gdp))
            .with_series(Indicator::Depletion, "FRA", "France", &as_refs(&fra_dep))
            .with_series(Indicator::Depletion, "IND", "India", &[("1990", None)])
            .with_series(Indicator::Greenhouse, "FRA", "France", &as_refs(&fra_ghg))
            .with_series(Indicator::Greenhouse, "IND", "India", &as_refs(&ind_ghg))
    }

    #[test]
    fn depletion_view_defaults_to_first_country() {
        let out = build_view_chart(&provider(), ChartView::Depletion, None, &countries()).unwrap();
        let (country, kuznets) = out.kuznets.unwrap();
        assert_eq!(country, "France");
        assert_eq!(kuznets.fit.quality.n, 8);
        assert_eq!(out.dataset.countries(), vec!["France", "India"]);
        assert_eq!(out.chart.traces.len(), 2);
    }

    #[test]
    fn country_without_indicator_data_cannot_be_fit() {
        let dataset = load_dataset(&provider(), Pairing::Depletion, &countries()).unwrap();
        let india = dataset.merged.get("India").unwrap();
        assert!(india.rows.iter().all(|r| r.value.is_none()));
        let err = country_chart(&dataset, "India").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fit);
    }

    #[test]
    fn unknown_country_is_a_data_error() {
        let dataset = load_dataset(&provider(), Pairing::Greenhouse, &countries()).unwrap();
        let err = country_chart(&dataset, "Atlantis").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn aggregate_view_has_one_line_per_country() {
        let out = build_view_chart(&provider(), ChartView::GreenhouseAll, None, &countries()).unwrap();
        assert!(out.kuznets.is_none());
        assert_eq!(out.chart.traces.len(), 2);
        assert!(out.chart.traces.iter().all(|t| t.mode == TraceMode::Lines));
        // 1988 and 1989 are filtered out.
        assert_eq!(out.chart.traces[0].len(), 6);
    }

    #[test]
    fn fetch_failure_surfaces_unchanged() {
        let stub = StubProvider::failing(AppError::fetch("DBnomics request timed out"));
        let err = build_view_chart(&stub, ChartView::Greenhouse, None, &countries()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.message(), "DBnomics request timed out");
    }
}
