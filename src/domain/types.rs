//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built fresh for every load (nothing here is cached or persisted)
//! - exported to CSV/JSON on request
//! - rendered by both the CLI and the TUI

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// ISO3 country codes requested from the World Bank WDI dataset.
pub const COUNTRY_CODES: [&str; 8] = ["USA", "CHN", "GBR", "FRA", "RUS", "TUR", "SAU", "IND"];

/// Statistical indicators used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    GdpPerCapita,
    Depletion,
    Greenhouse,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::GdpPerCapita, Indicator::Depletion, Indicator::Greenhouse];

    /// WDI indicator code.
    pub fn wdi_code(self) -> &'static str {
        match self {
            Indicator::GdpPerCapita => "NY.GDP.PCAP.KD",
            Indicator::Depletion => "NY.ADJ.DRES.GN.ZS",
            Indicator::Greenhouse => "EN.ATM.GHGT.KT.CE",
        }
    }

    /// Column name used in tables and CSV exports.
    pub fn column_name(self) -> &'static str {
        match self {
            Indicator::GdpPerCapita => "gdp per capita",
            Indicator::Depletion => "natural depletion",
            Indicator::Greenhouse => "greenhouse emission",
        }
    }

    /// Axis label for charts.
    pub fn axis_label(self) -> &'static str {
        match self {
            Indicator::GdpPerCapita => "GDP per capita",
            Indicator::Depletion => "Natural resources depletion (% of GNI)",
            Indicator::Greenhouse => "Greenhouse Gas emission (kt of CO2 equivalent)",
        }
    }

    /// Label used in per-point hover text.
    pub fn hover_label(self) -> &'static str {
        match self {
            Indicator::GdpPerCapita => "GDP per capita",
            Indicator::Depletion => "Natural resources depletion (%)",
            Indicator::Greenhouse => "Greenhouse Gas Emission (kt CO2e)",
        }
    }

    /// Human-readable dataset name (menu entries, dataset panels, sources page).
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::GdpPerCapita => "GDP per capita",
            Indicator::Depletion => "Natural Resource Depletion",
            Indicator::Greenhouse => "Greenhouse Gas Emission",
        }
    }

    /// DBnomics browser link for the indicator's dataset slice.
    pub fn source_url(self) -> String {
        format!(
            "https://db.nomics.world/WB/WDI?dimensions=%7B\"indicator\"%3A%5B\"{}\"%5D%7D&tab=list",
            self.wdi_code()
        )
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Which indicator is paired with GDP per capita for a Kuznets view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Pairing {
    Depletion,
    Greenhouse,
}

impl Pairing {
    pub fn indicator(self) -> Indicator {
        match self {
            Pairing::Depletion => Indicator::Depletion,
            Pairing::Greenhouse => Indicator::Greenhouse,
        }
    }
}

/// Chart selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChartView {
    /// GDP per capita vs natural resource depletion, one country.
    Depletion,
    /// GDP per capita vs greenhouse gas emissions, one country.
    Greenhouse,
    /// Greenhouse gas emissions over time for all countries.
    GreenhouseAll,
}

impl ChartView {
    pub fn pairing(self) -> Pairing {
        match self {
            ChartView::Depletion => Pairing::Depletion,
            ChartView::Greenhouse | ChartView::GreenhouseAll => Pairing::Greenhouse,
        }
    }
}

/// A fully-qualified DBnomics series identifier: `provider/dataset/series`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesId {
    pub provider: String,
    pub dataset: String,
    pub series: String,
}

impl SeriesId {
    /// Annual WDI series for one indicator and country (`WB/WDI/A-<code>-<country>`).
    pub fn wdi_annual(indicator: Indicator, country: &str) -> Self {
        Self {
            provider: "WB".to_string(),
            dataset: "WDI".to_string(),
            series: format!("A-{}-{country}", indicator.wdi_code()),
        }
    }

    /// `provider/dataset`, the key DBnomics uses for dataset metadata.
    pub fn dataset_key(&self) -> String {
        format!("{}/{}", self.provider, self.dataset)
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.provider, self.dataset, self.series)
    }
}

/// One observation as returned by the fetcher.
///
/// `value` is `None` when the provider reports a missing observation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub series: SeriesId,
    pub original_period: String,
    pub value: Option<f64>,
    pub country: Option<String>,
}

/// One row of an indicator table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub period: String,
    pub value: f64,
    pub country: String,
}

/// Observations for one indicator across all requested countries.
///
/// Every record has a finite value and a non-empty country label.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorTable {
    pub indicator: Indicator,
    pub records: Vec<SeriesRecord>,
}

impl IndicatorTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct country labels in order of first appearance.
    pub fn countries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.country.as_str()) {
                out.push(&r.country);
            }
        }
        out
    }

    pub fn for_country<'a>(&'a self, country: &'a str) -> impl Iterator<Item = &'a SeriesRecord> + 'a {
        self.records.iter().filter(move |r| r.country == country)
    }
}

/// One row of a per-country merged table.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRow {
    pub period: String,
    pub gdp_per_capita: f64,
    /// `None` where the indicator table had no matching period.
    pub value: Option<f64>,
}

impl MergedRow {
    pub fn is_complete(&self) -> bool {
        self.gdp_per_capita.is_finite() && self.value.is_some_and(f64::is_finite)
    }
}

/// GDP per capita left-joined with one indicator, for a single country.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTable {
    pub country: String,
    pub indicator: Indicator,
    pub rows: Vec<MergedRow>,
}

impl MergedTable {
    /// Keep only rows where both GDP and the indicator are present.
    ///
    /// Applying this to an already-complete table returns it unchanged.
    pub fn drop_incomplete(&self) -> MergedTable {
        MergedTable {
            country: self.country.clone(),
            indicator: self.indicator,
            rows: self.rows.iter().filter(|r| r.is_complete()).cloned().collect(),
        }
    }
}

/// Country name -> merged table, in order of first appearance in the base table.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedTables {
    pub indicator: Indicator,
    pub tables: Vec<MergedTable>,
}

impl MergedTables {
    pub fn get(&self, country: &str) -> Option<&MergedTable> {
        self.tables.iter().find(|t| t.country == country)
    }

    pub fn countries(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.country.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MergedTable> {
        self.tables.iter()
    }
}
