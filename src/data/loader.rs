//! Builds clean indicator tables from fetched observations.

use tracing::{debug, info};

use crate::data::dbnomics::SeriesProvider;
use crate::domain::{Indicator, IndicatorTable, Pairing, RawObservation, SeriesId, SeriesRecord};
use crate::error::AppError;

/// Series identifiers for one indicator across `countries`.
pub fn series_ids(indicator: Indicator, countries: &[String]) -> Vec<SeriesId> {
    countries
        .iter()
        .map(|country| SeriesId::wdi_annual(indicator, country))
        .collect()
}

/// Keep rows with a value and a country label; log how many were dropped.
pub fn build_indicator_table(indicator: Indicator, raw: Vec<RawObservation>) -> IndicatorTable {
    let total = raw.len();
    let records: Vec<SeriesRecord> = raw
        .into_iter()
        .filter_map(|obs| {
            let value = obs.value.filter(|v| v.is_finite())?;
            let country = obs.country.filter(|c| !c.trim().is_empty())?;
            Some(SeriesRecord {
                period: obs.original_period,
                value,
                country,
            })
        })
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        debug!(indicator = indicator.column_name(), dropped, kept = records.len(), "dropped incomplete observations");
    }

    IndicatorTable { indicator, records }
}

/// Fetch one indicator for all `countries`.
pub fn load_indicator<P: SeriesProvider + ?Sized>(
    provider: &P,
    indicator: Indicator,
    countries: &[String],
) -> Result<IndicatorTable, AppError> {
    let ids = series_ids(indicator, countries);
    let raw = provider.fetch_series(&ids)?;
    let table = build_indicator_table(indicator, raw);
    if table.is_empty() {
        return Err(AppError::data(format!(
            "No usable {} observations for the requested countries.",
            indicator.column_name()
        )));
    }
    info!(indicator = indicator.column_name(), rows = table.len(), "loaded indicator table");
    Ok(table)
}

pub fn load_gdp_per_capita<P: SeriesProvider + ?Sized>(
    provider: &P,
    countries: &[String],
) -> Result<IndicatorTable, AppError> {
    load_indicator(provider, Indicator::GdpPerCapita, countries)
}

/// GDP per capita and the indicator named by `pairing`.
pub fn load_pair<P: SeriesProvider + ?Sized>(
    provider: &P,
    pairing: Pairing,
    countries: &[String],
) -> Result<(IndicatorTable, IndicatorTable), AppError> {
    let other = load_indicator(provider, pairing.indicator(), countries)?;
    let gdp = load_gdp_per_capita(provider, countries)?;
    Ok((gdp, other))
}

pub fn load_data_depletion<P: SeriesProvider + ?Sized>(
    provider: &P,
    countries: &[String],
) -> Result<(IndicatorTable, IndicatorTable), AppError> {
    load_pair(provider, Pairing::Depletion, countries)
}

pub fn load_data_greenhouse<P: SeriesProvider + ?Sized>(
    provider: &P,
    countries: &[String],
) -> Result<(IndicatorTable, IndicatorTable), AppError> {
    load_pair(provider, Pairing::Greenhouse, countries)
}
