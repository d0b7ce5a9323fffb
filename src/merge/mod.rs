//! Per-country left join of GDP per capita with a second indicator.
//!
//! Iteration is keyed on the base table's countries: a country that only
//! appears in the indicator table is dropped (and logged). Duplicate periods
//! on the indicator side fan out into several rows.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::{IndicatorTable, MergedRow, MergedTable, MergedTables};

/// Merge `base` (GDP per capita) with `other`, one table per base country.
pub fn merge_per_country(base: &IndicatorTable, other: &IndicatorTable) -> MergedTables {
    let base_countries = base.countries();

    let dropped: Vec<&str> = other
        .countries()
        .into_iter()
        .filter(|c| !base_countries.contains(c))
        .collect();
    if !dropped.is_empty() {
        warn!(
            indicator = other.indicator.column_name(),
            countries = ?dropped,
            "countries missing from the GDP table are excluded from the merge"
        );
    }

    let tables = base_countries
        .into_iter()
        .map(|country| merge_country(base, other, country))
        .collect();

    MergedTables {
        indicator: other.indicator,
        tables,
    }
}

/// Variant for the natural-resource depletion pairing.
pub fn merge_country_depletion(tables: (&IndicatorTable, &IndicatorTable)) -> MergedTables {
    merge_per_country(tables.0, tables.1)
}

/// Variant for the greenhouse gas pairing.
pub fn merge_country_greenhouse(tables: (&IndicatorTable, &IndicatorTable)) -> MergedTables {
    merge_per_country(tables.0, tables.1)
}

fn merge_country(base: &IndicatorTable, other: &IndicatorTable, country: &str) -> MergedTable {
    let mut right: HashMap<&str, Vec<f64>> = HashMap::new();
    for r in other.for_country(country) {
        right.entry(r.period.as_str()).or_default().push(r.value);
    }

    let mut rows = Vec::new();
    let mut unmatched = 0usize;
    for left in base.for_country(country) {
        match right.get(left.period.as_str()) {
            Some(values) => {
                for &value in values {
                    rows.push(MergedRow {
                        period: left.period.clone(),
                        gdp_per_capita: left.value,
                        value: Some(value),
                    });
                }
            }
            None => {
                unmatched += 1;
                rows.push(MergedRow {
                    period: left.period.clone(),
                    gdp_per_capita: left.value,
                    value: None,
                });
            }
        }
    }

    if unmatched > 0 {
        debug!(country, unmatched, "GDP periods without a matching indicator value");
    }

    MergedTable {
        country: country.to_string(),
        indicator: other.indicator,
        rows,
    }
}
