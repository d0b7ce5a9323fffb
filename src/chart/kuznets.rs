//! Chart builders for the Kuznets views.

use chrono::Datelike;
use tracing::debug;

use crate::chart::{
    Axis, AxisKind, ChartSpec, HoverInfo, PALETTE, TREND_COLOR, Trace, TraceMode, TraceStyle, fractional_year,
    parse_period, year_label,
};
use crate::domain::{Indicator, MergedTable, MergedTables};
use crate::error::AppError;
use crate::fit::{PolynomialFit, fit_kuznets_curve};

/// First year shown in the all-countries emissions view.
pub const AGGREGATE_FROM_YEAR: i32 = 1990;

/// A per-country Kuznets chart together with the fit behind its trend line.
#[derive(Debug, Clone)]
pub struct KuznetsChart {
    pub spec: ChartSpec,
    pub fit: PolynomialFit,
}

/// Scatter of the indicator against GDP per capita plus a cubic trend line.
///
/// Rows with an unparseable period or a missing value are dropped first; the
/// fit then fails with a fit error when too few observations remain.
pub fn build_kuznets_chart(table: &MergedTable, country: &str) -> Result<KuznetsChart, AppError> {
    let indicator = table.indicator;

    let complete = table.drop_incomplete();
    let incomplete = table.rows.len() - complete.rows.len();

    let mut dated = Vec::with_capacity(complete.rows.len());
    for row in &complete.rows {
        if let Some(date) = parse_period(&row.period) {
            dated.push((year_label(date), row));
        }
    }
    let bad_periods = complete.rows.len() - dated.len();
    if bad_periods > 0 || incomplete > 0 {
        debug!(country, bad_periods, incomplete, kept = dated.len(), "dropped rows before fitting");
    }

    let mut x = Vec::with_capacity(dated.len());
    let mut y = Vec::with_capacity(dated.len());
    let mut hover = Vec::with_capacity(dated.len());
    for (date, row) in &dated {
        let value = row.value.unwrap_or(f64::NAN);
        x.push(row.gdp_per_capita);
        y.push(value);
        hover.push(HoverInfo {
            date: date.clone(),
            value_label: indicator.hover_label().to_string(),
            value,
            gdp_per_capita: Some(row.gdp_per_capita),
            country: None,
        });
    }

    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let (fit, curve) = fit_kuznets_curve(&points)
        .map_err(|e| AppError::new(e.kind(), format!("{country}: {}", e.message())))?;

    let (marker_size, height) = match indicator {
        Indicator::Greenhouse => (10, Some(700)),
        _ => (8, None),
    };

    let observations = Trace {
        name: country.to_string(),
        mode: TraceMode::Markers,
        x,
        y,
        hover,
        style: TraceStyle {
            color: PALETTE[0].to_string(),
            marker_symbol: Some("circle-open-dot".to_string()),
            marker_size: Some(marker_size),
            line_width: None,
        },
    };
    let trend = Trace {
        name: "Trend Line".to_string(),
        mode: TraceMode::Lines,
        x: curve.x,
        y: curve.y,
        hover: Vec::new(),
        style: TraceStyle {
            color: TREND_COLOR.to_string(),
            marker_symbol: None,
            marker_size: None,
            line_width: Some(2),
        },
    };

    let spec = ChartSpec {
        title: format!("Kuznets environmental curve for {country}"),
        x_axis: Axis {
            label: Indicator::GdpPerCapita.axis_label().to_string(),
            kind: AxisKind::Linear,
        },
        y_axis: Axis {
            label: indicator.axis_label().to_string(),
            kind: AxisKind::Linear,
        },
        height,
        traces: vec![observations, trend],
    };

    Ok(KuznetsChart { spec, fit })
}

pub fn plot_kuznets_curve_depletion(table: &MergedTable, country: &str) -> Result<ChartSpec, AppError> {
    build_kuznets_chart(table, country).map(|c| c.spec)
}

pub fn plot_kuznets_curve_greenhouse(table: &MergedTable, country: &str) -> Result<ChartSpec, AppError> {
    build_kuznets_chart(table, country).map(|c| c.spec)
}

/// One emissions time series per country, from `AGGREGATE_FROM_YEAR` on. No trend line.
pub fn plot_greenhouse(tables: &MergedTables) -> Result<ChartSpec, AppError> {
    let indicator = tables.indicator;
    let mut traces = Vec::with_capacity(tables.len());
    let (mut bad_periods, mut missing) = (0usize, 0usize);

    for (i, table) in tables.iter().enumerate() {
        let mut rows = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let Some(date) = parse_period(&row.period) else {
                bad_periods += 1;
                continue;
            };
            if date.year() < AGGREGATE_FROM_YEAR {
                continue;
            }
            let Some(value) = row.value.filter(|v| v.is_finite()) else {
                missing += 1;
                continue;
            };
            rows.push((fractional_year(date), value, year_label(date)));
        }
        if rows.is_empty() {
            continue;
        }
        rows.sort_by(|a, b| a.0.total_cmp(&b.0));

        let hover = rows
            .iter()
            .map(|(_, value, date)| HoverInfo {
                date: date.clone(),
                value_label: indicator.hover_label().to_string(),
                value: *value,
                gdp_per_capita: None,
                country: Some(table.country.clone()),
            })
            .collect();

        traces.push(Trace {
            name: table.country.clone(),
            mode: TraceMode::Lines,
            x: rows.iter().map(|r| r.0).collect(),
            y: rows.iter().map(|r| r.1).collect(),
            hover,
            style: TraceStyle {
                color: PALETTE[i % PALETTE.len()].to_string(),
                marker_symbol: None,
                marker_size: None,
                line_width: Some(2),
            },
        });
    }

    if bad_periods > 0 || missing > 0 {
        debug!(bad_periods, missing, "dropped rows from the emissions time series");
    }
    if traces.is_empty() {
        return Err(AppError::data(format!(
            "No {} observations from {AGGREGATE_FROM_YEAR} onward.",
            indicator.column_name()
        )));
    }

    Ok(ChartSpec {
        title: "Greenhouse Gas Emissions Over Time for All Countries".to_string(),
        x_axis: Axis {
            label: "Years".to_string(),
            kind: AxisKind::Year,
        },
        y_axis: Axis {
            label: indicator.axis_label().to_string(),
            kind: AxisKind::Linear,
        },
        height: Some(700),
        traces,
    })
}
