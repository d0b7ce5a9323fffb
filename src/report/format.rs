//! Formatted terminal output for fits and tables.
//!
//! We keep formatting code in one place so:
//! - the fetch/merge/fit code stays clean and testable
//! - output changes are localized (important for snapshot tests)

use crate::domain::{Indicator, IndicatorTable, MergedTable};
use crate::fit::PolynomialFit;
use crate::report::{Deviations, YearResidual};

/// Fit diagnostics plus the years deviating most from the trend.
pub fn format_fit_summary(country: &str, indicator: Indicator, fit: &PolynomialFit, deviations: &Deviations) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== kz - {} vs GDP per capita: {country} ===\n", indicator.display_name()));
    out.push_str(&format!(
        "Points: n={} | gdp=[{:.2}, {:.2}]\n",
        fit.quality.n, fit.x_min, fit.x_max
    ));
    out.push_str(&format!(
        "Fit: degree={} | SSE={:.4} | RMSE={:.4}\n",
        fit.model.degree, fit.quality.sse, fit.quality.rmse
    ));
    out.push_str(&format!(
        "- standardized: u = (gdp - {:.4}) / {:.4}\n",
        fit.model.standardizer.center, fit.model.standardizer.scale
    ));
    out.push_str(&format!("- coeffs[1, u, u^2, ...]: {}\n", fmt_vec(&fit.model.coeffs)));

    out.push_str("\nAbove trend:\n");
    out.push_str(&format_residual_table(&deviations.above));
    out.push_str("\nBelow trend:\n");
    out.push_str(&format_residual_table(&deviations.below));

    out
}

fn format_residual_table(rows: &[YearResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<10} {:>14} {:>14} {:>14} {:>14}", "period", "gdp", "observed", "fitted", "residual"));
    out.push('\n');
    out.push_str(&format!("{:-<10} {:-<14} {:-<14} {:-<14} {:-<14}", "", "", "", "", ""));
    out.push('\n');
    for r in rows {
        out.push_str(&format!(
            "{:<10} {:>14.2} {:>14.4} {:>14.4} {:>14.4}",
            truncate(&r.period, 10),
            r.gdp_per_capita,
            r.observed,
            r.fitted,
            r.residual
        ));
        out.push('\n');
    }
    out
}

/// Raw indicator table (dataset view), at most `limit` rows.
pub fn format_indicator_table(table: &IndicatorTable, limit: usize) -> String {
    let mut out = String::new();
    let value_col = table.indicator.column_name();
    out.push_str(format!("{:<10} {:>20} {:<20}", "period", value_col, "country").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<10} {:-<20} {:-<20}", "", "", "").trim_end());
    out.push('\n');
    for r in table.records.iter().take(limit) {
        out.push_str(format!("{:<10} {:>20.4} {:<20}", truncate(&r.period, 10), r.value, truncate(&r.country, 20)).trim_end());
        out.push('\n');
    }
    if table.len() > limit {
        out.push_str(&format!("... {} more rows\n", table.len() - limit));
    }
    out
}

/// One merged table; missing indicator values show as `-`.
pub fn format_merged_table(table: &MergedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({} rows)\n", table.country, table.rows.len()));
    out.push_str(
        format!(
            "{:<10} {:>16} {:>20}",
            "period",
            Indicator::GdpPerCapita.column_name(),
            table.indicator.column_name()
        )
        .trim_end(),
    );
    out.push('\n');
    for r in &table.rows {
        let value = r.value.map(|v| format!("{v:.4}")).unwrap_or_else(|| "-".to_string());
        out.push_str(format!("{:<10} {:>16.2} {:>20}", truncate(&r.period, 10), r.gdp_per_capita, value).trim_end());
        out.push('\n');
    }
    out
}

fn fmt_vec(v: &[f64]) -> String {
    let parts: Vec<String> = v.iter().map(|x| format!("{x:.6}")).collect();
    format!("[{}]", parts.join(", "))
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
    use crate::domain::{MergedRow, SeriesRecord};

    #[test]
    fn merged_table_marks_missing_values() {
        let t = MergedTable {
            country: "Russian Federation".into(),
            indicator: Indicator::Depletion,
            rows: vec![
                MergedRow { period: "2000".into(), gdp_per_capita: 5000.0, value: Some(12.5) },
                MergedRow { period: "2001".into(), gdp_per_capita: 5300.0, value: None },
            ],
        };
        let txt = format_merged_table(&t);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[0], "Russian Federation (2 rows)");
        assert!(lines[2].ends_with("12.5000"));
        assert!(lines[3].ends_with('-'));
    }

    #[test]
    fn indicator_table_is_truncated() {
        let table = IndicatorTable {
            indicator: Indicator::GdpPerCapita,
            records: (0..5)
                .map(|i| SeriesRecord { period: format!("{}", 2000 + i), value: 1.0, country: "India".into() })
                .collect(),
        };
        let txt = format_indicator_table(&table, 2);
        assert_eq!(txt.lines().count(), 5);
        assert!(txt.ends_with("... 3 more rows\n"));
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("United Kingdom", 6), "Unite.");
        assert_eq!(truncate("India", 6), "India");
    }
}
