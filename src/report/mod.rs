//! Reporting utilities: residuals against the trend line and terminal tables.

use crate::domain::MergedTable;
use crate::fit::PolynomialFit;

pub mod format;

pub use format::*;

/// One observation compared with the fitted trend.
#[derive(Debug, Clone, PartialEq)]
pub struct YearResidual {
    pub period: String,
    pub gdp_per_capita: f64,
    pub observed: f64,
    pub fitted: f64,
    pub residual: f64,
}

/// Years furthest above and below the trend line (top-N each side).
#[derive(Debug, Clone, PartialEq)]
pub struct Deviations {
    pub above: Vec<YearResidual>,
    pub below: Vec<YearResidual>,
}

/// Residuals for every complete row of `table`.
pub fn compute_residuals(table: &MergedTable, fit: &PolynomialFit) -> Vec<YearResidual> {
    table
        .rows
        .iter()
        .filter(|r| r.is_complete())
        .filter_map(|r| {
            let observed = r.value?;
            let fitted = fit.model.predict(r.gdp_per_capita);
            Some(YearResidual {
                period: r.period.clone(),
                gdp_per_capita: r.gdp_per_capita,
                observed,
                fitted,
                residual: observed - fitted,
            })
        })
        .collect()
}

/// Rank residuals, largest positive first for `above`, most negative first for `below`.
pub fn rank_deviations(residuals: &[YearResidual], top_n: usize) -> Deviations {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| b.residual.total_cmp(&a.residual));
    let above = sorted.iter().filter(|r| r.residual > 0.0).take(top_n).cloned().collect();

    sorted.reverse();
    let below = sorted.iter().filter(|r| r.residual < 0.0).take(top_n).cloned().collect();

    Deviations { above, below }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Indicator, MergedRow};
    use crate::fit::fit_polynomial;

    fn table() -> MergedTable {
        let values = [1.0, 2.2, 2.8, 4.1, 5.0, 5.6, 7.3];
        MergedTable {
            country: "China".into(),
            indicator: Indicator::Greenhouse,
            rows: values
                .iter()
                .enumerate()
                .map(|(i, v)| MergedRow { period: format!("{}", 2000 + i), gdp_per_capita: i as f64, value: Some(*v) })
                .chain(std::iter::once(MergedRow { period: "2010".into(), gdp_per_capita: 10.0, value: None }))
                .collect(),
        }
    }

    #[test]
    fn residuals_skip_incomplete_rows() {
        let t = table();
        let points: Vec<(f64, f64)> = t.drop_incomplete().rows.iter().map(|r| (r.gdp_per_capita, r.value.unwrap())).collect();
        let fit = fit_polynomial(&points, 1).unwrap();
        let residuals = compute_residuals(&t, &fit);
        assert_eq!(residuals.len(), 7);
        let sum: f64 = residuals.iter().map(|r| r.residual).sum();
        assert!(sum.abs() < 1e-9, "OLS with intercept has zero-sum residuals");
    }

    #[test]
    fn deviations_are_signed_and_ordered() {
        let r = |p: &str, res: f64| YearResidual {
            period: p.into(),
            gdp_per_capita: 0.0,
            observed: res,
            fitted: 0.0,
            residual: res,
        };
        let d = rank_deviations(&[r("a", 1.0), r("b", -3.0), r("c", 2.0), r("d", -1.0)], 1);
        assert_eq!(d.above.len(), 1);
        assert_eq!(d.above[0].period, "c");
        assert_eq!(d.below.len(), 1);
        assert_eq!(d.below[0].period, "b");
    }
}
