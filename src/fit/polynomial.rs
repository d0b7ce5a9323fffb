//! Polynomial least-squares fitting of an indicator against GDP per capita.
//!
//! Given observed pairs `(x_i, y_i)` we solve
//!
//! ```text
//! minimize Σ (y_i - Σ_k β_k u_i^k)^2,   u_i = (x_i - center) / scale
//! ```
//!
//! and evaluate the fitted polynomial on an even grid over `[min x, max x]`.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::math::{Standardizer, eval_poly, fill_design_row, linspace, solve_least_squares};

/// Degree of the Kuznets trend line.
pub const KUZNETS_DEGREE: usize = 3;

/// Number of points on the fitted curve.
pub const CURVE_POINTS: usize = 100;

/// Fitted polynomial in the standardized variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialModel {
    pub degree: usize,
    pub standardizer: Standardizer,
    /// Coefficients for `[1, u, u^2, ...]`.
    pub coeffs: Vec<f64>,
}

impl PolynomialModel {
    pub fn predict(&self, x: f64) -> f64 {
        eval_poly(&self.coeffs, self.standardizer.apply(x))
    }
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub sse: f64,
    pub rmse: f64,
    pub n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolynomialFit {
    pub model: PolynomialModel,
    pub quality: FitQuality,
    pub x_min: f64,
    pub x_max: f64,
}

/// Evenly spaced predictions over the observed x range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Fit a polynomial of `degree` to `points`.
///
/// Fails with a fit error when fewer than `degree + 1` distinct x values are
/// available, when inputs are not finite, or when the solve is degenerate.
pub fn fit_polynomial(points: &[(f64, f64)], degree: usize) -> Result<PolynomialFit, AppError> {
    if points.iter().any(|(x, y)| !(x.is_finite() && y.is_finite())) {
        return Err(AppError::fit("Cannot fit: observations contain missing or non-finite values."));
    }

    let needed = degree + 1;
    let distinct = distinct_count(points.iter().map(|(x, _)| *x));
    if distinct < needed {
        return Err(AppError::fit(format!(
            "Insufficient data: {distinct} distinct GDP values, need at least {needed} for a degree-{degree} fit."
        )));
    }

    let xs: Vec<f64> = points.iter().map(|(x, _)| *x).collect();
    let standardizer = Standardizer::fit(&xs);

    let n = points.len();
    let mut design = DMatrix::<f64>::zeros(n, needed);
    let mut row = vec![0.0; needed];
    for (i, &x) in xs.iter().enumerate() {
        fill_design_row(standardizer.apply(x), degree, &mut row);
        for (j, v) in row.iter().enumerate() {
            design[(i, j)] = *v;
        }
    }
    let y = DVector::from_iterator(n, points.iter().map(|(_, y)| *y));

    let beta = solve_least_squares(&design, &y)
        .ok_or_else(|| AppError::fit("Cannot fit: least-squares system is degenerate."))?;

    let model = PolynomialModel {
        degree,
        standardizer,
        coeffs: beta.iter().copied().collect(),
    };

    let sse: f64 = points.iter().map(|&(x, y)| (y - model.predict(x)).powi(2)).sum();
    let rmse = (sse / n as f64).sqrt();

    let x_min = xs.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    debug!(degree, n, sse, rmse, "fitted polynomial");

    Ok(PolynomialFit {
        model,
        quality: FitQuality { sse, rmse, n },
        x_min,
        x_max,
    })
}

impl PolynomialFit {
    /// Predictions on `n` evenly spaced points spanning the fitted x range.
    pub fn curve(&self, n: usize) -> FittedCurve {
        let x = linspace(self.x_min, self.x_max, n);
        let y = x.iter().map(|&v| self.model.predict(v)).collect();
        FittedCurve { x, y }
    }
}

/// Degree-3 fit plus its 100-point trend line.
pub fn fit_kuznets_curve(points: &[(f64, f64)]) -> Result<(PolynomialFit, FittedCurve), AppError> {
    let fit = fit_polynomial(points, KUZNETS_DEGREE)?;
    let curve = fit.curve(CURVE_POINTS);
    Ok((fit, curve))
}

fn distinct_count(values: impl Iterator<Item = f64>) -> usize {
    let mut v: Vec<f64> = values.collect();
    v.sort_by(|a, b| a.total_cmp(b));
    v.dedup();
    v.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn reproduces_points_of_a_square_law() {
        let points = [(10.0, 1.0), (20.0, 4.0), (30.0, 9.0), (40.0, 16.0)];
        let (fit, curve) = fit_kuznets_curve(&points).unwrap();
        assert!((fit.model.predict(10.0) - 1.0).abs() < 1e-6);
        assert!(fit.quality.rmse < 1e-6);

        assert_eq!(curve.x.len(), CURVE_POINTS);
        assert_eq!(curve.y.len(), CURVE_POINTS);
        assert_eq!(curve.x[0], 10.0);
        assert_eq!(curve.x[CURVE_POINTS - 1], 40.0);
        assert!(curve.x.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn recovers_cubic_at_gdp_scale() {
        // y = 2 + 1e-4 x - 3e-9 x^2 + 1e-14 x^3 over realistic GDP values.
        let f = |x: f64| 2.0 + 1e-4 * x - 3e-9 * x * x + 1e-14 * x.powi(3);
        let points: Vec<(f64, f64)> = (0..30).map(|i| 1000.0 + 2000.0 * i as f64).map(|x| (x, f(x))).collect();
        let fit = fit_polynomial(&points, 3).unwrap();
        for &(x, y) in &points {
            assert!((fit.model.predict(x) - y).abs() < 1e-8, "x={x}");
        }
    }

    #[test]
    fn noisy_data_has_bounded_residuals() {
        let points: Vec<(f64, f64)> = (0..20)
            .map(|i| {
                let x = i as f64;
                let noise = if i % 2 == 0 { 0.1 } else { -0.1 };
                (x, 0.5 * x * x + noise)
            })
            .collect();
        let fit = fit_polynomial(&points, 3).unwrap();
        assert!(fit.quality.rmse < 0.11);
        assert_eq!(fit.quality.n, 20);
    }

    #[test]
    fn too_few_distinct_x_is_insufficient_data() {
        let points = [(1.0, 1.0), (1.0, 2.0), (2.0, 3.0), (3.0, 4.0), (3.0, 5.0)];
        let err = fit_polynomial(&points, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fit);
        assert!(err.message().contains("Insufficient data"));

        assert_eq!(fit_kuznets_curve(&[]).unwrap_err().kind(), ErrorKind::Fit);
    }

    #[test]
    fn non_finite_input_is_rejected() {
        let points = [(1.0, 1.0), (2.0, f64::NAN), (3.0, 3.0), (4.0, 4.0)];
        assert_eq!(fit_polynomial(&points, 3).unwrap_err().kind(), ErrorKind::Fit);
    }
}
