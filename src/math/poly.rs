//! Polynomial basis helpers.
//!
//! Raw GDP per capita values reach 10^5, so `x^3` spans ~15 orders of
//! magnitude and the Vandermonde matrix is badly conditioned. We build the
//! basis on the standardized variable `u = (x - center) / scale` instead;
//! least-squares predictions are identical, only the coefficients differ.

use serde::{Deserialize, Serialize};

/// Affine map `x -> (x - center) / scale`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    pub center: f64,
    pub scale: f64,
}

impl Standardizer {
    /// Center on the mean, scale by the population standard deviation.
    ///
    /// Falls back to unit scale when the values are constant or empty.
    pub fn fit(xs: &[f64]) -> Self {
        if xs.is_empty() {
            return Self { center: 0.0, scale: 1.0 };
        }
        let n = xs.len() as f64;
        let mean = xs.iter().sum::<f64>() / n;
        let var = xs.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let sd = var.sqrt();
        let scale = if sd.is_finite() && sd > 0.0 { sd } else { 1.0 };
        Self { center: mean, scale }
    }

    pub fn apply(&self, x: f64) -> f64 {
        (x - self.center) / self.scale
    }
}

/// Fill `out` with `[1, u, u^2, ..., u^degree]`.
///
/// # Panics
/// Panics if `out.len() != degree + 1`.
pub fn fill_design_row(u: f64, degree: usize, out: &mut [f64]) {
    assert_eq!(out.len(), degree + 1, "design row length must be degree + 1");
    let mut p = 1.0;
    for slot in out.iter_mut() {
        *slot = p;
        p *= u;
    }
}

/// Evaluate `Σ coeffs[k] * u^k` (Horner).
pub fn eval_poly(coeffs: &[f64], u: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * u + c)
}

/// `n` evenly spaced values over `[start, end]`, both ends included exactly.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n as f64 - 1.0);
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            out[n - 1] = end;
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn design_row_is_power_basis() {
        let mut row = [0.0; 4];
        fill_design_row(2.0, 3, &mut row);
        assert_eq!(row, [1.0, 2.0, 4.0, 8.0]);
    }

    #[test]
    fn horner_matches_expanded_form() {
        let c = [1.0, -2.0, 0.5, 3.0];
        let u = 1.7_f64;
        let expected = 1.0 - 2.0 * u + 0.5 * u * u + 3.0 * u.powi(3);
        assert!((eval_poly(&c, u) - expected).abs() < 1e-12);
    }

    #[test]
    fn linspace_hits_both_ends() {
        let xs = linspace(10.0, 40.0, 100);
        assert_eq!(xs.len(), 100);
        assert_eq!(xs[0], 10.0);
        assert_eq!(xs[99], 40.0);
        assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(linspace(3.0, 3.0, 5), vec![3.0; 5]);
    }

    #[test]
    fn standardizer_handles_constant_input() {
        let s = Standardizer::fit(&[5.0, 5.0]);
        assert_eq!(s.scale, 1.0);
        assert_eq!(s.apply(5.0), 0.0);
    }
}
